//! SQLite schema and row types.

use chrono::{DateTime, SecondsFormat, Utc};
use entities::{Ingredient, Recipe, RecipeSummary, User};
use sqlx::FromRow;

use crate::{RecipeStoreError, StoreResult};

/// SQL schema definition
pub(crate) const SCHEMA_SQL: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Recipes table (derived pricing columns are written by the costing step)
CREATE TABLE IF NOT EXISTS recipes (
    id TEXT PRIMARY KEY NOT NULL,
    owner_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    yield_quantity INTEGER NOT NULL,
    profit_margin REAL NOT NULL DEFAULT 30.0,
    total_cost REAL NOT NULL DEFAULT 0.0,
    unit_cost REAL NOT NULL DEFAULT 0.0,
    suggested_price REAL NOT NULL DEFAULT 0.0,
    unit_profit REAL NOT NULL DEFAULT 0.0,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Ingredients table (one-to-many, owned by a recipe)
CREATE TABLE IF NOT EXISTS ingredients (
    id TEXT PRIMARY KEY NOT NULL,
    recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    quantity_used REAL NOT NULL,
    unit TEXT NOT NULL,
    package_price REAL NOT NULL,
    package_quantity REAL NOT NULL CHECK (package_quantity > 0),
    package_unit TEXT NOT NULL,
    cost REAL NOT NULL DEFAULT 0.0,
    created_at TEXT NOT NULL
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_recipes_owner ON recipes(owner_id, created_at);
CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_id);
"#;

/// Formats a timestamp for storage. Fixed precision keeps text ordering
/// consistent with time ordering.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RecipeStoreError::CorruptRow(format!("{column} {value:?}: {e}")))
}

/// Database row for User
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = RecipeStoreError;

    fn try_from(row: UserRow) -> StoreResult<Self> {
        Ok(User {
            created_at: parse_timestamp("users.created_at", &row.created_at)?,
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
        })
    }
}

/// Database row for Recipe
#[derive(Debug, FromRow)]
pub struct RecipeRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub yield_quantity: i64,
    pub profit_margin: f64,
    pub total_cost: f64,
    pub unit_cost: f64,
    pub suggested_price: f64,
    pub unit_profit: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl RecipeRow {
    pub fn into_recipe(self, ingredients: Vec<Ingredient>) -> StoreResult<Recipe> {
        Ok(Recipe {
            created_at: parse_timestamp("recipes.created_at", &self.created_at)?,
            updated_at: parse_timestamp("recipes.updated_at", &self.updated_at)?,
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            yield_quantity: self.yield_quantity,
            profit_margin: self.profit_margin,
            notes: self.notes,
            total_cost: self.total_cost,
            unit_cost: self.unit_cost,
            suggested_price: self.suggested_price,
            unit_profit: self.unit_profit,
            ingredients,
        })
    }
}

/// Database row for a recipe listing
#[derive(Debug, FromRow)]
pub struct RecipeSummaryRow {
    pub id: String,
    pub name: String,
    pub yield_quantity: i64,
    pub profit_margin: f64,
    pub total_cost: f64,
    pub unit_cost: f64,
    pub suggested_price: f64,
    pub unit_profit: f64,
    pub created_at: String,
}

impl TryFrom<RecipeSummaryRow> for RecipeSummary {
    type Error = RecipeStoreError;

    fn try_from(row: RecipeSummaryRow) -> StoreResult<Self> {
        Ok(RecipeSummary {
            created_at: parse_timestamp("recipes.created_at", &row.created_at)?,
            id: row.id,
            name: row.name,
            yield_quantity: row.yield_quantity,
            profit_margin: row.profit_margin,
            total_cost: row.total_cost,
            unit_cost: row.unit_cost,
            suggested_price: row.suggested_price,
            unit_profit: row.unit_profit,
        })
    }
}

/// Database row for Ingredient
#[derive(Debug, FromRow)]
pub struct IngredientRow {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    pub quantity_used: f64,
    pub unit: String,
    pub package_price: f64,
    pub package_quantity: f64,
    pub package_unit: String,
    pub cost: f64,
    pub created_at: String,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = RecipeStoreError;

    fn try_from(row: IngredientRow) -> StoreResult<Self> {
        Ok(Ingredient {
            created_at: parse_timestamp("ingredients.created_at", &row.created_at)?,
            id: row.id,
            recipe_id: row.recipe_id,
            name: row.name,
            quantity_used: row.quantity_used,
            unit: row.unit,
            package_price: row.package_price,
            package_quantity: row.package_quantity,
            package_unit: row.package_unit,
            cost: row.cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip_is_fixed_width() {
        let ts = Utc::now();
        let formatted = format_timestamp(&ts);

        assert_eq!(formatted.len(), "2024-01-01T00:00:00.000000Z".len());
        let parsed = parse_timestamp("t", &formatted).unwrap();
        assert_eq!(format_timestamp(&parsed), formatted);
    }

    #[test]
    fn test_corrupt_timestamp() {
        let row = UserRow {
            id: "u1".to_string(),
            email: "a@b.c".to_string(),
            password_hash: "h".to_string(),
            created_at: "yesterday".to_string(),
        };

        assert!(matches!(
            User::try_from(row),
            Err(RecipeStoreError::CorruptRow(_))
        ));
    }
}
