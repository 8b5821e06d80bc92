//! SQLite recipe store.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use costing::{cost_ingredients, recompute_recipe_totals, validate_draft, PricingDefaults};
use entities::{Ingredient, Recipe, RecipeDraft, RecipeSummary, User};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite, SqliteConnection,
};

use crate::{
    schema::{
        format_timestamp, IngredientRow, RecipeRow, RecipeSummaryRow, UserRow, SCHEMA_SQL,
    },
    RecipeFilter, RecipeStore, RecipeStoreError, StoreConfig, StoreResult,
};

const RECIPE_COLUMNS: &str = "id, owner_id, name, yield_quantity, profit_margin, total_cost, \
                              unit_cost, suggested_price, unit_profit, notes, created_at, \
                              updated_at";

const INGREDIENT_COLUMNS: &str = "id, recipe_id, name, quantity_used, unit, package_price, \
                                  package_quantity, package_unit, cost, created_at";

/// SQLite-backed recipe store.
///
/// Create and update run their steps (base row, ingredient lines, totals)
/// in one transaction; any failure rolls all of them back.
#[derive(Debug, Clone)]
pub struct SqliteRecipeStore {
    pool: Pool<Sqlite>,
    defaults: PricingDefaults,
    default_page_limit: u32,
}

impl SqliteRecipeStore {
    /// Connects to the configured database and applies the schema.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Self::new(pool, config.pricing_defaults(), config.default_page_limit);
        store.run_migrations().await?;

        tracing::info!(database_url = %config.database_url, "Recipe store ready");

        Ok(store)
    }

    /// Wraps an existing pool. The schema must already be applied.
    pub fn new(pool: Pool<Sqlite>, defaults: PricingDefaults, default_page_limit: u32) -> Self {
        Self {
            pool,
            defaults,
            default_page_limit,
        }
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Runs database migrations
    pub async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

/// Maps constraint failures onto store errors; everything else propagates as is.
fn map_constraint(err: sqlx::Error, entity_type: &'static str, key: &str) -> RecipeStoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RecipeStoreError::already_exists(entity_type, key);
        }
        if db_err.is_foreign_key_violation() {
            return RecipeStoreError::ForeignKeyViolation(format!(
                "{entity_type} references a missing row: {key}"
            ));
        }
    }
    RecipeStoreError::Database(err)
}

async fn fetch_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: &str,
) -> StoreResult<Vec<Ingredient>> {
    let rows: Vec<IngredientRow> = sqlx::query_as(&format!(
        "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE recipe_id = ? ORDER BY rowid"
    ))
    .bind(recipe_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(Ingredient::try_from).collect()
}

async fn fetch_recipe(
    conn: &mut SqliteConnection,
    id: &str,
    owner_id: &str,
) -> StoreResult<Option<Recipe>> {
    let row: Option<RecipeRow> = sqlx::query_as(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ? AND owner_id = ?"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let ingredients = fetch_ingredients(conn, id).await?;
            Ok(Some(row.into_recipe(ingredients)?))
        }
        None => Ok(None),
    }
}

async fn insert_ingredients(
    conn: &mut SqliteConnection,
    ingredients: &[Ingredient],
) -> StoreResult<()> {
    for ingredient in ingredients {
        sqlx::query(&format!(
            "INSERT INTO ingredients ({INGREDIENT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&ingredient.id)
        .bind(&ingredient.recipe_id)
        .bind(&ingredient.name)
        .bind(ingredient.quantity_used)
        .bind(&ingredient.unit)
        .bind(ingredient.package_price)
        .bind(ingredient.package_quantity)
        .bind(&ingredient.package_unit)
        .bind(ingredient.cost)
        .bind(format_timestamp(&ingredient.created_at))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Reloads the recipe inside the transaction, recomputes its totals from the
/// stored ingredient lines and writes them back.
async fn refresh_totals(
    conn: &mut SqliteConnection,
    id: &str,
    owner_id: &str,
) -> StoreResult<Recipe> {
    let mut recipe = fetch_recipe(conn, id, owner_id)
        .await?
        .ok_or_else(|| RecipeStoreError::Other(format!("Recipe {id} vanished mid-transaction")))?;

    recompute_recipe_totals(&mut recipe);

    sqlx::query(
        "UPDATE recipes SET total_cost = ?, unit_cost = ?, suggested_price = ?, unit_profit = ?
         WHERE id = ?",
    )
    .bind(recipe.total_cost)
    .bind(recipe.unit_cost)
    .bind(recipe.suggested_price)
    .bind(recipe.unit_profit)
    .bind(&recipe.id)
    .execute(&mut *conn)
    .await?;

    Ok(recipe)
}

#[async_trait]
impl RecipeStore for SqliteRecipeStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(format_timestamp(&user.created_at))
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint(e, "User", &user.email))?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(())
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(user_id = %id, "User deleted");
        }
        Ok(deleted)
    }

    async fn create_recipe(&self, owner_id: &str, draft: &RecipeDraft) -> StoreResult<Recipe> {
        validate_draft(draft)?;

        let recipe = Recipe::new(owner_id, draft, self.defaults.profit_margin_for(draft));
        let ingredients = cost_ingredients(&recipe.id, &draft.ingredients)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "INSERT INTO recipes ({RECIPE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&recipe.id)
        .bind(&recipe.owner_id)
        .bind(&recipe.name)
        .bind(recipe.yield_quantity)
        .bind(recipe.profit_margin)
        .bind(recipe.total_cost)
        .bind(recipe.unit_cost)
        .bind(recipe.suggested_price)
        .bind(recipe.unit_profit)
        .bind(&recipe.notes)
        .bind(format_timestamp(&recipe.created_at))
        .bind(format_timestamp(&recipe.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_constraint(e, "Recipe", owner_id))?;

        tracing::debug!(recipe_id = %recipe.id, "Recipe row inserted");

        insert_ingredients(&mut tx, &ingredients).await?;
        let recipe = refresh_totals(&mut tx, &recipe.id, owner_id).await?;

        tx.commit().await?;

        tracing::info!(
            recipe_id = %recipe.id,
            owner_id = %owner_id,
            ingredient_count = recipe.ingredients.len(),
            total_cost = recipe.total_cost,
            "Recipe created"
        );

        Ok(recipe)
    }

    async fn get_recipe(&self, id: &str, owner_id: &str) -> StoreResult<Option<Recipe>> {
        let mut conn = self.pool.acquire().await?;
        fetch_recipe(&mut conn, id, owner_id).await
    }

    async fn list_recipes(
        &self,
        owner_id: &str,
        filter: &RecipeFilter,
    ) -> StoreResult<Vec<RecipeSummary>> {
        let (offset, limit) = filter.page(self.default_page_limit);

        let rows: Vec<RecipeSummaryRow> = sqlx::query_as(
            "SELECT id, name, yield_quantity, profit_margin, total_cost, unit_cost,
                    suggested_price, unit_profit, created_at
             FROM recipes
             WHERE owner_id = ?
             ORDER BY created_at ASC, rowid ASC
             LIMIT ? OFFSET ?",
        )
        .bind(owner_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RecipeSummary::try_from).collect()
    }

    async fn update_recipe(
        &self,
        id: &str,
        owner_id: &str,
        draft: &RecipeDraft,
    ) -> StoreResult<Option<Recipe>> {
        validate_draft(draft)?;

        let ingredients = cost_ingredients(id, &draft.ingredients)?;
        let profit_margin = self.defaults.profit_margin_for(draft);

        let mut tx = self.pool.begin().await?;

        // The first statement must be a write: a deferred transaction cannot
        // upgrade a read lock while another connection is writing.
        let matched = sqlx::query(
            "UPDATE recipes SET name = ?, yield_quantity = ?, profit_margin = ?, notes = ?,
             updated_at = ?
             WHERE id = ? AND owner_id = ?",
        )
        .bind(&draft.name)
        .bind(draft.yield_quantity)
        .bind(profit_margin)
        .bind(&draft.notes)
        .bind(format_timestamp(&Utc::now()))
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if matched == 0 {
            tracing::debug!(recipe_id = %id, owner_id = %owner_id, "Recipe not found for update");
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM ingredients WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tracing::debug!(recipe_id = %id, removed, "Replacing ingredient list");

        insert_ingredients(&mut tx, &ingredients).await?;
        let recipe = refresh_totals(&mut tx, id, owner_id).await?;

        tx.commit().await?;

        tracing::info!(
            recipe_id = %id,
            owner_id = %owner_id,
            ingredient_count = recipe.ingredients.len(),
            total_cost = recipe.total_cost,
            "Recipe updated"
        );

        Ok(Some(recipe))
    }

    async fn delete_recipe(&self, id: &str, owner_id: &str) -> StoreResult<bool> {
        // Ingredient rows go with the recipe through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM recipes WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(recipe_id = %id, owner_id = %owner_id, "Recipe deleted");
        }
        Ok(deleted)
    }
}
