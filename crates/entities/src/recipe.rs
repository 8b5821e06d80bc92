//! Recipe entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Ingredient, IngredientDraft};

/// Caller-supplied data used to create a recipe or fully replace one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    /// Recipe name.
    pub name: String,
    /// Number of sellable units one batch produces.
    pub yield_quantity: i64,
    /// Markup percentage; `None` falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The complete ingredient list.
    #[serde(default)]
    pub ingredients: Vec<IngredientDraft>,
}

impl RecipeDraft {
    /// Creates a draft without ingredients.
    pub fn new(name: impl Into<String>, yield_quantity: i64) -> Self {
        Self {
            name: name.into(),
            yield_quantity,
            profit_margin: None,
            notes: None,
            ingredients: Vec::new(),
        }
    }

    /// Sets the profit margin percentage.
    pub fn with_profit_margin(mut self, profit_margin: f64) -> Self {
        self.profit_margin = Some(profit_margin);
        self
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Appends an ingredient line.
    pub fn with_ingredient(mut self, ingredient: IngredientDraft) -> Self {
        self.ingredients.push(ingredient);
        self
    }
}

/// A costed recipe owned by one user.
///
/// `total_cost`, `unit_cost`, `suggested_price` and `unit_profit` are derived
/// from the ingredient list and are only written by the costing calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier.
    pub id: String,
    /// Owning user ID. Never changes after creation.
    pub owner_id: String,
    /// Recipe name.
    pub name: String,
    /// Number of sellable units one batch produces.
    pub yield_quantity: i64,
    /// Markup percentage applied to the unit cost.
    pub profit_margin: f64,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Sum of all ingredient costs.
    pub total_cost: f64,
    /// Cost of one sellable unit.
    pub unit_cost: f64,
    /// Unit cost with the profit margin applied.
    pub suggested_price: f64,
    /// Suggested price minus unit cost.
    pub unit_profit: f64,
    /// Ingredient lines, in insertion order.
    pub ingredients: Vec<Ingredient>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a recipe with zeroed derived fields and no ingredients.
    pub fn new(owner_id: impl Into<String>, draft: &RecipeDraft, profit_margin: f64) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            name: draft.name.clone(),
            yield_quantity: draft.yield_quantity,
            profit_margin,
            notes: draft.notes.clone(),
            total_cost: 0.0,
            unit_cost: 0.0,
            suggested_price: 0.0,
            unit_profit: 0.0,
            ingredients: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the base fields with the draft's values and bumps
    /// `updated_at`. Ingredients and derived fields are left to the caller.
    pub fn apply_draft(&mut self, draft: &RecipeDraft, profit_margin: f64) {
        self.name = draft.name.clone();
        self.yield_quantity = draft.yield_quantity;
        self.profit_margin = profit_margin;
        self.notes = draft.notes.clone();
        self.updated_at = Utc::now();
    }

    /// Returns the list representation of this recipe.
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            yield_quantity: self.yield_quantity,
            profit_margin: self.profit_margin,
            total_cost: self.total_cost,
            unit_cost: self.unit_cost,
            suggested_price: self.suggested_price,
            unit_profit: self.unit_profit,
            created_at: self.created_at,
        }
    }
}

/// A recipe as shown in listings, without its ingredient lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub yield_quantity: i64,
    pub profit_margin: f64,
    pub total_cost: f64,
    pub unit_cost: f64,
    pub suggested_price: f64,
    pub unit_profit: f64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_creation() {
        let draft = RecipeDraft::new("Brigadeiro", 30).with_notes("Use 50% cocoa");
        let recipe = Recipe::new("user-1", &draft, 30.0);

        assert_eq!(recipe.owner_id, "user-1");
        assert_eq!(recipe.name, "Brigadeiro");
        assert_eq!(recipe.notes, Some("Use 50% cocoa".to_string()));
        assert_eq!(recipe.total_cost, 0.0);
        assert_eq!(recipe.created_at, recipe.updated_at);
    }

    #[test]
    fn test_apply_draft_overwrites_base_fields() {
        let draft = RecipeDraft::new("Cake", 8).with_notes("old");
        let mut recipe = Recipe::new("user-1", &draft, 30.0);
        let id = recipe.id.clone();
        let created_at = recipe.created_at;

        recipe.apply_draft(&RecipeDraft::new("Carrot Cake", 12), 45.0);

        assert_eq!(recipe.id, id);
        assert_eq!(recipe.name, "Carrot Cake");
        assert_eq!(recipe.yield_quantity, 12);
        assert_eq!(recipe.profit_margin, 45.0);
        assert_eq!(recipe.notes, None);
        assert_eq!(recipe.created_at, created_at);
        assert!(recipe.updated_at >= created_at);
    }

    #[test]
    fn test_draft_deserializes_without_optional_fields() {
        let draft: RecipeDraft =
            serde_json::from_str(r#"{"name": "Pão de mel", "yield_quantity": 20}"#).unwrap();

        assert_eq!(draft.profit_margin, None);
        assert_eq!(draft.notes, None);
        assert!(draft.ingredients.is_empty());
    }
}
