//! Ingredient entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied data for one ingredient line.
///
/// `unit` and `package_unit` are carried as-is; keeping them consistent is the
/// caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientDraft {
    /// Ingredient name.
    pub name: String,
    /// Amount consumed by the recipe, in `unit`.
    pub quantity_used: f64,
    /// Unit of the consumed quantity (g, kg, ml, ...).
    pub unit: String,
    /// Price paid for the purchased package.
    pub package_price: f64,
    /// Total quantity in the purchased package, in `package_unit`.
    pub package_quantity: f64,
    /// Unit of the package quantity.
    pub package_unit: String,
}

impl IngredientDraft {
    /// Creates a draft where the consumed and packaged quantities share a unit.
    pub fn new(
        name: impl Into<String>,
        quantity_used: f64,
        unit: impl Into<String>,
        package_price: f64,
        package_quantity: f64,
    ) -> Self {
        let unit = unit.into();
        Self {
            name: name.into(),
            quantity_used,
            package_unit: unit.clone(),
            unit,
            package_price,
            package_quantity,
        }
    }

    /// Sets a package unit different from the consumed unit.
    pub fn with_package_unit(mut self, package_unit: impl Into<String>) -> Self {
        self.package_unit = package_unit.into();
        self
    }
}

/// A persisted ingredient line, owned by exactly one recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier.
    pub id: String,
    /// Owning recipe ID.
    pub recipe_id: String,
    /// Ingredient name.
    pub name: String,
    /// Amount consumed by the recipe, in `unit`.
    pub quantity_used: f64,
    /// Unit of the consumed quantity.
    pub unit: String,
    /// Price paid for the purchased package.
    pub package_price: f64,
    /// Total quantity in the purchased package.
    pub package_quantity: f64,
    /// Unit of the package quantity.
    pub package_unit: String,
    /// Portion of `package_price` attributable to `quantity_used`.
    pub cost: f64,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    /// Builds a new ingredient line for a recipe from a draft and its cost.
    pub fn from_draft(recipe_id: impl Into<String>, draft: &IngredientDraft, cost: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            recipe_id: recipe_id.into(),
            name: draft.name.clone(),
            quantity_used: draft.quantity_used,
            unit: draft.unit.clone(),
            package_price: draft.package_price,
            package_quantity: draft.package_quantity,
            package_unit: draft.package_unit.clone(),
            cost,
            created_at: Utc::now(),
        }
    }

    /// Returns the purchase inputs of this line as a draft.
    pub fn to_draft(&self) -> IngredientDraft {
        IngredientDraft {
            name: self.name.clone(),
            quantity_used: self.quantity_used,
            unit: self.unit.clone(),
            package_price: self.package_price,
            package_quantity: self.package_quantity,
            package_unit: self.package_unit.clone(),
        }
    }
}
