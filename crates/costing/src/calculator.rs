//! Ingredient cost and recipe total calculation.

use entities::{Ingredient, IngredientDraft, Recipe};

use crate::{CostingError, CostingResult};

/// Rounds a monetary value to two decimal places.
///
/// Uses [`f64::round`], so exact halves of the binary value move away from
/// zero: `0.125` becomes `0.13` and `-0.125` becomes `-0.13`. A decimal
/// literal such as `1.005` is stored slightly below the half and rounds down.
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Returns the portion of `package_price` attributable to `quantity_used`.
///
/// `cost = round((package_price / package_quantity) * quantity_used, 2)`
pub fn cost_of_ingredient(
    package_price: f64,
    package_quantity: f64,
    quantity_used: f64,
) -> CostingResult<f64> {
    ensure_finite("package_price", package_price)?;
    ensure_finite("package_quantity", package_quantity)?;
    ensure_finite("quantity_used", quantity_used)?;
    if package_quantity == 0.0 {
        return Err(CostingError::DivisionByZero);
    }

    let cost_per_unit = package_price / package_quantity;
    Ok(round_money(cost_per_unit * quantity_used))
}

/// Costs an ingredient draft.
pub fn cost_ingredient_draft(draft: &IngredientDraft) -> CostingResult<f64> {
    cost_of_ingredient(
        draft.package_price,
        draft.package_quantity,
        draft.quantity_used,
    )
}

/// Builds costed ingredient lines for a recipe, in draft order.
pub fn cost_ingredients(
    recipe_id: &str,
    drafts: &[IngredientDraft],
) -> CostingResult<Vec<Ingredient>> {
    drafts
        .iter()
        .map(|draft| {
            let cost = cost_ingredient_draft(draft)?;
            Ok(Ingredient::from_draft(recipe_id, draft, cost))
        })
        .collect()
}

fn ensure_finite(field: &'static str, value: f64) -> CostingResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CostingError::NonFinite { field })
    }
}

/// Derived pricing fields of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecipeTotals {
    pub total_cost: f64,
    pub unit_cost: f64,
    pub suggested_price: f64,
    pub unit_profit: f64,
}

impl RecipeTotals {
    /// Aggregates ingredient costs into recipe totals.
    ///
    /// Each field depends on the previous one, and each is rounded before
    /// the next is derived. A `yield_quantity` of zero or less prices every
    /// per-unit field at zero instead of dividing.
    pub fn from_costs(
        costs: impl IntoIterator<Item = f64>,
        yield_quantity: i64,
        profit_margin: f64,
    ) -> Self {
        let total_cost = round_money(costs.into_iter().sum::<f64>());
        let unit_cost = if yield_quantity > 0 {
            round_money(total_cost / yield_quantity as f64)
        } else {
            0.0
        };
        let suggested_price = round_money(unit_cost * (1.0 + profit_margin / 100.0));
        let unit_profit = round_money(suggested_price - unit_cost);

        Self {
            total_cost,
            unit_cost,
            suggested_price,
            unit_profit,
        }
    }

    /// Writes these totals into the recipe's derived fields.
    pub fn apply_to(&self, recipe: &mut Recipe) {
        recipe.total_cost = self.total_cost;
        recipe.unit_cost = self.unit_cost;
        recipe.suggested_price = self.suggested_price;
        recipe.unit_profit = self.unit_profit;
    }
}

/// Recomputes the four derived fields of a recipe from its ingredient costs.
///
/// Each ingredient's `cost` must already be computed. Only the derived
/// fields are touched.
pub fn recompute_recipe_totals(recipe: &mut Recipe) -> &mut Recipe {
    let totals = RecipeTotals::from_costs(
        recipe.ingredients.iter().map(|i| i.cost),
        recipe.yield_quantity,
        recipe.profit_margin,
    );
    totals.apply_to(recipe);
    recipe
}

#[cfg(test)]
mod tests {
    use entities::{Ingredient, RecipeDraft};

    use super::*;

    fn recipe_with(yield_quantity: i64, profit_margin: f64, drafts: &[IngredientDraft]) -> Recipe {
        let draft = RecipeDraft::new("Test", yield_quantity);
        let mut recipe = Recipe::new("user-1", &draft, profit_margin);
        for draft in drafts {
            let cost = cost_ingredient_draft(draft).unwrap();
            recipe
                .ingredients
                .push(Ingredient::from_draft(&recipe.id, draft, cost));
        }
        recipe
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(0.125), 0.13);
        assert_eq!(round_money(-0.125), -0.13);
        assert_eq!(round_money(0.325), 0.33);
        assert_eq!(round_money(2.5), 2.5);
        assert_eq!(round_money(1.005), 1.0);
    }

    #[test]
    fn test_cost_of_ingredient() {
        assert_eq!(cost_of_ingredient(10.0, 1000.0, 250.0).unwrap(), 2.5);
        assert_eq!(cost_of_ingredient(8.9, 12.0, 3.0).unwrap(), 2.23);
        assert_eq!(cost_of_ingredient(0.0, 500.0, 100.0).unwrap(), 0.0);
    }

    #[test]
    fn test_cost_of_ingredient_zero_package_quantity() {
        assert_eq!(
            cost_of_ingredient(10.0, 0.0, 250.0),
            Err(CostingError::DivisionByZero)
        );
    }

    #[test]
    fn test_cost_of_ingredient_non_finite() {
        assert_eq!(
            cost_of_ingredient(f64::NAN, 1000.0, 250.0),
            Err(CostingError::NonFinite {
                field: "package_price"
            })
        );
        assert_eq!(
            cost_of_ingredient(10.0, 1000.0, f64::INFINITY),
            Err(CostingError::NonFinite {
                field: "quantity_used"
            })
        );
    }

    #[test]
    fn test_cost_ingredients_keeps_order() {
        let drafts = [
            IngredientDraft::new("Milk", 395.0, "g", 7.5, 395.0),
            IngredientDraft::new("Cocoa", 30.0, "g", 9.0, 200.0),
        ];

        let lines = cost_ingredients("recipe-9", &drafts).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "Milk");
        assert_eq!(lines[0].cost, 7.5);
        assert_eq!(lines[1].cost, 1.35);
        assert!(lines.iter().all(|l| l.recipe_id == "recipe-9"));
    }

    #[test]
    fn test_single_ingredient_recipe() {
        let flour = IngredientDraft::new("Flour", 250.0, "g", 10.0, 1000.0);
        let mut recipe = recipe_with(10, 30.0, &[flour]);

        recompute_recipe_totals(&mut recipe);

        assert_eq!(recipe.total_cost, 2.5);
        assert_eq!(recipe.unit_cost, 0.25);
        // 0.25 * 1.30 = 0.325, rounded half away from zero
        assert_eq!(recipe.suggested_price, 0.33);
        assert_eq!(recipe.unit_profit, 0.08);
    }

    #[test]
    fn test_multi_ingredient_recipe() {
        let drafts = [
            IngredientDraft::new("Butter", 300.0, "g", 12.5, 1000.0),
            IngredientDraft::new("Eggs", 3.0, "un", 8.9, 12.0),
            IngredientDraft::new("Chocolate", 200.0, "g", 22.0, 1000.0),
        ];
        let mut recipe = recipe_with(24, 50.0, &drafts);

        recompute_recipe_totals(&mut recipe);

        assert_eq!(recipe.total_cost, 10.38);
        assert_eq!(recipe.unit_cost, 0.43);
        assert_eq!(recipe.suggested_price, 0.65);
        assert_eq!(recipe.unit_profit, 0.22);
    }

    #[test]
    fn test_zero_yield_prices_units_at_zero() {
        let flour = IngredientDraft::new("Flour", 250.0, "g", 10.0, 1000.0);
        for yield_quantity in [0, -3] {
            let mut recipe = recipe_with(yield_quantity, 30.0, &[flour.clone()]);

            recompute_recipe_totals(&mut recipe);

            assert_eq!(recipe.total_cost, 2.5);
            assert_eq!(recipe.unit_cost, 0.0);
            assert_eq!(recipe.suggested_price, 0.0);
            assert_eq!(recipe.unit_profit, 0.0);
        }
    }

    #[test]
    fn test_negative_margin_prices_below_cost() {
        let totals = RecipeTotals::from_costs([4.0], 1, -25.0);

        assert_eq!(totals.unit_cost, 4.0);
        assert_eq!(totals.suggested_price, 3.0);
        assert_eq!(totals.unit_profit, -1.0);
    }

    #[test]
    fn test_empty_recipe_has_zero_totals() {
        let totals = RecipeTotals::from_costs(std::iter::empty(), 10, 30.0);
        assert_eq!(totals, RecipeTotals::default());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let drafts = [
            IngredientDraft::new("Butter", 300.0, "g", 12.5, 1000.0),
            IngredientDraft::new("Eggs", 3.0, "un", 8.9, 12.0),
        ];
        let mut recipe = recipe_with(7, 35.0, &drafts);

        recompute_recipe_totals(&mut recipe);
        let first = recipe.clone();
        recompute_recipe_totals(&mut recipe);

        assert_eq!(recipe, first);
    }
}
