//! Draft validation.
//!
//! Drafts are checked before any arithmetic or persistence so that a bad
//! package quantity can never reach the cost division or leave a half-written
//! recipe behind.

use entities::{IngredientDraft, RecipeDraft};

use crate::{CostingError, CostingResult};

/// Validates a recipe draft and every ingredient line in it.
///
/// `yield_quantity` is not checked; a non-positive yield prices per-unit
/// fields at zero.
pub fn validate_draft(draft: &RecipeDraft) -> CostingResult<()> {
    if draft.name.trim().is_empty() {
        return Err(CostingError::invalid("name", "must not be empty"));
    }
    if let Some(margin) = draft.profit_margin {
        if !margin.is_finite() {
            return Err(CostingError::invalid(
                "profit_margin",
                "must be a finite number",
            ));
        }
    }
    for (index, ingredient) in draft.ingredients.iter().enumerate() {
        validate_ingredient(ingredient).map_err(|(field, reason)| {
            CostingError::invalid(format!("ingredients[{index}].{field}"), reason)
        })?;
    }
    Ok(())
}

fn validate_ingredient(draft: &IngredientDraft) -> Result<(), (&'static str, &'static str)> {
    if draft.name.trim().is_empty() {
        return Err(("name", "must not be empty"));
    }

    let numbers = [
        ("quantity_used", draft.quantity_used),
        ("package_price", draft.package_price),
        ("package_quantity", draft.package_quantity),
    ];
    if let Some((field, _)) = numbers.into_iter().find(|(_, value)| !value.is_finite()) {
        return Err((field, "must be a finite number"));
    }

    if draft.quantity_used <= 0.0 {
        return Err(("quantity_used", "must be greater than zero"));
    }
    if draft.package_price < 0.0 {
        return Err(("package_price", "must not be negative"));
    }
    if draft.package_quantity <= 0.0 {
        return Err(("package_quantity", "must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flour() -> IngredientDraft {
        IngredientDraft::new("Flour", 250.0, "g", 10.0, 1000.0)
    }

    fn field_of(err: CostingError) -> String {
        match err {
            CostingError::InvalidInput { field, .. } => field,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_valid_draft() {
        let draft = RecipeDraft::new("Bread", 0)
            .with_profit_margin(-10.0)
            .with_ingredient(flour())
            .with_ingredient(IngredientDraft::new("Salt", 5.0, "g", 0.0, 1000.0));

        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn test_rejects_empty_names() {
        let err = validate_draft(&RecipeDraft::new("  ", 10)).unwrap_err();
        assert_eq!(field_of(err), "name");

        let mut nameless = flour();
        nameless.name.clear();
        let err = validate_draft(&RecipeDraft::new("Bread", 10).with_ingredient(nameless));
        assert_eq!(field_of(err.unwrap_err()), "ingredients[0].name");
    }

    #[test]
    fn test_rejects_zero_package_quantity() {
        let draft = RecipeDraft::new("Bread", 10)
            .with_ingredient(flour())
            .with_ingredient(IngredientDraft::new("Yeast", 10.0, "g", 4.0, 0.0));

        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(field_of(err), "ingredients[1].package_quantity");
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let cases = [
            (
                IngredientDraft::new("A", 0.0, "g", 1.0, 1.0),
                "ingredients[0].quantity_used",
            ),
            (
                IngredientDraft::new("A", 1.0, "g", -1.0, 1.0),
                "ingredients[0].package_price",
            ),
            (
                IngredientDraft::new("A", 1.0, "g", 1.0, -5.0),
                "ingredients[0].package_quantity",
            ),
            (
                IngredientDraft::new("A", f64::NAN, "g", 1.0, 1.0),
                "ingredients[0].quantity_used",
            ),
        ];

        for (ingredient, field) in cases {
            let draft = RecipeDraft::new("Bread", 10).with_ingredient(ingredient);
            assert_eq!(field_of(validate_draft(&draft).unwrap_err()), field);
        }
    }

    #[test]
    fn test_rejects_non_finite_margin() {
        let draft = RecipeDraft::new("Bread", 10).with_profit_margin(f64::INFINITY);
        assert_eq!(field_of(validate_draft(&draft).unwrap_err()), "profit_margin");
    }
}
