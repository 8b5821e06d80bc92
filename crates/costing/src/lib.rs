//! Recipe costing.
//!
//! Converts ingredient purchase data (package price and quantity) into the
//! cost of the amount a recipe consumes, and aggregates those costs into the
//! recipe's total cost, unit cost, suggested price and unit profit.
//!
//! All monetary values are rounded to two decimal places with
//! [`round_money`], which rounds half away from zero.

mod calculator;
mod error;
mod validate;

pub use calculator::*;
pub use error::*;
pub use validate::*;

/// Pricing defaults injected into the recipe stores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingDefaults {
    /// Markup percentage used when a draft leaves it unset.
    pub profit_margin: f64,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            profit_margin: entities::DEFAULT_PROFIT_MARGIN,
        }
    }
}

impl PricingDefaults {
    /// Sets the default profit margin.
    pub fn with_profit_margin(mut self, profit_margin: f64) -> Self {
        self.profit_margin = profit_margin;
        self
    }

    /// Resolves the margin a draft should be priced with.
    pub fn profit_margin_for(&self, draft: &entities::RecipeDraft) -> f64 {
        draft.profit_margin.unwrap_or(self.profit_margin)
    }
}

#[cfg(test)]
mod tests {
    use entities::RecipeDraft;

    use super::*;

    #[test]
    fn test_pricing_defaults_resolve_margin() {
        let defaults = PricingDefaults::default();
        assert_eq!(defaults.profit_margin, 30.0);

        let defaults = defaults.with_profit_margin(40.0);
        let unset = RecipeDraft::new("Cookies", 12);
        let explicit = RecipeDraft::new("Cookies", 12).with_profit_margin(0.0);

        assert_eq!(defaults.profit_margin_for(&unset), 40.0);
        assert_eq!(defaults.profit_margin_for(&explicit), 0.0);
    }
}
