//! Core entity definitions for recipe costing.
//!
//! This crate defines the data types shared by the costing calculator and the
//! recipe store: recipes with their derived pricing fields, the ingredient
//! lines they own, the draft inputs used to create or replace them, and the
//! user accounts that scope them.

mod ingredient;
mod recipe;
mod user;

pub use ingredient::*;
pub use recipe::*;
pub use user::*;

/// Profit margin (percent) applied when a draft does not specify one.
pub const DEFAULT_PROFIT_MARGIN: f64 = 30.0;
