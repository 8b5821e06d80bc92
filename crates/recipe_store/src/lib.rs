//! Recipe storage for bakery costing.
//!
//! This crate owns the lifecycle of recipes and their ingredient lines:
//! create, scoped read, full-replace update and delete. Every mutation costs
//! the ingredients and recomputes the recipe totals inside a single
//! transaction, so a reader never sees totals that disagree with the stored
//! ingredient list. Two backends are provided: SQLite (via sqlx) and an
//! in-memory store for tests and embedding.

mod config;
mod error;
mod memory;
mod schema;
mod sqlite;
mod store;


pub use config::*;
pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use store::*;
