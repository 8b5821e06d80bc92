//! Recipe store trait and list filter.

use async_trait::async_trait;
use entities::{Recipe, RecipeDraft, RecipeSummary, User};

use crate::StoreResult;

/// Page size used when a filter sets no limit.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Pagination for recipe listings.
///
/// Listings are ordered by creation time, oldest first, with ties broken by
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Number of recipes to skip.
    pub offset: Option<u32>,
    /// Maximum number of recipes to return.
    pub limit: Option<u32>,
}

impl RecipeFilter {
    /// Creates a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips the first `offset` recipes
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Caps the page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `(offset, limit)`, falling back to `default_limit`.
    pub fn page(&self, default_limit: u32) -> (u32, u32) {
        (self.offset.unwrap_or(0), self.limit.unwrap_or(default_limit))
    }
}

/// Trait for recipe storage operations.
///
/// Every recipe operation is scoped by `owner_id`: a recipe owned by another
/// user behaves exactly like a missing one.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    // ========== User Operations ==========

    /// Creates a new user. Fails if the email is already taken.
    async fn create_user(&self, user: &User) -> StoreResult<()>;

    /// Gets a user by ID
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;

    /// Gets a user by email
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Deletes a user together with all of their recipes
    async fn delete_user(&self, id: &str) -> StoreResult<bool>;

    // ========== Recipe Operations ==========

    /// Creates a recipe from a draft, costing every ingredient and computing
    /// the recipe totals before returning.
    async fn create_recipe(&self, owner_id: &str, draft: &RecipeDraft) -> StoreResult<Recipe>;

    /// Gets a recipe with its ingredients
    async fn get_recipe(&self, id: &str, owner_id: &str) -> StoreResult<Option<Recipe>>;

    /// Lists an owner's recipes, one page at a time
    async fn list_recipes(
        &self,
        owner_id: &str,
        filter: &RecipeFilter,
    ) -> StoreResult<Vec<RecipeSummary>>;

    /// Replaces a recipe's base fields and its entire ingredient list.
    ///
    /// Existing ingredient lines are deleted, not merged, so their IDs do not
    /// survive an update. Returns `None` without writing anything if the
    /// recipe is not found for this owner.
    async fn update_recipe(
        &self,
        id: &str,
        owner_id: &str,
        draft: &RecipeDraft,
    ) -> StoreResult<Option<Recipe>>;

    /// Deletes a recipe and its ingredients. Returns false if not found.
    async fn delete_recipe(&self, id: &str, owner_id: &str) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_page_defaults() {
        assert_eq!(RecipeFilter::new().page(DEFAULT_PAGE_LIMIT), (0, 100));

        let filter = RecipeFilter::new().with_offset(20).with_limit(10);
        assert_eq!(filter.page(DEFAULT_PAGE_LIMIT), (20, 10));
    }
}
