//! In-memory recipe store implementation for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use costing::{cost_ingredients, recompute_recipe_totals, validate_draft, PricingDefaults};
use entities::{Recipe, RecipeDraft, RecipeSummary, User};
use tokio::sync::RwLock;

use crate::{
    RecipeFilter, RecipeStore, RecipeStoreError, StoreConfig, StoreResult, DEFAULT_PAGE_LIMIT,
};

/// A stored recipe and its insertion sequence, used to break ordering ties.
#[derive(Debug)]
struct StoredRecipe {
    seq: u64,
    recipe: Recipe,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<String, User>,
    recipes: HashMap<String, StoredRecipe>,
    next_seq: u64,
}

impl MemoryState {
    fn owned_recipe_mut(&mut self, id: &str, owner_id: &str) -> Option<&mut Recipe> {
        self.recipes
            .get_mut(id)
            .map(|stored| &mut stored.recipe)
            .filter(|recipe| recipe.owner_id == owner_id)
    }
}

/// In-memory recipe store.
///
/// A single lock guards users and recipes together, so every operation is
/// atomic with respect to concurrent readers.
#[derive(Debug)]
pub struct MemoryRecipeStore {
    state: RwLock<MemoryState>,
    defaults: PricingDefaults,
    default_page_limit: u32,
}

impl Default for MemoryRecipeStore {
    fn default() -> Self {
        Self::with_defaults(PricingDefaults::default(), DEFAULT_PAGE_LIMIT)
    }
}

impl MemoryRecipeStore {
    /// Creates a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with explicit pricing defaults and page size.
    pub fn with_defaults(defaults: PricingDefaults, default_page_limit: u32) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            defaults,
            default_page_limit,
        }
    }

    /// Creates a store from configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_defaults(config.pricing_defaults(), config.default_page_limit)
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(RecipeStoreError::already_exists("User", &user.email));
        }
        if state.users.contains_key(&user.id) {
            return Err(RecipeStoreError::already_exists("User", &user.id));
        }
        state.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.users.remove(id).is_none() {
            return Ok(false);
        }
        state.recipes.retain(|_, stored| stored.recipe.owner_id != id);
        Ok(true)
    }

    async fn create_recipe(&self, owner_id: &str, draft: &RecipeDraft) -> StoreResult<Recipe> {
        validate_draft(draft)?;

        let mut recipe = Recipe::new(owner_id, draft, self.defaults.profit_margin_for(draft));
        recipe.ingredients = cost_ingredients(&recipe.id, &draft.ingredients)?;
        recompute_recipe_totals(&mut recipe);

        let mut state = self.state.write().await;
        if !state.users.contains_key(owner_id) {
            return Err(RecipeStoreError::ForeignKeyViolation(format!(
                "Recipe references a missing row: {owner_id}"
            )));
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.recipes.insert(
            recipe.id.clone(),
            StoredRecipe {
                seq,
                recipe: recipe.clone(),
            },
        );

        tracing::info!(
            recipe_id = %recipe.id,
            owner_id = %owner_id,
            ingredient_count = recipe.ingredients.len(),
            "Recipe created"
        );

        Ok(recipe)
    }

    async fn get_recipe(&self, id: &str, owner_id: &str) -> StoreResult<Option<Recipe>> {
        let state = self.state.read().await;
        Ok(state
            .recipes
            .get(id)
            .map(|stored| &stored.recipe)
            .filter(|recipe| recipe.owner_id == owner_id)
            .cloned())
    }

    async fn list_recipes(
        &self,
        owner_id: &str,
        filter: &RecipeFilter,
    ) -> StoreResult<Vec<RecipeSummary>> {
        let (offset, limit) = filter.page(self.default_page_limit);

        let state = self.state.read().await;
        let mut owned: Vec<&StoredRecipe> = state
            .recipes
            .values()
            .filter(|stored| stored.recipe.owner_id == owner_id)
            .collect();
        owned.sort_by(|a, b| {
            a.recipe
                .created_at
                .cmp(&b.recipe.created_at)
                .then(a.seq.cmp(&b.seq))
        });

        Ok(owned
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|stored| stored.recipe.summary())
            .collect())
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

        let mut state = self.state.write().await;
        let Some(recipe) = state.owned_recipe_mut(id, owner_id) else {
            tracing::debug!(recipe_id = %id, owner_id = %owner_id, "Recipe not found for update");
            return Ok(None);
        };

        recipe.apply_draft(draft, profit_margin);
        recipe.ingredients = ingredients;
        recompute_recipe_totals(recipe);

        tracing::info!(
            recipe_id = %id,
            owner_id = %owner_id,
            ingredient_count = recipe.ingredients.len(),
            "Recipe updated"
        );

        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe(&self, id: &str, owner_id: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.owned_recipe_mut(id, owner_id).is_none() {
            return Ok(false);
        }
        state.recipes.remove(id);

        tracing::info!(recipe_id = %id, owner_id = %owner_id, "Recipe deleted");
        Ok(true)
    }
}
