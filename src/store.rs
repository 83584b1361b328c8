//! The recipe store.
//!
//! [`RecipeStore`] is the capability the dispatcher depends on. [`MemStore`]
//! is the only production implementation: a `HashMap` behind one `RwLock`,
//! constructed by the caller and shared as `Arc<dyn RecipeStore>`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use crate::model::Recipe;

/// Failures a store can report.
///
/// Stores know nothing about HTTP. The dispatcher decides what each variant
/// means to a client.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StoreError {
    #[error("recipe `{id}` not found")]
    NotFound { id: String },

    /// A writer panicked while holding the lock; the map may be inconsistent.
    #[error("recipe store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_owned() }
    }
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

/// Keyed CRUD over recipes.
///
/// Each call is atomic on its own. Nothing spans two calls.
pub trait RecipeStore: Send + Sync {
    /// Inserts `recipe` under `id`, replacing any record already there.
    fn add(&self, id: &str, recipe: Recipe) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Recipe, StoreError>;

    /// A snapshot of every record. Iteration order is unspecified.
    fn list(&self) -> Result<HashMap<String, Recipe>, StoreError>;

    /// Replaces the record under `id`. Never creates one.
    fn update(&self, id: &str, recipe: Recipe) -> Result<(), StoreError>;

    fn remove(&self, id: &str) -> Result<(), StoreError>;
}

/// In-memory [`RecipeStore`].
///
/// Readers share the lock; `add`, `update` and `remove` hold it exclusively
/// for the whole operation, so a reader sees each key either before or after
/// a write, never halfway.
#[derive(Debug, Default)]
pub struct MemStore {
    recipes: RwLock<HashMap<String, Recipe>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecipeStore for MemStore {
    fn add(&self, id: &str, recipe: Recipe) -> Result<(), StoreError> {
        self.recipes.write()?.insert(id.to_owned(), recipe);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Recipe, StoreError> {
        self.recipes
            .read()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn list(&self) -> Result<HashMap<String, Recipe>, StoreError> {
        Ok(self.recipes.read()?.clone())
    }

    fn update(&self, id: &str, recipe: Recipe) -> Result<(), StoreError> {
        match self.recipes.write()?.get_mut(id) {
            Some(slot) => {
                *slot = recipe;
                Ok(())
            }
            None => Err(StoreError::not_found(id)),
        }
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.recipes
            .write()?
            .remove(id)
            .map(drop)
            .ok_or_else(|| StoreError::not_found(id))
    }
}
