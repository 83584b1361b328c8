//! Recipe value types.
//!
//! These are plain values: they carry no id and no identity of their own. The
//! store key is derived from [`Recipe::name`] once, at creation time.

use serde::{Deserialize, Serialize};

/// A recipe as sent and received on the wire.
///
/// ```json
/// {"name": "Tomato Soup", "ingredients": [{"name": "tomato"}]}
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ingredient {
    pub name: String,
}

impl Recipe {
    pub fn new(name: impl Into<String>, ingredients: impl IntoIterator<Item = Ingredient>) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into_iter().collect(),
        }
    }
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
