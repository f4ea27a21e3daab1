//! Library State Store
//!
//! Per-user recipe collections with field-level reactivity via
//! reactive_stores.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::Recipe;

/// Signed-in user's collections
#[derive(Clone, Debug, Default, Store)]
pub struct LibraryState {
    /// Backend bookmarks
    pub bookmarks: Vec<Recipe>,
    /// Recipes the user authored
    pub my_recipes: Vec<Recipe>,
    /// Document-store wishlist
    pub saved_recipes: Vec<Recipe>,
    /// Recipe ids with a delete request in flight
    pub deleting: Vec<String>,
}

pub type LibraryStore = Store<LibraryState>;

/// Get the library store from context
pub fn use_library() -> LibraryStore {
    expect_context::<LibraryStore>()
}

/// Drop the recipe with `id`, returning whether one was removed
pub fn remove_by_id(list: &mut Vec<Recipe>, id: &str) -> bool {
    let before = list.len();
    list.retain(|r| r.id != id);
    list.len() != before
}

/// Insert at the front, replacing an older copy with the same id
pub fn prepend_unique(list: &mut Vec<Recipe>, recipe: Recipe) {
    remove_by_id(list, &recipe.id);
    list.insert(0, recipe);
}

/// Mark or clear an in-flight delete; returns false if already marked
pub fn mark_in_flight(ids: &mut Vec<String>, id: &str, in_flight: bool) -> bool {
    let present = ids.iter().any(|i| i == id);
    match (in_flight, present) {
        (true, true) => false,
        (true, false) => {
            ids.push(id.to_string());
            true
        }
        (false, _) => {
            ids.retain(|i| i != id);
            true
        }
    }
}

// ========================
// Store Helper Functions
// ========================

pub fn store_remove_bookmark(store: &LibraryStore, recipe_id: &str) {
    remove_by_id(&mut store.bookmarks().write(), recipe_id);
}

pub fn store_prepend_my_recipe(store: &LibraryStore, recipe: Recipe) {
    prepend_unique(&mut store.my_recipes().write(), recipe);
}

pub fn store_remove_my_recipe(store: &LibraryStore, recipe_id: &str) {
    remove_by_id(&mut store.my_recipes().write(), recipe_id);
}

pub fn store_remove_saved_recipe(store: &LibraryStore, recipe_id: &str) {
    remove_by_id(&mut store.saved_recipes().write(), recipe_id);
}

/// Returns false when a delete for this id is already running
pub fn store_begin_delete(store: &LibraryStore, recipe_id: &str) -> bool {
    mark_in_flight(&mut store.deleting().write(), recipe_id, true)
}

pub fn store_end_delete(store: &LibraryStore, recipe_id: &str) {
    mark_in_flight(&mut store.deleting().write(), recipe_id, false);
}

pub fn store_is_deleting(store: &LibraryStore, recipe_id: &str) -> bool {
    store.deleting().read().iter().any(|i| i == recipe_id)
}

/// Forget everything tied to the previous user
pub fn store_clear(store: &LibraryStore) {
    store.set(LibraryState::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str) -> Recipe {
        serde_json::from_value(serde_json::json!({"id": id, "name": id})).unwrap()
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = vec![recipe("a"), recipe("b")];
        assert!(remove_by_id(&mut list, "a"));
        assert!(!remove_by_id(&mut list, "zzz"));
        assert_eq!(list, vec![recipe("b")]);
    }

    #[test]
    fn test_prepend_unique_moves_to_front() {
        let mut list = vec![recipe("a"), recipe("b")];
        prepend_unique(&mut list, recipe("c"));
        prepend_unique(&mut list, recipe("b"));
        let ids: Vec<&str> = list.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_in_flight_tracking_per_id() {
        let mut ids = Vec::new();
        assert!(mark_in_flight(&mut ids, "a", true));
        assert!(!mark_in_flight(&mut ids, "a", true));
        assert!(mark_in_flight(&mut ids, "b", true));
        mark_in_flight(&mut ids, "a", false);
        assert_eq!(ids, vec!["b".to_string()]);
    }
}
