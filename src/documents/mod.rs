//! Document Store
//!
//! Per-user profile documents and saved-item subcollections, addressed by
//! slash-separated paths such as `users/{uid}/saved_recipes`.

mod firestore;
mod profile;
pub mod value;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;

pub use firestore::Firestore;
pub use profile::{create_profile, ensure_profile, load_profile, remove_saved_recipe, saved_recipes, update_profile};

pub type Fields = Map<String, Value>;

/// A document read from a collection listing
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Last path segment
    pub id: String,
    pub fields: Fields,
}

#[async_trait(?Send)]
pub trait DocumentStore {
    /// `Ok(None)` when the document does not exist
    async fn get(&self, path: &str) -> Result<Option<Fields>, StoreError>;

    /// Create or overwrite the whole document
    async fn set(&self, path: &str, fields: &Fields) -> Result<(), StoreError>;

    /// Overwrite only the given fields of an existing document
    async fn update(&self, path: &str, fields: &Fields) -> Result<(), StoreError>;

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

pub fn user_path(uid: &str) -> String {
    format!("users/{}", uid)
}

pub fn saved_recipes_path(uid: &str) -> String {
    format!("users/{}/saved_recipes", uid)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// In-memory store keyed by full document path
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub docs: RefCell<BTreeMap<String, Fields>>,
    }

    #[async_trait(?Send)]
    impl DocumentStore for MemoryStore {
        async fn get(&self, path: &str) -> Result<Option<Fields>, StoreError> {
            Ok(self.docs.borrow().get(path).cloned())
        }

        async fn set(&self, path: &str, fields: &Fields) -> Result<(), StoreError> {
            self.docs.borrow_mut().insert(path.to_string(), fields.clone());
            Ok(())
        }

        async fn update(&self, path: &str, fields: &Fields) -> Result<(), StoreError> {
            let mut docs = self.docs.borrow_mut();
            let doc = docs
                .get_mut(path)
                .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
            for (k, v) in fields {
                doc.insert(k.clone(), v.clone());
            }
            Ok(())
        }

        async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
            let prefix = format!("{}/", collection);
            Ok(self
                .docs
                .borrow()
                .iter()
                .filter_map(|(path, fields)| {
                    let id = path.strip_prefix(&prefix)?;
                    (!id.contains('/')).then(|| Document {
                        id: id.to_string(),
                        fields: fields.clone(),
                    })
                })
                .collect())
        }

        async fn delete(&self, path: &str) -> Result<(), StoreError> {
            self.docs.borrow_mut().remove(path);
            Ok(())
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(user_path("u1"), "users/u1");
        assert_eq!(saved_recipes_path("u1"), "users/u1/saved_recipes");
    }
}
