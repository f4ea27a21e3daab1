//! Profile and wishlist documents

use serde_json::Value;

use super::{saved_recipes_path, user_path, DocumentStore, Fields};
use crate::error::StoreError;
use crate::models::{Recipe, UserIdentity, UserProfile};

fn to_fields<T: serde::Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Decode(format!("expected an object, got {}", other))),
        Err(e) => Err(StoreError::Decode(e.to_string())),
    }
}

fn from_fields<T: serde::de::DeserializeOwned>(fields: Fields) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| StoreError::Decode(e.to_string()))
}

pub async fn load_profile(store: &dyn DocumentStore, uid: &str) -> Result<UserProfile, StoreError> {
    let path = user_path(uid);
    match store.get(&path).await? {
        Some(fields) => from_fields(fields),
        None => Err(StoreError::NotFound("User profile not found in database.".to_string())),
    }
}

/// Write the initial profile document, overwriting any existing one
pub async fn create_profile(store: &dyn DocumentStore, user: &UserIdentity) -> Result<UserProfile, StoreError> {
    let profile = UserProfile::for_new_user(user);
    store.set(&user_path(&user.id), &to_fields(&profile)?).await?;
    log::info!("created profile document for {}", user.id);
    Ok(profile)
}

/// Create the profile only when none exists yet
pub async fn ensure_profile(store: &dyn DocumentStore, user: &UserIdentity) -> Result<UserProfile, StoreError> {
    match store.get(&user_path(&user.id)).await? {
        Some(fields) => from_fields(fields),
        None => create_profile(store, user).await,
    }
}

pub async fn update_profile(
    store: &dyn DocumentStore,
    uid: &str,
    display_name: &str,
    photo_url: &str,
) -> Result<(), StoreError> {
    let mut fields = Fields::new();
    fields.insert("display_name".to_string(), Value::String(display_name.trim().to_string()));
    fields.insert("photo_url".to_string(), Value::String(photo_url.trim().to_string()));
    store.update(&user_path(uid), &fields).await
}

/// Wishlist entries; the document id is the recipe id
pub async fn saved_recipes(store: &dyn DocumentStore, uid: &str) -> Result<Vec<Recipe>, StoreError> {
    let docs = store.list(&saved_recipes_path(uid)).await?;
    let mut recipes = Vec::with_capacity(docs.len());
    for doc in docs {
        let mut fields = doc.fields;
        fields.insert("id".to_string(), Value::String(doc.id));
        match from_fields::<Recipe>(fields) {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => log::warn!("skipping unreadable saved recipe: {}", e),
        }
    }
    Ok(recipes)
}

pub async fn remove_saved_recipe(store: &dyn DocumentStore, uid: &str, recipe_id: &str) -> Result<(), StoreError> {
    store
        .delete(&format!("{}/{}", saved_recipes_path(uid), recipe_id))
        .await
}
