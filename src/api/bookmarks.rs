//! Bookmark Commands

use super::{encode_component, ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{BookmarkStatus, Recipe};

impl ApiClient {
    pub async fn bookmarks(&self) -> Result<Vec<Recipe>, ApiError> {
        let request = self.http.get(self.url("/users/me/bookmarks"));
        self.send(request, Auth::Optional).await
    }

    pub async fn add_bookmark(&self, recipe_id: &str) -> Result<(), ApiError> {
        let path = format!("/users/me/bookmarks/{}", encode_component(recipe_id));
        let request = self.http.post(self.url(&path)).json(&serde_json::json!({}));
        self.send_empty(request, Auth::Optional).await
    }

    pub async fn remove_bookmark(&self, recipe_id: &str) -> Result<(), ApiError> {
        let path = format!("/users/me/bookmarks/{}", encode_component(recipe_id));
        let request = self.http.delete(self.url(&path));
        self.send_empty(request, Auth::Optional).await
    }

    pub async fn is_bookmarked(&self, recipe_id: &str) -> Result<bool, ApiError> {
        let path = format!("/users/me/bookmarks/check/{}", encode_component(recipe_id));
        let request = self.http.get(self.url(&path));
        let status: BookmarkStatus = self.send(request, Auth::Optional).await?;
        Ok(status.is_bookmarked)
    }

    /// Add or remove depending on the current state; returns the new state
    pub async fn toggle_bookmark(&self, recipe_id: &str, bookmarked: bool) -> Result<bool, ApiError> {
        if bookmarked {
            self.remove_bookmark(recipe_id).await?;
            Ok(false)
        } else {
            self.add_bookmark(recipe_id).await?;
            Ok(true)
        }
    }
}
