//! Recipes authored by the signed-in user

use super::{encode_component, ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{NewRecipe, Recipe};

impl ApiClient {
    pub async fn my_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let request = self.http.get(self.url("/users/me/recipes"));
        self.send(request, Auth::Optional).await
    }

    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, ApiError> {
        let request = self.http.post(self.url("/users/me/recipes")).json(recipe);
        self.send(request, Auth::Optional).await
    }

    pub async fn delete_recipe(&self, recipe_id: &str) -> Result<(), ApiError> {
        let path = format!("/users/me/recipes/{}", encode_component(recipe_id));
        let request = self.http.delete(self.url(&path));
        self.send_empty(request, Auth::Optional).await
    }
}
