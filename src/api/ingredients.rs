//! Ingredient catalog and featured recipes

use super::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{IngredientCategory, Recipe};

impl ApiClient {
    /// Category → items catalog for the pantry sidebar
    pub async fn ingredient_catalog(&self) -> Result<Vec<IngredientCategory>, ApiError> {
        let request = self.http.get(self.url("/ingredients"));
        self.send(request, Auth::Optional).await
    }

    /// Chef's-choice list shown while the pantry is empty
    pub async fn chefs_choice(&self) -> Result<Vec<Recipe>, ApiError> {
        let request = self.http.get(self.url("/chefs-choice"));
        self.send(request, Auth::None).await
    }
}
