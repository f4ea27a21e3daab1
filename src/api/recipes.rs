//! Recipe Commands
//!
//! Pantry matching, text search, single-recipe lookup and rating.

use serde::Serialize;

use super::{encode_component, ApiClient, Auth};
use crate::error::ApiError;
use crate::filters::RecipeFilters;
use crate::models::{RatingResult, Recipe, RecipeMatch};

#[derive(Serialize)]
struct GenerateArgs<'a> {
    available_ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<&'a RecipeFilters>,
}

#[derive(Serialize)]
struct RateArgs {
    rating: u8,
}

/// Ratings are whole stars from 1 to 5
pub fn validate_rating(rating: u8) -> Result<u8, ApiError> {
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        Err(ApiError::Validation(format!("Rating must be between 1 and 5, got {}", rating)))
    }
}

impl ApiClient {
    /// Recipes ranked against the pantry, annotated with matching and
    /// missing ingredients
    pub async fn generate_recipes(
        &self,
        ingredients: &[String],
        filters: Option<&RecipeFilters>,
    ) -> Result<Vec<RecipeMatch>, ApiError> {
        let args = GenerateArgs {
            available_ingredients: ingredients.iter().map(|i| i.trim().to_lowercase()).collect(),
            filters,
        };
        let request = self.http.post(self.url("/generate-recipes")).json(&args);
        self.send(request, Auth::Optional).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Recipe>, ApiError> {
        let path = format!("/search?query={}", encode_component(query));
        let request = self.http.get(self.url(&path));
        self.send(request, Auth::None).await
    }

    pub async fn recipe(&self, recipe_id: &str) -> Result<Recipe, ApiError> {
        let path = format!("/recipes/{}", encode_component(recipe_id));
        let request = self.http.get(self.url(&path));
        self.send(request, Auth::None).await
    }

    /// Submit a star rating; out-of-range values are never sent
    pub async fn rate_recipe(&self, recipe_id: &str, rating: u8) -> Result<RatingResult, ApiError> {
        let rating = validate_rating(rating)?;
        let path = format!("/recipes/{}/rate", encode_component(recipe_id));
        let request = self.http.post(self.url(&path)).json(&RateArgs { rating });
        self.send(request, Auth::Required).await
    }
}
