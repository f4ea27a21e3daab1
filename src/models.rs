//! Frontend Models
//!
//! Data structures matching backend payloads. Recipes arrive from several
//! endpoints with slightly different shapes, so deserialization is tolerant.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A field the backend sends either as one string or as a list of strings
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) if s.trim().is_empty() => Vec::new(),
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Read-only recipe projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecipeWire")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub description: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub nutritional_info: BTreeMap<String, String>,
    pub cooking_time_minutes: Option<u32>,
    pub difficulty: Option<String>,
    pub cuisine: Vec<String>,
    pub average_rating: f64,
    pub rating_count: u32,
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
struct RecipeWire {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    description: Option<OneOrMany>,
    #[serde(default, deserialize_with = "null_as_default")]
    ingredients: Vec<String>,
    #[serde(default)]
    instructions: Option<OneOrMany>,
    #[serde(default)]
    steps: Option<OneOrMany>,
    #[serde(default, deserialize_with = "null_as_default")]
    dietary_restrictions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    nutritional_info: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    cooking_time_minutes: Option<f64>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    cuisine: Option<OneOrMany>,
    #[serde(default)]
    average_rating: Option<f64>,
    #[serde(default)]
    rating_count: Option<f64>,
    #[serde(default)]
    user_id: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<RecipeWire> for Recipe {
    fn from(wire: RecipeWire) -> Self {
        // `instructions` wins over the authoring field `steps`
        let instructions = wire
            .instructions
            .map(OneOrMany::into_vec)
            .filter(|v| !v.is_empty())
            .or_else(|| wire.steps.map(OneOrMany::into_vec))
            .unwrap_or_default();

        let nutritional_info = wire
            .nutritional_info
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect();

        Self {
            id: wire.id,
            name: wire.name,
            image_url: wire.image_url.filter(|url| !url.trim().is_empty()),
            description: wire.description.map(OneOrMany::into_vec).unwrap_or_default(),
            ingredients: wire.ingredients,
            instructions,
            dietary_restrictions: wire.dietary_restrictions,
            nutritional_info,
            cooking_time_minutes: wire
                .cooking_time_minutes
                .filter(|m| *m > 0.0)
                .map(|m| m.round() as u32),
            difficulty: wire.difficulty.filter(|d| !d.trim().is_empty()),
            cuisine: wire.cuisine.map(OneOrMany::into_vec).unwrap_or_default(),
            average_rating: wire.average_rating.unwrap_or(0.0),
            rating_count: wire.rating_count.map(|c| c.max(0.0) as u32).unwrap_or(0),
            user_id: wire.user_id,
        }
    }
}

impl Recipe {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Untitled Recipe"
        } else {
            &self.name
        }
    }

    pub fn first_step(&self) -> Option<&str> {
        self.instructions.first().map(String::as_str)
    }
}

impl AsRef<Recipe> for Recipe {
    fn as_ref(&self) -> &Recipe {
        self
    }
}

/// Pantry-mode result: a recipe annotated by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    #[serde(default)]
    pub matching_ingredients: Vec<String>,
    #[serde(default)]
    pub missing_ingredients: Vec<String>,
}

/// One entry of the home result list
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeEntry {
    Plain(Recipe),
    Match(RecipeMatch),
}

impl RecipeEntry {
    pub fn recipe(&self) -> &Recipe {
        match self {
            RecipeEntry::Plain(recipe) => recipe,
            RecipeEntry::Match(m) => &m.recipe,
        }
    }

    pub fn matching(&self) -> &[String] {
        match self {
            RecipeEntry::Plain(_) => &[],
            RecipeEntry::Match(m) => &m.matching_ingredients,
        }
    }

    pub fn missing(&self) -> &[String] {
        match self {
            RecipeEntry::Plain(_) => &[],
            RecipeEntry::Match(m) => &m.missing_ingredients,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, RecipeEntry::Match(_))
    }
}

impl AsRef<Recipe> for RecipeEntry {
    fn as_ref(&self) -> &Recipe {
        self.recipe()
    }
}

/// Ingredient catalog group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientCategory {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// A comment left on a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(alias = "username", default = "anonymous")]
    pub user: String,
    pub text: String,
}

fn anonymous() -> String {
    "Anonymous".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatingResult {
    pub new_average: f64,
    pub rating_count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookmarkStatus {
    pub is_bookmarked: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecognizedIngredients {
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Authoring payload for `POST /users/me/recipes`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecipe {
    pub name: String,
    pub cooking_time_minutes: u32,
    pub difficulty: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub nutritional_info: BTreeMap<String, String>,
    pub image_url: String,
}

/// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl UserIdentity {
    pub fn display_label(&self) -> String {
        self.display_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "You".to_string())
    }
}

/// Profile document stored at `users/{uid}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub photo_url: String,
}

impl UserProfile {
    /// Profile created on first sign-in; the display name falls back to the
    /// local part of the email address.
    pub fn for_new_user(user: &UserIdentity) -> Self {
        let display_name = user
            .display_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                user.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(str::to_string)
            })
            .unwrap_or_default();
        Self {
            uid: user.id.clone(),
            email: user.email.clone(),
            display_name,
            photo_url: user.photo_url.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_instructions_string_normalized() {
        let json = r#"{"id": "r1", "name": "Toast", "instructions": "Toast the bread"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.instructions, vec!["Toast the bread".to_string()]);
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.average_rating, 0.0);
        assert_eq!(recipe.rating_count, 0);
    }

    #[test]
    fn test_recipe_steps_fallback() {
        let json = r#"{"id": "r2", "name": "Soup", "steps": ["Boil", "Stir"]}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.instructions, vec!["Boil".to_string(), "Stir".to_string()]);
        assert_eq!(recipe.first_step(), Some("Boil"));
    }

    #[test]
    fn test_recipe_cuisine_shapes() {
        let single: Recipe = serde_json::from_str(r#"{"id": "a", "cuisine": "Italian"}"#).unwrap();
        assert_eq!(single.cuisine, vec!["Italian".to_string()]);

        let many: Recipe =
            serde_json::from_str(r#"{"id": "b", "cuisine": ["Italian", "Thai"]}"#).unwrap();
        assert_eq!(many.cuisine.len(), 2);

        let absent: Recipe = serde_json::from_str(r#"{"id": "c"}"#).unwrap();
        assert!(absent.cuisine.is_empty());
    }

    #[test]
    fn test_recipe_null_and_numeric_fields() {
        let json = r#"{
            "id": "r3",
            "name": "",
            "ingredients": null,
            "nutritional_info": {"calories": 250, "protein": "10g"},
            "cooking_time_minutes": 45,
            "average_rating": 4.5,
            "rating_count": 12,
            "image_url": ""
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.nutritional_info.get("calories").map(String::as_str), Some("250"));
        assert_eq!(recipe.nutritional_info.get("protein").map(String::as_str), Some("10g"));
        assert_eq!(recipe.cooking_time_minutes, Some(45));
        assert_eq!(recipe.rating_count, 12);
        assert!(recipe.image_url.is_none());
        assert_eq!(recipe.display_name(), "Untitled Recipe");
    }

    #[test]
    fn test_recipe_match_payload() {
        let json = r#"[{
            "recipe": {"id": "r1", "name": "Pancakes", "ingredients": ["egg", "flour", "milk"]},
            "matching_ingredients": ["egg", "flour"],
            "missing_ingredients": ["milk"]
        }]"#;
        let matches: Vec<RecipeMatch> = serde_json::from_str(json).unwrap();
        let entry = RecipeEntry::Match(matches[0].clone());
        assert!(entry.is_match());
        assert_eq!(entry.recipe().name, "Pancakes");
        assert_eq!(entry.matching(), &["egg".to_string(), "flour".to_string()]);
        assert_eq!(entry.missing(), &["milk".to_string()]);
    }

    #[test]
    fn test_feedback_username_alias() {
        let json = r#"{"user_id": "u1", "username": "Ada", "text": "Lovely", "created_at": "2024-01-01T00:00:00Z"}"#;
        let feedback: Feedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.user, "Ada");
        assert_eq!(feedback.text, "Lovely");
    }

    #[test]
    fn test_profile_for_new_user() {
        let user = UserIdentity {
            id: "uid-1".to_string(),
            display_name: None,
            email: Some("cook@example.com".to_string()),
            photo_url: None,
        };
        let profile = UserProfile::for_new_user(&user);
        assert_eq!(profile.uid, "uid-1");
        assert_eq!(profile.display_name, "cook");
        assert_eq!(profile.photo_url, "");
        assert_eq!(user.display_label(), "You");
    }
}
