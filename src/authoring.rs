//! Recipe Authoring
//!
//! Form state for the create-recipe dialog and its validation into the
//! backend payload.

use std::collections::BTreeMap;

use crate::filters::Difficulty;
use crate::models::NewRecipe;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";
pub const IMAGE_UPLOAD_FAILED_MESSAGE: &str = "Failed to upload image.";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to submit recipe.";

/// Dietary checkboxes offered when authoring
pub const AUTHORING_DIETARY_OPTIONS: &[&str] = &["Vegan", "Vegetarian", "Gluten-Free", "Dairy-Free", "Nut-Free"];

/// Which dynamic list an edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rows {
    Ingredients,
    Steps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    /// Raw text of the cooking-time input
    pub cooking_time: String,
    pub difficulty: Difficulty,
    ingredients: Vec<String>,
    steps: Vec<String>,
    dietary: Vec<String>,
    nutrition: BTreeMap<String, String>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            cooking_time: String::new(),
            difficulty: Difficulty::Easy,
            ingredients: vec![String::new()],
            steps: vec![String::new()],
            dietary: Vec::new(),
            nutrition: BTreeMap::new(),
        }
    }
}

impl RecipeDraft {
    pub fn rows(&self, which: Rows) -> &[String] {
        match which {
            Rows::Ingredients => &self.ingredients,
            Rows::Steps => &self.steps,
        }
    }

    fn rows_mut(&mut self, which: Rows) -> &mut Vec<String> {
        match which {
            Rows::Ingredients => &mut self.ingredients,
            Rows::Steps => &mut self.steps,
        }
    }

    pub fn add_row(&mut self, which: Rows) {
        self.rows_mut(which).push(String::new());
    }

    /// The last remaining row is never removed
    pub fn remove_row(&mut self, which: Rows, index: usize) {
        let rows = self.rows_mut(which);
        if rows.len() > 1 && index < rows.len() {
            rows.remove(index);
        }
    }

    pub fn set_row(&mut self, which: Rows, index: usize, value: String) {
        if let Some(row) = self.rows_mut(which).get_mut(index) {
            *row = value;
        }
    }

    pub fn dietary(&self) -> &[String] {
        &self.dietary
    }

    pub fn set_dietary(&mut self, tag: &str, checked: bool) {
        let present = self.dietary.iter().any(|d| d == tag);
        if checked && !present {
            self.dietary.push(tag.to_string());
        } else if !checked {
            self.dietary.retain(|d| d != tag);
        }
    }

    pub fn nutrition(&self) -> &BTreeMap<String, String> {
        &self.nutrition
    }

    /// Both parts are trimmed and required; returns whether the pair was added
    pub fn add_nutrition(&mut self, key: &str, value: &str) -> bool {
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return false;
        }
        self.nutrition.insert(key.to_string(), value.to_string());
        true
    }

    pub fn remove_nutrition(&mut self, key: &str) {
        self.nutrition.remove(key);
    }

    /// Build the backend payload; the image URL is filled in after upload
    pub fn validate(&self) -> Result<NewRecipe, String> {
        let name = self.name.trim();
        let minutes = self.cooking_time.trim().parse::<u32>().ok().filter(|m| *m > 0);
        let ingredients = non_blank(&self.ingredients);
        let steps = non_blank(&self.steps);

        match minutes {
            Some(minutes) if !name.is_empty() && !ingredients.is_empty() && !steps.is_empty() => Ok(NewRecipe {
                name: name.to_string(),
                cooking_time_minutes: minutes,
                difficulty: self.difficulty.as_str().to_string(),
                ingredients,
                steps,
                dietary_restrictions: self.dietary.clone(),
                nutritional_info: self.nutrition.clone(),
                image_url: String::new(),
            }),
            _ => Err(REQUIRED_FIELDS_MESSAGE.to_string()),
        }
    }
}

fn non_blank(rows: &[String]) -> Vec<String> {
    rows.iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RecipeDraft {
        let mut draft = RecipeDraft::default();
        draft.name = "Pancakes".to_string();
        draft.cooking_time = "20".to_string();
        draft.set_row(Rows::Ingredients, 0, "flour".to_string());
        draft.set_row(Rows::Steps, 0, "Mix".to_string());
        draft
    }

    #[test]
    fn test_defaults() {
        let draft = RecipeDraft::default();
        assert_eq!(draft.difficulty, Difficulty::Easy);
        assert_eq!(draft.rows(Rows::Ingredients).len(), 1);
        assert_eq!(draft.rows(Rows::Steps).len(), 1);
    }

    #[test]
    fn test_last_row_is_kept() {
        let mut draft = RecipeDraft::default();
        draft.remove_row(Rows::Steps, 0);
        assert_eq!(draft.rows(Rows::Steps).len(), 1);

        draft.add_row(Rows::Steps);
        draft.set_row(Rows::Steps, 1, "second".to_string());
        draft.remove_row(Rows::Steps, 0);
        assert_eq!(draft.rows(Rows::Steps), ["second".to_string()]);
    }

    #[test]
    fn test_validation_requires_fields() {
        assert_eq!(RecipeDraft::default().validate(), Err(REQUIRED_FIELDS_MESSAGE.to_string()));

        let mut draft = filled();
        draft.cooking_time = "soon".to_string();
        assert!(draft.validate().is_err());

        let mut draft = filled();
        draft.set_row(Rows::Steps, 0, "   ".to_string());
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_validation_builds_payload() {
        let mut draft = filled();
        draft.add_row(Rows::Ingredients);
        draft.add_row(Rows::Ingredients);
        draft.set_row(Rows::Ingredients, 2, " milk ".to_string());
        draft.difficulty = Difficulty::Hard;
        draft.set_dietary("Vegetarian", true);
        draft.set_dietary("Vegan", true);
        draft.set_dietary("Vegan", false);
        assert!(draft.add_nutrition(" Calories ", " 350 "));
        assert!(!draft.add_nutrition("Protein", "  "));

        let payload = draft.validate().unwrap();
        assert_eq!(payload.ingredients, vec!["flour", "milk"]);
        assert_eq!(payload.cooking_time_minutes, 20);
        assert_eq!(payload.difficulty, "Hard");
        assert_eq!(payload.dietary_restrictions, vec!["Vegetarian"]);
        assert_eq!(payload.nutritional_info.get("Calories").map(String::as_str), Some("350"));
        assert!(payload.image_url.is_empty());
    }
}
