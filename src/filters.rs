//! Recipe Filters
//!
//! Client-side post-filter over the result list. The predicate never calls the
//! backend; it is recomputed whenever the list or the filter state changes.
//!
//! Tag and cuisine comparisons fold case on both sides.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Recipe;

pub const DIETARY_OPTIONS: &[&str] = &["vegetarian", "vegan", "gluten-free", "dairy-free"];
pub const CUISINE_OPTIONS: &[&str] = &[
    "Italian", "Chinese", "Indian", "Mexican", "French", "Thai", "American",
];

/// Slider bounds for the max cooking time control (minutes)
pub const MAX_TIME_LIMIT: u32 = 180;
pub const MAX_TIME_STEP: u32 = 15;
/// Slider step for the minimum rating control
pub const MIN_RATING_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Case-insensitive comparison against a recipe's declared difficulty
    pub fn matches(&self, declared: &str) -> bool {
        declared.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.matches(s))
            .ok_or_else(|| format!("unknown difficulty: {}", s))
    }
}

/// Structured optional constraints. An empty or unset field imposes nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    /// AND: a recipe must carry every selected tag (stored lower-cased)
    pub dietary: BTreeSet<String>,
    /// Inclusive upper bound in minutes
    pub max_time: Option<u32>,
    pub difficulty: Option<Difficulty>,
    /// Inclusive lower bound, 0 to 5
    pub min_rating: Option<f64>,
    /// OR: a recipe must match at least one selected cuisine
    pub cuisine: BTreeSet<String>,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        !self.dietary.is_empty()
            || self.max_time.is_some()
            || self.difficulty.is_some()
            || self.min_rating.is_some()
            || !self.cuisine.is_empty()
    }

    pub fn toggle_dietary(&mut self, tag: &str) {
        toggle_in(&mut self.dietary, tag.trim().to_lowercase());
    }

    pub fn toggle_cuisine(&mut self, cuisine: &str) {
        toggle_in(&mut self.cuisine, cuisine.trim().to_string());
    }

    /// Zero clears the bound
    pub fn set_max_time(&mut self, minutes: Option<u32>) {
        self.max_time = minutes.filter(|m| *m > 0);
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.difficulty = difficulty;
    }

    /// Clamped to 0..=5; zero clears the bound
    pub fn set_min_rating(&mut self, rating: Option<f64>) {
        self.min_rating = rating
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 5.0))
            .filter(|r| *r > 0.0);
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    /// First failing clause excludes the recipe
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.passes_dietary(recipe)
            && self.passes_max_time(recipe)
            && self.passes_difficulty(recipe)
            && self.passes_min_rating(recipe)
            && self.passes_cuisine(recipe)
    }

    fn passes_dietary(&self, recipe: &Recipe) -> bool {
        if self.dietary.is_empty() {
            return true;
        }
        let tags: BTreeSet<String> = recipe
            .dietary_restrictions
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        self.dietary.iter().all(|wanted| tags.contains(&wanted.to_lowercase()))
    }

    fn passes_max_time(&self, recipe: &Recipe) -> bool {
        match (self.max_time, recipe.cooking_time_minutes) {
            (Some(bound), Some(minutes)) => minutes <= bound,
            _ => true,
        }
    }

    fn passes_difficulty(&self, recipe: &Recipe) -> bool {
        match (self.difficulty, recipe.difficulty.as_deref()) {
            (Some(wanted), Some(declared)) => wanted.matches(declared),
            _ => true,
        }
    }

    fn passes_min_rating(&self, recipe: &Recipe) -> bool {
        match self.min_rating {
            Some(bound) if recipe.average_rating > 0.0 => recipe.average_rating >= bound,
            _ => true,
        }
    }

    fn passes_cuisine(&self, recipe: &Recipe) -> bool {
        if self.cuisine.is_empty() {
            return true;
        }
        recipe.cuisine.iter().any(|c| {
            self.cuisine
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(c.trim()))
        })
    }

    /// Wire form sent with pantry requests, `None` when nothing is set
    pub fn to_wire(&self) -> Option<RecipeFilters> {
        if !self.is_active() {
            return None;
        }
        Some(RecipeFilters {
            dietary: self.dietary.iter().cloned().collect(),
            max_time: self.max_time,
            difficulty: self.difficulty.map(|d| d.as_str().to_lowercase()),
            min_rating: self.min_rating,
            cuisine: self.cuisine.iter().cloned().collect(),
        })
    }
}

fn toggle_in(set: &mut BTreeSet<String>, value: String) {
    if value.is_empty() {
        return;
    }
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Filter payload in the backend's field naming
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeFilters {
    pub dietary: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    pub cuisine: Vec<String>,
}

/// Displayed subset of a result list
pub fn apply<T>(items: &[T], filters: &FilterState) -> Vec<T>
where
    T: AsRef<Recipe> + Clone,
{
    items
        .iter()
        .filter(|item| filters.matches(item.as_ref()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(json: serde_json::Value) -> Recipe {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let filters = FilterState::default();
        assert!(!filters.is_active());
        assert!(filters.matches(&recipe(serde_json::json!({"id": "a"}))));
        assert!(filters.to_wire().is_none());
    }

    #[test]
    fn test_dietary_is_and_and_case_folded() {
        let mut filters = FilterState::default();
        filters.toggle_dietary("vegan");

        let tagged = recipe(serde_json::json!({
            "id": "a", "dietary_restrictions": ["Vegan", "Gluten-Free"]
        }));
        assert!(filters.matches(&tagged));

        filters.toggle_dietary("Dairy-Free");
        assert!(!filters.matches(&tagged));

        let untagged = recipe(serde_json::json!({"id": "b"}));
        filters.clear();
        filters.toggle_dietary("vegan");
        assert!(!filters.matches(&untagged));
    }

    #[test]
    fn test_toggle_dietary_twice_removes() {
        let mut filters = FilterState::default();
        filters.toggle_dietary("Vegan");
        filters.toggle_dietary("vegan");
        assert!(filters.dietary.is_empty());
    }

    #[test]
    fn test_max_time_bound() {
        let timed = recipe(serde_json::json!({"id": "a", "cooking_time_minutes": 45}));
        let untimed = recipe(serde_json::json!({"id": "b"}));

        let mut filters = FilterState::default();
        filters.set_max_time(Some(30));
        assert!(!filters.matches(&timed));
        assert!(filters.matches(&untimed));

        filters.set_max_time(Some(60));
        assert!(filters.matches(&timed));

        filters.set_max_time(Some(45));
        assert!(filters.matches(&timed), "bound is inclusive");

        filters.set_max_time(Some(0));
        assert_eq!(filters.max_time, None);
    }

    #[test]
    fn test_difficulty_case_insensitive() {
        let easy = recipe(serde_json::json!({"id": "a", "difficulty": "easy"}));
        let undeclared = recipe(serde_json::json!({"id": "b"}));

        let mut filters = FilterState::default();
        filters.set_difficulty(Some(Difficulty::Easy));
        assert!(filters.matches(&easy));
        assert!(filters.matches(&undeclared));

        filters.set_difficulty(Some(Difficulty::Hard));
        assert!(!filters.matches(&easy));
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_min_rating_ignores_unrated() {
        let rated = recipe(serde_json::json!({"id": "a", "average_rating": 3.5}));
        let unrated = recipe(serde_json::json!({"id": "b", "average_rating": 0}));

        let mut filters = FilterState::default();
        filters.set_min_rating(Some(4.0));
        assert!(!filters.matches(&rated));
        assert!(filters.matches(&unrated));

        filters.set_min_rating(Some(3.5));
        assert!(filters.matches(&rated), "bound is inclusive");

        filters.set_min_rating(Some(9.0));
        assert_eq!(filters.min_rating, Some(5.0));

        filters.set_min_rating(Some(0.0));
        assert_eq!(filters.min_rating, None);
    }

    #[test]
    fn test_cuisine_string_list_and_absent() {
        let single = recipe(serde_json::json!({"id": "a", "cuisine": "Italian"}));
        let many = recipe(serde_json::json!({"id": "b", "cuisine": ["Italian", "Thai"]}));
        let absent = recipe(serde_json::json!({"id": "c"}));

        let mut filters = FilterState::default();
        assert!(filters.matches(&absent));

        filters.toggle_cuisine("Italian");
        assert!(filters.matches(&single));
        assert!(filters.matches(&many));
        assert!(!filters.matches(&absent));

        filters.clear();
        filters.toggle_cuisine("Mexican");
        filters.toggle_cuisine("Thai");
        assert!(!filters.matches(&single));
        assert!(filters.matches(&many), "cuisine is OR");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let recipes = vec![
            recipe(serde_json::json!({"id": "a", "cooking_time_minutes": 20, "cuisine": "Thai"})),
            recipe(serde_json::json!({"id": "b", "cooking_time_minutes": 90, "cuisine": "Thai"})),
            recipe(serde_json::json!({"id": "c", "cuisine": "French"})),
            recipe(serde_json::json!({"id": "d"})),
        ];
        let mut filters = FilterState::default();
        filters.set_max_time(Some(60));
        filters.toggle_cuisine("Thai");

        let once = apply(&recipes, &filters);
        let twice = apply(&once, &filters);
        assert_eq!(once, twice);
        let ids: Vec<&str> = once.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_wire_form() {
        let mut filters = FilterState::default();
        filters.toggle_dietary("vegan");
        filters.set_difficulty(Some(Difficulty::Medium));
        filters.set_max_time(Some(30));

        let wire = serde_json::to_value(filters.to_wire().unwrap()).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({
                "dietary": ["vegan"],
                "max_time": 30,
                "difficulty": "medium",
                "cuisine": []
            })
        );
    }
}
