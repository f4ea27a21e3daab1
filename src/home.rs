//! Home View State
//!
//! Pantry, filters and the result list of the browse view, with the view-mode
//! transitions between pantry matching and text search.
//!
//! Async work is driven from outside: operations hand back a ticket or a
//! request, the caller performs the fetch and reports the outcome. Every
//! dispatched request carries a sequence number and only the latest one may
//! write to the result list.

use crate::config::PANTRY_RESULTS_TITLE;
use crate::error::ApiError;
use crate::filters::{self, FilterState, RecipeFilters};
use crate::models::{Recipe, RecipeEntry, RecipeMatch};
use crate::pantry::{Pantry, Toggled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Pantry,
    Search,
}

/// Identifies one armed debounce timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// What a pantry toggle asks the caller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PantryChange {
    /// Pantry became empty; results were cleared synchronously
    Cleared,
    /// Wait out the debounce window, then call [`HomeState::debounce_elapsed`]
    Debounce(DebounceTicket),
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PantryRequest {
    pub seq: u64,
    pub ingredients: Vec<String>,
    pub filters: Option<RecipeFilters>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// What the result area should show
#[derive(Debug, Clone, PartialEq)]
pub enum Display {
    Results { title: String, entries: Vec<RecipeEntry> },
    Loading,
    Featured(Vec<Recipe>),
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomeState {
    pub pantry: Pantry,
    pub filters: FilterState,
    mode: ViewMode,
    results: Vec<RecipeEntry>,
    featured: Vec<Recipe>,
    title: String,
    error: Option<String>,
    /// Sequence number of the latest request while it is outstanding
    pending: Option<u64>,
    last_seq: u64,
    debounce: u64,
}

impl HomeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn results(&self) -> &[RecipeEntry] {
        &self.results
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn featured(&self) -> &[Recipe] {
        &self.featured
    }

    pub fn set_featured(&mut self, featured: Vec<Recipe>) {
        self.featured = featured;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ========================
    // Pantry
    // ========================

    /// Add or remove one ingredient. Editing the pantry always returns the
    /// view to pantry mode; emptying it clears results without a fetch.
    pub fn toggle_ingredient(&mut self, name: &str) -> PantryChange {
        if self.pantry.toggle(name) == Toggled::Ignored {
            return PantryChange::Unchanged;
        }
        self.mode = ViewMode::Pantry;

        if self.pantry.is_empty() {
            log::debug!("pantry emptied, clearing results");
            self.results.clear();
            self.title.clear();
            self.error = None;
            // Anything still in flight must not repopulate the list
            self.last_seq += 1;
            self.pending = None;
            self.debounce += 1;
            return PantryChange::Cleared;
        }

        self.debounce += 1;
        PantryChange::Debounce(DebounceTicket(self.debounce))
    }

    /// Called when a debounce timer fires. Only the most recent ticket
    /// produces a request.
    pub fn debounce_elapsed(&mut self, ticket: DebounceTicket) -> Option<PantryRequest> {
        if ticket.0 != self.debounce || self.mode != ViewMode::Pantry {
            return None;
        }
        // Spent: the same timer cannot dispatch twice
        self.debounce += 1;
        self.dispatch_pantry()
    }

    /// Merge recognized ingredients and request recipes immediately
    pub fn set_pantry_from_recognition<I, S>(&mut self, names: I) -> Option<PantryRequest>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.pantry.merge(names);
        log::debug!("recognition added {} pantry items", added);
        self.mode = ViewMode::Pantry;
        // A pending toggle debounce is superseded by this request
        self.debounce += 1;
        self.dispatch_pantry()
    }

    fn dispatch_pantry(&mut self) -> Option<PantryRequest> {
        if self.pantry.is_empty() {
            return None;
        }
        let seq = self.begin_request();
        Some(PantryRequest {
            seq,
            ingredients: self.pantry.items().to_vec(),
            filters: self.filters.to_wire(),
        })
    }

    /// Returns false when the response was superseded and dropped
    pub fn complete_pantry(&mut self, seq: u64, outcome: Result<Vec<RecipeMatch>, ApiError>) -> bool {
        if !self.finish_request(seq) {
            return false;
        }
        match outcome {
            Ok(matches) => {
                log::info!("pantry fetch returned {} recipes", matches.len());
                self.results = matches.into_iter().map(RecipeEntry::Match).collect();
                self.title = PANTRY_RESULTS_TITLE.to_string();
                self.mode = ViewMode::Pantry;
            }
            Err(e) => {
                log::warn!("pantry fetch failed: {}", e);
                self.fail(e.user_message("An unexpected error occurred."));
            }
        }
        true
    }

    // ========================
    // Search
    // ========================

    /// Blank queries are ignored and leave the state untouched
    pub fn submit_search(&mut self, text: &str) -> Option<SearchRequest> {
        if text.trim().is_empty() {
            return None;
        }
        self.debounce += 1;
        let seq = self.begin_request();
        Some(SearchRequest {
            seq,
            query: text.to_string(),
        })
    }

    pub fn complete_search(
        &mut self,
        seq: u64,
        query: &str,
        outcome: Result<Vec<Recipe>, ApiError>,
    ) -> bool {
        if !self.finish_request(seq) {
            return false;
        }
        match outcome {
            Ok(recipes) => {
                log::info!("search {:?} returned {} recipes", query, recipes.len());
                self.title = format!("Found {} recipes for \"{}\"", recipes.len(), query);
                self.results = recipes.into_iter().map(RecipeEntry::Plain).collect();
                self.mode = ViewMode::Search;
            }
            Err(e) => {
                log::warn!("search {:?} failed: {}", query, e);
                self.fail(e.user_message("An unexpected error occurred."));
            }
        }
        true
    }

    /// Surface an image-recognition failure; the pantry is left as it was
    pub fn recognition_failed(&mut self, error: &ApiError) {
        log::warn!("ingredient recognition failed: {}", error);
        self.fail(error.user_message("Failed to analyze image."));
    }

    // ========================
    // Requests
    // ========================

    fn begin_request(&mut self) -> u64 {
        self.last_seq += 1;
        self.pending = Some(self.last_seq);
        self.error = None;
        self.results.clear();
        self.last_seq
    }

    fn finish_request(&mut self, seq: u64) -> bool {
        if seq != self.last_seq {
            log::debug!("dropping stale response #{} (latest #{})", seq, self.last_seq);
            return false;
        }
        self.pending = None;
        true
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.results.clear();
    }

    // ========================
    // Local list edits
    // ========================

    pub fn remove_recipe(&mut self, recipe_id: &str) {
        self.results.retain(|e| e.recipe().id != recipe_id);
    }

    /// Newly authored recipes go to the top of the list
    pub fn prepend_recipe(&mut self, recipe: Recipe) {
        self.results.insert(0, RecipeEntry::Plain(recipe));
    }

    // ========================
    // Derived
    // ========================

    pub fn displayed(&self) -> Vec<RecipeEntry> {
        filters::apply(&self.results, &self.filters)
    }

    pub fn display(&self) -> Display {
        let entries = self.displayed();
        if !entries.is_empty() {
            return Display::Results {
                title: self.title.clone(),
                entries,
            };
        }
        if self.is_loading() {
            return Display::Loading;
        }
        match self.mode {
            ViewMode::Pantry if self.pantry.is_empty() && !self.featured.is_empty() => {
                Display::Featured(self.featured.clone())
            }
            ViewMode::Pantry if self.pantry.is_empty() => {
                Display::Empty("Add ingredients to your basket to discover recipes.".to_string())
            }
            ViewMode::Pantry if !self.results.is_empty() => {
                Display::Empty("No recipes match the current filters.".to_string())
            }
            ViewMode::Pantry => Display::Empty("No matching recipes found for your ingredients.".to_string()),
            ViewMode::Search if !self.results.is_empty() => {
                Display::Empty("No recipes match the current filters.".to_string())
            }
            ViewMode::Search => Display::Empty("No recipes found.".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str) -> Recipe {
        serde_json::from_value(serde_json::json!({"id": id, "name": id})).unwrap()
    }

    fn matched(id: &str) -> RecipeMatch {
        RecipeMatch {
            recipe: recipe(id),
            matching_ingredients: vec!["egg".to_string()],
            missing_ingredients: vec![],
        }
    }

    fn ticket(change: PantryChange) -> DebounceTicket {
        match change {
            PantryChange::Debounce(t) => t,
            other => panic!("expected debounce, got {:?}", other),
        }
    }

    #[test]
    fn test_debounce_sends_only_last() {
        let mut state = HomeState::new();
        let first = ticket(state.toggle_ingredient("egg"));
        let second = ticket(state.toggle_ingredient("Flour"));

        assert_eq!(state.debounce_elapsed(first), None);
        let req = state.debounce_elapsed(second).expect("latest ticket dispatches");
        assert_eq!(req.ingredients, vec!["egg".to_string(), "flour".to_string()]);
        assert_eq!(req.filters, None);
        assert!(state.is_loading());

        // The same ticket cannot fire twice
        assert_eq!(state.debounce_elapsed(second), None);
    }

    #[test]
    fn test_pantry_results_displayed_unfiltered() {
        let mut state = HomeState::new();
        state.toggle_ingredient("egg");
        let t = ticket(state.toggle_ingredient("flour"));
        let req = state.debounce_elapsed(t).unwrap();

        assert!(state.complete_pantry(req.seq, Ok(vec![matched("a"), matched("b")])));
        assert!(!state.is_loading());
        assert_eq!(state.title(), "Suggested Recipes For You");
        match state.display() {
            Display::Results { title, entries } => {
                assert_eq!(title, "Suggested Recipes For You");
                assert_eq!(entries.len(), 2);
                assert!(entries.iter().all(RecipeEntry::is_match));
            }
            other => panic!("unexpected display {:?}", other),
        }
    }

    #[test]
    fn test_emptying_pantry_clears_synchronously() {
        let mut state = HomeState::new();
        let t = ticket(state.toggle_ingredient("egg"));
        let req = state.debounce_elapsed(t).unwrap();
        state.complete_pantry(req.seq, Ok(vec![matched("a")]));
        assert_eq!(state.results().len(), 1);

        assert_eq!(state.toggle_ingredient("egg"), PantryChange::Cleared);
        assert!(state.results().is_empty());
        assert_eq!(state.title(), "");
        assert_eq!(state.mode(), ViewMode::Pantry);
    }

    #[test]
    fn test_in_flight_response_dropped_after_clear() {
        let mut state = HomeState::new();
        let t = ticket(state.toggle_ingredient("egg"));
        let req = state.debounce_elapsed(t).unwrap();

        state.toggle_ingredient("egg");
        assert!(!state.complete_pantry(req.seq, Ok(vec![matched("a")])));
        assert!(state.results().is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_blank_search_is_noop() {
        let mut state = HomeState::new();
        state.toggle_ingredient("egg");
        let before = state.clone();
        assert_eq!(state.submit_search("   "), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_search_switches_mode_and_titles_count() {
        let mut state = HomeState::new();
        let req = state.submit_search("pasta").unwrap();
        assert_eq!(state.mode(), ViewMode::Pantry, "mode switches only on success");

        state.complete_search(req.seq, &req.query, Ok(vec![recipe("a"), recipe("b")]));
        assert_eq!(state.mode(), ViewMode::Search);
        assert_eq!(state.title(), "Found 2 recipes for \"pasta\"");
        assert!(state.results().iter().all(|e| !e.is_match()));
    }

    #[test]
    fn test_toggle_returns_to_pantry_mode() {
        let mut state = HomeState::new();
        let req = state.submit_search("soup").unwrap();
        state.complete_search(req.seq, &req.query, Ok(vec![recipe("a")]));
        assert_eq!(state.mode(), ViewMode::Search);

        state.toggle_ingredient("leek");
        assert_eq!(state.mode(), ViewMode::Pantry);
    }

    #[test]
    fn test_older_response_loses_to_newer() {
        let mut state = HomeState::new();
        let slow = state.submit_search("pasta").unwrap();
        let fast = state.submit_search("pizza").unwrap();

        assert!(state.complete_search(fast.seq, &fast.query, Ok(vec![recipe("p")])));
        assert!(!state.complete_search(slow.seq, &slow.query, Ok(vec![recipe("x"), recipe("y")])));
        assert_eq!(state.title(), "Found 1 recipes for \"pizza\"");
        assert_eq!(state.results()[0].recipe().id, "p");
    }

    #[test]
    fn test_search_failure_sets_error_and_clears() {
        let mut state = HomeState::new();
        let req = state.submit_search("pasta").unwrap();
        let err = ApiError::Server {
            status: 500,
            detail: "Search backend down".to_string(),
        };
        state.complete_search(req.seq, &req.query, Err(err));
        assert_eq!(state.error(), Some("Search backend down"));
        assert!(state.results().is_empty());
        assert_eq!(state.mode(), ViewMode::Pantry);
    }

    #[test]
    fn test_recognition_merges_and_dispatches_immediately() {
        let mut state = HomeState::new();
        let pending = ticket(state.toggle_ingredient("egg"));

        let req = state
            .set_pantry_from_recognition(vec!["Tomato".to_string(), "egg".to_string()])
            .expect("recognition fetches immediately");
        assert_eq!(req.ingredients, vec!["egg".to_string(), "tomato".to_string()]);
        assert_eq!(state.debounce_elapsed(pending), None, "pending debounce superseded");
    }

    #[test]
    fn test_filters_forwarded_and_applied() {
        let mut state = HomeState::new();
        state.filters.set_max_time(Some(30));
        let t = ticket(state.toggle_ingredient("egg"));
        let req = state.debounce_elapsed(t).unwrap();
        assert_eq!(req.filters.as_ref().and_then(|f| f.max_time), Some(30));

        let quick: Recipe = serde_json::from_value(
            serde_json::json!({"id": "q", "cooking_time_minutes": 10}),
        )
        .unwrap();
        let slow: Recipe = serde_json::from_value(
            serde_json::json!({"id": "s", "cooking_time_minutes": 90}),
        )
        .unwrap();
        let matches = vec![
            RecipeMatch { recipe: quick, matching_ingredients: vec![], missing_ingredients: vec![] },
            RecipeMatch { recipe: slow, matching_ingredients: vec![], missing_ingredients: vec![] },
        ];
        state.complete_pantry(req.seq, Ok(matches));
        let shown = state.displayed();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].recipe().id, "q");

        state.filters.set_max_time(Some(120));
        assert_eq!(state.displayed().len(), 2);
    }

    #[test]
    fn test_display_states() {
        let mut state = HomeState::new();
        assert!(matches!(state.display(), Display::Empty(_)));

        state.set_featured(vec![recipe("chef")]);
        assert_eq!(state.display(), Display::Featured(vec![recipe("chef")]));

        let t = ticket(state.toggle_ingredient("egg"));
        state.debounce_elapsed(t).unwrap();
        assert_eq!(state.display(), Display::Loading);

        let req = state.submit_search("nothing").unwrap();
        state.complete_search(req.seq, &req.query, Ok(vec![]));
        assert_eq!(state.display(), Display::Empty("No recipes found.".to_string()));
    }

    #[test]
    fn test_local_edits() {
        let mut state = HomeState::new();
        let req = state.submit_search("cake").unwrap();
        state.complete_search(req.seq, &req.query, Ok(vec![recipe("a"), recipe("b")]));

        state.remove_recipe("a");
        state.prepend_recipe(recipe("new"));
        let ids: Vec<&str> = state.results().iter().map(|e| e.recipe().id.as_str()).collect();
        assert_eq!(ids, vec!["new", "b"]);
    }
}
