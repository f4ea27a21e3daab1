//! Application Configuration
//!
//! Resolved at compile time: the browser has no process environment, so every
//! setting is baked in through `option_env!` with a local-development default.

use log::LevelFilter;

/// Idle window after the last pantry toggle before recipes are requested
pub const PANTRY_DEBOUNCE_MS: u32 = 500;

/// Tokens closer than this to expiry are refreshed before use
pub const TOKEN_REFRESH_SKEW_MS: f64 = 5.0 * 60.0 * 1000.0;

/// Cadence for re-issuing the bearer token while a user is signed in
pub const TOKEN_REISSUE_INTERVAL_MS: u32 = 50 * 60 * 1000;

/// Title shown above pantry-matched results
pub const PANTRY_RESULTS_TITLE: &str = "Suggested Recipes For You";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Recipe backend REST root, without trailing slash
    pub api_base_url: String,
    /// Web API key of the identity / document-store project
    pub firebase_api_key: String,
    /// Project id used to address the document store
    pub firebase_project_id: String,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("RECIPE_API_BASE_URL"),
            option_env!("RECIPE_FIREBASE_API_KEY"),
            option_env!("RECIPE_FIREBASE_PROJECT_ID"),
            option_env!("RECIPE_LOG_LEVEL"),
        )
    }

    pub fn from_values(
        api_base_url: Option<&str>,
        firebase_api_key: Option<&str>,
        firebase_project_id: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let log_level = log_level
            .and_then(|level| level.trim().parse().ok())
            .unwrap_or(LevelFilter::Info);

        Self {
            api_base_url,
            firebase_api_key: firebase_api_key.unwrap_or_default().trim().to_string(),
            firebase_project_id: firebase_project_id.unwrap_or_default().trim().to_string(),
            log_level,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert!(config.firebase_api_key.is_empty());
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = AppConfig::from_values(Some("https://api.example.com/"), None, None, None);
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn test_log_level_parsing() {
        let config = AppConfig::from_values(None, None, None, Some("debug"));
        assert_eq!(config.log_level, LevelFilter::Debug);

        // Unknown levels fall back to info
        let config = AppConfig::from_values(None, None, None, Some("chatty"));
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
