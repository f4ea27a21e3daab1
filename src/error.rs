//! Error Types
//!
//! Failures of the three external collaborators: the recipe backend, the
//! identity provider and the document store.

use serde::Deserialize;
use thiserror::Error;

/// Recipe backend failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    /// No bearer token available for an endpoint that needs one
    #[error("not signed in")]
    Unauthenticated,
    #[error("{0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server returned {status}: {detail}")]
    Server { status: u16, detail: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// FastAPI-style error body: `{"detail": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiError {
    /// Map a non-success HTTP status and its body to an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| match b.detail {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
            .unwrap_or_default();

        match status {
            401 | 403 => ApiError::Unauthenticated,
            404 => ApiError::NotFound(detail),
            400 | 422 if !detail.is_empty() => ApiError::Validation(detail),
            _ => ApiError::Server { status, detail },
        }
    }

    /// Message shown to the user: the backend's detail when it sent one,
    /// otherwise the call-site fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Validation(detail) | ApiError::NotFound(detail) if !detail.is_empty() => {
                detail.clone()
            }
            ApiError::Server { detail, .. } if !detail.is_empty() => detail.clone(),
            ApiError::Unauthenticated => "Please sign in to continue.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Identity provider failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("network error: {0}")]
    Network(String),
    /// The provider refused the request; holds a human-readable reason
    #[error("{0}")]
    Rejected(String),
    #[error("no signed-in user")]
    NoUser,
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl AuthError {
    /// Turn a provider code such as `EMAIL_NOT_FOUND` or
    /// `WEAK_PASSWORD : Password should be at least 6 characters` into
    /// `email not found` / `weak password`.
    pub fn from_provider_code(code: &str) -> Self {
        let code = code.split(':').next().unwrap_or(code).trim();
        let code = code.strip_prefix("auth/").unwrap_or(code);
        AuthError::Rejected(code.to_lowercase().replace(['_', '-'], " "))
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AuthError::Decode(e.to_string())
        } else {
            AuthError::Network(e.to_string())
        }
    }
}

/// Document store failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("permission denied")]
    Denied,
    #[error("unexpected document: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Network(e.to_string())
        }
    }
}
