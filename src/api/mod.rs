//! Recipe Backend Client
//!
//! Thin async wrappers over the REST API, organized by domain. The bearer
//! token is read from the session at the moment each request is built.

mod bookmarks;
mod feedback;
mod ingredients;
mod my_recipes;
mod recipes;
mod uploads;

use std::rc::Rc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::session::TokenSource;

pub use uploads::ImageUpload;

/// RFC 3986 unreserved characters stay as they are
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// How a request uses the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Public endpoint
    None,
    /// Attach the token when signed in, send anonymously otherwise and let
    /// the server reject it
    Optional,
    /// Refuse to send without a token (ratings only)
    Required,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Rc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Rc<dyn TokenSource>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn authorize(&self, request: RequestBuilder, auth: Auth) -> Result<RequestBuilder, ApiError> {
        if auth == Auth::None {
            return Ok(request);
        }
        match self.tokens.bearer_token().await {
            Some(token) => Ok(request.bearer_auth(token)),
            None if auth == Auth::Required => Err(ApiError::Unauthenticated),
            None => Ok(request),
        }
    }

    async fn send_raw(&self, request: RequestBuilder, auth: Auth) -> Result<String, ApiError> {
        let request = self.authorize(request, auth).await?;
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, auth: Auth) -> Result<T, ApiError> {
        let body = self.send_raw(request, auth).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// For endpoints whose response body is not used
    async fn send_empty(&self, request: RequestBuilder, auth: Auth) -> Result<(), ApiError> {
        self.send_raw(request, auth).await.map(|_| ())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Fixed token source for tests
    pub(crate) struct StaticTokens(pub Option<&'static str>);

    #[async_trait(?Send)]
    impl TokenSource for StaticTokens {
        async fn bearer_token(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    pub(crate) fn client(token: Option<&'static str>) -> ApiClient {
        ApiClient::new("http://127.0.0.1:8000/", Rc::new(StaticTokens(token)))
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let api = client(None);
        assert_eq!(api.url("/ingredients"), "http://127.0.0.1:8000/ingredients");
        assert_eq!(api.url("chefs-choice"), "http://127.0.0.1:8000/chefs-choice");
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("chicken curry"), "chicken%20curry");
        assert_eq!(encode_component("mac&cheese?"), "mac%26cheese%3F");
        assert_eq!(encode_component("crème-brûlée"), "cr%C3%A8me-br%C3%BBl%C3%A9e");
    }

    #[tokio::test]
    async fn test_required_auth_without_token_is_refused() {
        let api = client(None);
        let request = api.http.get(api.url("/users/me/bookmarks"));
        let result = api.authorize(request, Auth::Required).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_optional_auth_without_token_proceeds() {
        let api = client(None);
        let request = api.http.get(api.url("/users/me/bookmarks"));
        let request = api.authorize(request, Auth::Optional).await.unwrap().build().unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_token_attached_when_available() {
        let api = client(Some("abc"));
        let request = api.http.get(api.url("/users/me/bookmarks"));
        let request = api.authorize(request, Auth::Optional).await.unwrap().build().unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer abc");
    }
}
