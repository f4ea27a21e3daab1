//! Firebase Auth over REST
//!
//! Password, sign-up and federated sign-in against the Identity Toolkit API,
//! token refresh against the Secure Token API. The refresh token and user are
//! kept in `localStorage` so a reload restores the session.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{AuthListener, FederatedSignIn, IdentityProvider, ListenerRegistry, Subscription};
use crate::config::TOKEN_REFRESH_SKEW_MS;
use crate::error::AuthError;
use crate::models::UserIdentity;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";
const STORAGE_KEY: &str = "pantry-chef.session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Credentials {
    user: UserIdentity,
    id_token: String,
    refresh_token: String,
    expires_at_ms: f64,
}

// ========================
// Wire Types
// ========================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordArgs<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpArgs {
    post_body: String,
    request_uri: String,
    return_idp_credential: bool,
    return_secure_token: bool,
}

#[derive(Serialize)]
struct RefreshArgs<'a> {
    grant_type: &'a str,
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    is_new_user: bool,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Token lifetime arrives as a decimal string of seconds
fn expiry_from(expires_in: &str, now_ms: f64) -> f64 {
    let seconds: f64 = expires_in.trim().parse().unwrap_or(3600.0);
    now_ms + seconds * 1000.0
}

fn needs_refresh(expires_at_ms: f64, now_ms: f64) -> bool {
    now_ms + TOKEN_REFRESH_SKEW_MS >= expires_at_ms
}

fn provider_error(status: u16, body: &str) -> AuthError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => AuthError::from_provider_code(&envelope.error.message),
        Err(_) => AuthError::Network(format!("identity service returned {}", status)),
    }
}

impl SignInResponse {
    fn into_credentials(self, now_ms: f64) -> (Credentials, bool) {
        let expires_at_ms = expiry_from(&self.expires_in, now_ms);
        let user = UserIdentity {
            id: self.local_id,
            display_name: self.display_name.filter(|n| !n.is_empty()),
            email: self.email,
            photo_url: self.photo_url.filter(|p| !p.is_empty()),
        };
        let creds = Credentials {
            user,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at_ms,
        };
        (creds, self.is_new_user)
    }
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

// ========================
// Persistence
// ========================

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn persist(creds: &Credentials) {
    let Some(storage) = local_storage() else { return };
    match serde_json::to_string(creds) {
        Ok(json) => {
            if storage.set_item(STORAGE_KEY, &json).is_err() {
                log::warn!("could not persist session");
            }
        }
        Err(e) => log::warn!("could not encode session: {}", e),
    }
}

fn load_persisted() -> Option<Credentials> {
    let json = local_storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

fn clear_persisted() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}

// ========================
// Provider
// ========================

pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    credentials: RefCell<Option<Credentials>>,
    listeners: Rc<ListenerRegistry>,
}

impl FirebaseAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            credentials: RefCell::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Bring back a session saved by a previous page load. The stored token
    /// is refreshed before listeners hear about the user.
    pub async fn restore(&self) {
        let Some(saved) = load_persisted() else { return };
        match self.refresh(&saved.refresh_token).await {
            Ok(refreshed) => {
                let creds = Credentials {
                    user: saved.user,
                    id_token: refreshed.id_token,
                    refresh_token: refreshed.refresh_token,
                    expires_at_ms: expiry_from(&refreshed.expires_in, now_ms()),
                };
                log::info!("restored session for {}", creds.user.id);
                self.establish(creds);
            }
            Err(e) => {
                log::warn!("could not restore session: {}", e);
                clear_persisted();
            }
        }
    }

    fn establish(&self, creds: Credentials) -> UserIdentity {
        persist(&creds);
        let user = creds.user.clone();
        *self.credentials.borrow_mut() = Some(creds);
        self.listeners.notify(Some(user.clone()));
        user
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if self.api_key.is_empty() {
            return Err(AuthError::Rejected("missing api key".to_string()));
        }
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &text));
        }
        serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::Rejected("missing api key".to_string()));
        }
        let response = self
            .http
            .post(SECURE_TOKEN_URL)
            .query(&[("key", self.api_key.as_str())])
            .form(&RefreshArgs {
                grant_type: "refresh_token",
                refresh_token,
            })
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &text));
        }
        serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()))
    }

    async fn password_flow(&self, endpoint: &str, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let url = format!("{}:{}", IDENTITY_TOOLKIT_URL, endpoint);
        let args = PasswordArgs {
            email: email.trim(),
            password,
            return_secure_token: true,
        };
        let response: SignInResponse = self.post_json(&url, &args).await?;
        let (creds, _) = response.into_credentials(now_ms());
        log::info!("{} succeeded for {}", endpoint, creds.user.id);
        Ok(self.establish(creds))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FirebaseAuth {
    fn current_user(&self) -> Option<UserIdentity> {
        self.credentials.borrow().as_ref().map(|c| c.user.clone())
    }

    fn subscribe(&self, listener: AuthListener) -> Subscription {
        let subscription = self.listeners.subscribe(Rc::clone(&listener));
        listener(self.current_user());
        subscription
    }

    async fn fresh_token(&self) -> Result<String, AuthError> {
        let creds = self.credentials.borrow().clone().ok_or(AuthError::NoUser)?;
        if !needs_refresh(creds.expires_at_ms, now_ms()) {
            return Ok(creds.id_token);
        }

        log::debug!("refreshing bearer token for {}", creds.user.id);
        let refreshed = self.refresh(&creds.refresh_token).await?;

        // The user may have signed out or switched accounts meanwhile
        let mut current = self.credentials.borrow_mut();
        match current.as_mut() {
            Some(c) if c.user.id == creds.user.id => {
                c.id_token = refreshed.id_token.clone();
                c.refresh_token = refreshed.refresh_token;
                c.expires_at_ms = expiry_from(&refreshed.expires_in, now_ms());
                persist(c);
                Ok(refreshed.id_token)
            }
            _ => Err(AuthError::NoUser),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        self.password_flow("signInWithPassword", email, password).await
    }

    async fn sign_up_with_password(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        self.password_flow("signUp", email, password).await
    }

    async fn sign_in_with_idp(&self, provider_id: &str, id_token: &str) -> Result<FederatedSignIn, AuthError> {
        let url = format!("{}:signInWithIdp", IDENTITY_TOOLKIT_URL);
        let request_uri = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| "http://localhost".to_string());
        let args = IdpArgs {
            post_body: format!("id_token={}&providerId={}", id_token, provider_id),
            request_uri,
            return_idp_credential: true,
            return_secure_token: true,
        };
        let response: SignInResponse = self.post_json(&url, &args).await?;
        let (creds, is_new_user) = response.into_credentials(now_ms());
        log::info!("federated sign-in via {} for {}", provider_id, creds.user.id);
        let user = self.establish(creds);
        Ok(FederatedSignIn { user, is_new_user })
    }

    fn sign_out(&self) {
        let had_user = self.credentials.borrow_mut().take().is_some();
        clear_persisted();
        if had_user {
            log::info!("signed out");
            self.listeners.notify(None);
        }
    }
}
