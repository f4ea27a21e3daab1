//! Account Flows
//!
//! Sign-in and sign-up as the login dialog runs them: authenticate with the
//! identity provider, then make sure the user has a profile document.

use crate::documents::{create_profile, ensure_profile, DocumentStore};
use crate::error::AuthError;
use crate::identity::IdentityProvider;
use crate::models::UserIdentity;

/// Provider id of Google federated sign-in
pub const GOOGLE_PROVIDER: &str = "google.com";

const FALLBACK_MESSAGE: &str = "An unexpected error occurred.";

/// Text shown in the dialog for a failed attempt
pub fn auth_message(error: &AuthError) -> String {
    match error {
        AuthError::Rejected(reason) if !reason.is_empty() => reason.clone(),
        AuthError::Network(_) => "Could not reach the sign-in service.".to_string(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}

pub async fn email_sign_in(
    provider: &dyn IdentityProvider,
    store: &dyn DocumentStore,
    email: &str,
    password: &str,
    sign_up: bool,
) -> Result<UserIdentity, String> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Please enter your email and password.".to_string());
    }

    if !sign_up {
        return provider
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| auth_message(&e));
    }

    let user = provider
        .sign_up_with_password(email, password)
        .await
        .map_err(|e| auth_message(&e))?;
    // The account exists either way; a missing profile shows up on the profile page
    if let Err(e) = create_profile(store, &user).await {
        log::error!("profile creation for {} failed: {}", user.id, e);
    }
    Ok(user)
}

/// Exchange a federated id-token; first-time users get a profile
pub async fn federated_sign_in(
    provider: &dyn IdentityProvider,
    store: &dyn DocumentStore,
    provider_id: &str,
    id_token: &str,
) -> Result<UserIdentity, String> {
    let signed_in = provider
        .sign_in_with_idp(provider_id, id_token)
        .await
        .map_err(|e| auth_message(&e))?;

    let result = if signed_in.is_new_user {
        create_profile(store, &signed_in.user).await.map(|_| ())
    } else {
        ensure_profile(store, &signed_in.user).await.map(|_| ())
    };
    if let Err(e) = result {
        log::error!("profile setup for {} failed: {}", signed_in.user.id, e);
    }
    Ok(signed_in.user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::tests::MemoryStore;
    use crate::documents::user_path;
    use crate::session::tests::FakeProvider;

    #[test]
    fn test_auth_message() {
        assert_eq!(auth_message(&AuthError::from_provider_code("INVALID_PASSWORD")), "invalid password");
        assert_eq!(auth_message(&AuthError::NoUser), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile() {
        let provider = FakeProvider::new();
        let store = MemoryStore::default();
        let user = email_sign_in(&*provider, &store, " cook@example.com ", "secret", true)
            .await
            .unwrap();
        assert_eq!(user.id, "cook@example.com");
        let doc = store.docs.borrow().get(&user_path(&user.id)).cloned().unwrap();
        assert_eq!(doc["uid"], "cook@example.com");
    }

    #[tokio::test]
    async fn test_sign_in_skips_profile() {
        let provider = FakeProvider::new();
        let store = MemoryStore::default();
        email_sign_in(&*provider, &store, "cook@example.com", "secret", false)
            .await
            .unwrap();
        assert!(store.docs.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected_locally() {
        let provider = FakeProvider::new();
        let store = MemoryStore::default();
        assert!(email_sign_in(&*provider, &store, "  ", "x", false).await.is_err());
        assert!(provider.current_user().is_none());
    }

    #[tokio::test]
    async fn test_federated_sign_in_creates_profile() {
        let provider = FakeProvider::new();
        let store = MemoryStore::default();
        let user = federated_sign_in(&*provider, &store, GOOGLE_PROVIDER, "g-123")
            .await
            .unwrap();
        assert_eq!(user.id, "g-123");
        assert!(store.docs.borrow().contains_key("users/g-123"));
    }
}
