//! Identity Provider
//!
//! Abstract interface to the external sign-in service, plus the listener
//! registry implementations use for auth-change notifications.

mod firebase;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use async_trait::async_trait;

use crate::error::AuthError;
use crate::models::UserIdentity;

pub use firebase::FirebaseAuth;

/// Callback fired with the new identity (or `None` after sign-out)
pub type AuthListener = Rc<dyn Fn(Option<UserIdentity>)>;

/// Result of a federated sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct FederatedSignIn {
    pub user: UserIdentity,
    /// True the first time this account signs in
    pub is_new_user: bool,
}

/// Sign-in service used by the session manager and the login dialog.
///
/// Runs on the browser's single thread, hence `?Send`.
#[async_trait(?Send)]
pub trait IdentityProvider {
    fn current_user(&self) -> Option<UserIdentity>;

    /// Register for auth changes. The listener is called once immediately
    /// with the current state; dropping the returned handle unsubscribes.
    fn subscribe(&self, listener: AuthListener) -> Subscription;

    /// A bearer token valid for at least a few more minutes
    async fn fresh_token(&self) -> Result<String, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;

    async fn sign_up_with_password(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;

    /// Exchange a credential issued by a federated provider (e.g.
    /// `google.com`) for a session
    async fn sign_in_with_idp(&self, provider_id: &str, id_token: &str) -> Result<FederatedSignIn, AuthError>;

    fn sign_out(&self);
}

// ========================
// Listener Registry
// ========================

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, AuthListener)>>,
}

impl ListenerRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn subscribe(self: &Rc<Self>, listener: AuthListener) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        Subscription {
            registry: Rc::downgrade(self),
            id,
        }
    }

    pub fn notify(&self, identity: Option<UserIdentity>) {
        // Snapshot first: a listener may subscribe or unsubscribe re-entrantly
        let listeners: Vec<AuthListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(identity.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

/// Live auth-change subscription; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<ListenerRegistry>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserIdentity {
        UserIdentity {
            id: id.to_string(),
            display_name: None,
            email: None,
            photo_url: None,
        }
    }

    #[test]
    fn test_notify_and_unsubscribe_on_drop() {
        let registry = ListenerRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let sub = registry.subscribe(Rc::new(move |identity: Option<UserIdentity>| {
            sink.borrow_mut().push(identity.map(|u| u.id));
        }));
        assert_eq!(registry.len(), 1);

        registry.notify(Some(user("a")));
        registry.notify(None);
        drop(sub);
        registry.notify(Some(user("b")));

        assert!(registry.is_empty());
        assert_eq!(*seen.borrow(), vec![Some("a".to_string()), None]);
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let registry = ListenerRegistry::new();
        let sub = registry.subscribe(Rc::new(|_: Option<UserIdentity>| {}));
        drop(registry);
        // Must not panic
        sub.unsubscribe();
    }
}
