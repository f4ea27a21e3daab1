//! Session Manager
//!
//! Tracks the signed-in identity and its bearer token. A token always belongs
//! to one identity generation: when the provider reports a change the token is
//! dropped, and a token fetched for an older generation is discarded.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use async_trait::async_trait;

use crate::identity::{IdentityProvider, Subscription};
use crate::models::UserIdentity;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    identity: Option<UserIdentity>,
    token: Option<String>,
    generation: u64,
}

impl Session {
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Drop the token and start a new generation. Returns the generation a
    /// token should be fetched for, or `None` when signed out.
    pub fn identity_changed(&mut self, identity: Option<UserIdentity>) -> Option<u64> {
        self.generation += 1;
        self.token = None;
        self.identity = identity;
        self.identity.as_ref().map(|_| self.generation)
    }

    /// Store a token fetched for `generation`; stale tokens are refused
    pub fn token_issued(&mut self, generation: u64, token: String) -> bool {
        if generation != self.generation || self.identity.is_none() {
            return false;
        }
        self.token = Some(token);
        true
    }
}

/// Supplies the bearer credential for outbound calls, read at call time
#[async_trait(?Send)]
pub trait TokenSource {
    async fn bearer_token(&self) -> Option<String>;
}

pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;
type Observer = Rc<dyn Fn(&Session)>;

#[derive(Clone)]
pub struct SessionManager {
    provider: Rc<dyn IdentityProvider>,
    session: Rc<RefCell<Session>>,
    observers: Rc<RefCell<Vec<Observer>>>,
}

impl SessionManager {
    pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            session: Rc::new(RefCell::new(Session::default())),
            observers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn provider(&self) -> Rc<dyn IdentityProvider> {
        Rc::clone(&self.provider)
    }

    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Observe every session change (identity or token)
    pub fn watch(&self, observer: impl Fn(&Session) + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let observers: Vec<Observer> = self.observers.borrow().iter().cloned().collect();
        for observer in observers {
            observer(&snapshot);
        }
    }

    /// Follow the provider's auth changes until the returned subscription is
    /// dropped. Token fetches are handed to `spawn`.
    pub fn attach(&self, spawn: impl Fn(LocalTask) + 'static) -> Subscription {
        let manager = self.clone();
        self.provider.subscribe(Rc::new(move |identity: Option<UserIdentity>| {
            let who = identity.as_ref().map(|u| u.id.clone());
            let generation = manager.session.borrow_mut().identity_changed(identity);
            log::info!("identity changed: {:?}", who);
            manager.notify();
            if let Some(generation) = generation {
                spawn(Box::pin(manager.clone().issue_token(generation)));
            }
        }))
    }

    /// Fetch a token for `generation` and store it if still current
    pub async fn issue_token(self, generation: u64) {
        match self.provider.fresh_token().await {
            Ok(token) => {
                let stored = self.session.borrow_mut().token_issued(generation, token);
                if stored {
                    self.notify();
                } else {
                    log::debug!("discarding token for stale generation {}", generation);
                }
            }
            Err(e) => log::warn!("could not obtain token: {}", e),
        }
    }

    /// Periodic re-issue while signed in
    pub async fn reissue(&self) {
        let generation = {
            let session = self.session.borrow();
            if !session.is_signed_in() {
                return;
            }
            session.generation()
        };
        self.clone().issue_token(generation).await;
    }
}

#[async_trait(?Send)]
impl TokenSource for SessionManager {
    async fn bearer_token(&self) -> Option<String> {
        let generation = {
            let session = self.session.borrow();
            session.identity.as_ref()?;
            session.generation
        };
        match self.provider.fresh_token().await {
            Ok(token) => {
                let stored = self.session.borrow_mut().token_issued(generation, token.clone());
                if stored {
                    self.notify();
                    Some(token)
                } else {
                    // Identity changed while we were waiting; use whatever is current
                    self.session.borrow().token().map(str::to_string)
                }
            }
            Err(e) => {
                log::warn!("no bearer token, continuing unauthenticated: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::identity::{AuthListener, FederatedSignIn, ListenerRegistry};

    /// In-memory identity provider handing out numbered tokens
    pub(crate) struct FakeProvider {
        user: RefCell<Option<UserIdentity>>,
        listeners: Rc<ListenerRegistry>,
        issued: RefCell<u32>,
        pub fail_tokens: RefCell<bool>,
    }

    impl FakeProvider {
        pub(crate) fn new() -> Rc<Self> {
            Rc::new(Self {
                user: RefCell::new(None),
                listeners: ListenerRegistry::new(),
                issued: RefCell::new(0),
                fail_tokens: RefCell::new(false),
            })
        }

        pub(crate) fn set_user(&self, id: Option<&str>) {
            let user = id.map(|id| UserIdentity {
                id: id.to_string(),
                display_name: Some(format!("User {}", id)),
                email: None,
                photo_url: None,
            });
            *self.user.borrow_mut() = user.clone();
            self.listeners.notify(user);
        }
    }

    #[async_trait(?Send)]
    impl IdentityProvider for FakeProvider {
        fn current_user(&self) -> Option<UserIdentity> {
            self.user.borrow().clone()
        }

        fn subscribe(&self, listener: AuthListener) -> Subscription {
            let sub = self.listeners.subscribe(Rc::clone(&listener));
            listener(self.current_user());
            sub
        }

        async fn fresh_token(&self) -> Result<String, AuthError> {
            if *self.fail_tokens.borrow() {
                return Err(AuthError::Network("offline".to_string()));
            }
            let user = self.current_user().ok_or(AuthError::NoUser)?;
            let mut issued = self.issued.borrow_mut();
            *issued += 1;
            Ok(format!("{}-token-{}", user.id, *issued))
        }

        async fn sign_in_with_password(&self, email: &str, _password: &str) -> Result<UserIdentity, AuthError> {
            self.set_user(Some(email));
            self.current_user().ok_or(AuthError::NoUser)
        }

        async fn sign_up_with_password(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
            self.sign_in_with_password(email, password).await
        }

        async fn sign_in_with_idp(&self, _provider_id: &str, id_token: &str) -> Result<FederatedSignIn, AuthError> {
            self.set_user(Some(id_token));
            let user = self.current_user().ok_or(AuthError::NoUser)?;
            Ok(FederatedSignIn { user, is_new_user: true })
        }

        fn sign_out(&self) {
            self.set_user(None);
        }
    }

    fn collecting_spawner() -> (Rc<RefCell<Vec<LocalTask>>>, impl Fn(LocalTask) + 'static) {
        let tasks: Rc<RefCell<Vec<LocalTask>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&tasks);
        (tasks, move |task| sink.borrow_mut().push(task))
    }

    async fn run_all(tasks: &Rc<RefCell<Vec<LocalTask>>>) {
        let pending: Vec<LocalTask> = tasks.borrow_mut().drain(..).collect();
        for task in pending {
            task.await;
        }
    }

    #[test]
    fn test_identity_change_drops_token() {
        let mut session = Session::default();
        let generation = session.identity_changed(Some(UserIdentity {
            id: "a".to_string(),
            display_name: None,
            email: None,
            photo_url: None,
        }));
        assert_eq!(generation, Some(1));
        assert!(session.token_issued(1, "t".to_string()));
        assert_eq!(session.token(), Some("t"));

        assert_eq!(session.identity_changed(None), None);
        assert_eq!(session.token(), None);
        assert!(!session.token_issued(1, "late".to_string()));
        assert!(!session.token_issued(2, "anonymous".to_string()));
    }

    #[tokio::test]
    async fn test_attach_fetches_token_on_sign_in() {
        let provider = FakeProvider::new();
        let manager = SessionManager::new(provider.clone());
        let (tasks, spawn) = collecting_spawner();
        let _sub = manager.attach(spawn);

        // Initial callback: signed out, nothing to fetch
        assert!(tasks.borrow().is_empty());

        provider.set_user(Some("ada"));
        assert!(manager.snapshot().is_signed_in());
        assert_eq!(manager.snapshot().token(), None);

        run_all(&tasks).await;
        assert_eq!(manager.snapshot().token(), Some("ada-token-1"));

        provider.set_user(None);
        assert_eq!(manager.snapshot().token(), None);
        assert!(tasks.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_stale_token_discarded_after_switch() {
        let provider = FakeProvider::new();
        let manager = SessionManager::new(provider.clone());
        let (tasks, spawn) = collecting_spawner();
        let _sub = manager.attach(spawn);

        provider.set_user(Some("ada"));
        let ada_task = tasks.borrow_mut().pop().unwrap();
        provider.set_user(Some("bob"));

        // Ada's fetch resolves after the switch and must not land
        ada_task.await;
        assert_eq!(manager.snapshot().token(), None);

        run_all(&tasks).await;
        let snapshot = manager.snapshot();
        assert_eq!(snapshot.identity().map(|u| u.id.as_str()), Some("bob"));
        assert!(snapshot.token().unwrap().starts_with("bob-token"));
    }

    #[tokio::test]
    async fn test_bearer_token_reads_latest() {
        let provider = FakeProvider::new();
        let manager = SessionManager::new(provider.clone());
        let (_tasks, spawn) = collecting_spawner();
        let _sub = manager.attach(spawn);

        assert_eq!(manager.bearer_token().await, None);

        provider.set_user(Some("ada"));
        let first = manager.bearer_token().await.unwrap();
        let second = manager.bearer_token().await.unwrap();
        assert_ne!(first, second, "a fresh token is requested per call");
        assert_eq!(manager.snapshot().token(), Some(second.as_str()));
    }

    #[tokio::test]
    async fn test_token_failure_is_fail_open() {
        let provider = FakeProvider::new();
        let manager = SessionManager::new(provider.clone());
        let (_tasks, spawn) = collecting_spawner();
        let _sub = manager.attach(spawn);

        provider.set_user(Some("ada"));
        *provider.fail_tokens.borrow_mut() = true;
        assert_eq!(manager.bearer_token().await, None);
    }

    #[tokio::test]
    async fn test_watchers_see_changes() {
        let provider = FakeProvider::new();
        let manager = SessionManager::new(provider.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.watch(move |s| sink.borrow_mut().push((s.is_signed_in(), s.token().is_some())));

        let (tasks, spawn) = collecting_spawner();
        let sub = manager.attach(spawn);
        provider.set_user(Some("ada"));
        run_all(&tasks).await;

        drop(sub);
        provider.set_user(None);

        assert_eq!(*seen.borrow(), vec![(false, false), (true, false), (true, true)]);
    }
}
