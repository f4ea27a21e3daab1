//! Application Context
//!
//! Shared state provided via Leptos Context API. Service handles are not
//! `Send`, so they live in a local `StoredValue` and are cloned out at the
//! point of use.

use std::rc::Rc;

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::documents::DocumentStore;
use crate::models::UserIdentity;
use crate::session::SessionManager;

/// Which screen is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    RecipeDetail(String),
    Bookmarks,
    MyRecipes,
    Profile,
}

/// Backend collaborators shared by every view
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub session: SessionManager,
    pub documents: Rc<dyn DocumentStore>,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub page: ReadSignal<Page>,
    set_page: WriteSignal<Page>,
    /// Signed-in user, mirrored from the session manager
    pub identity: ReadSignal<Option<UserIdentity>>,
    /// A bearer token has been issued for the current identity
    pub has_token: ReadSignal<bool>,
    /// Search submitted from the header of a non-home page, consumed by Home
    pub pending_search: ReadSignal<Option<String>>,
    set_pending_search: WriteSignal<Option<String>>,
    /// Whether the sign-in dialog is open
    pub login_open: ReadSignal<bool>,
    set_login_open: WriteSignal<bool>,
    services: StoredValue<Services, LocalStorage>,
}

impl AppContext {
    pub fn new(
        page: (ReadSignal<Page>, WriteSignal<Page>),
        identity: ReadSignal<Option<UserIdentity>>,
        has_token: ReadSignal<bool>,
        services: Services,
    ) -> Self {
        let (pending_search, set_pending_search) = signal::<Option<String>>(None);
        let (login_open, set_login_open) = signal(false);
        Self {
            page: page.0,
            set_page: page.1,
            identity,
            has_token,
            pending_search,
            set_pending_search,
            login_open,
            set_login_open,
            services: StoredValue::new_local(services),
        }
    }

    pub fn navigate(&self, page: Page) {
        log::debug!("navigate to {:?}", page);
        self.set_page.set(page);
    }

    /// Header search: run it on the home page, switching there if needed
    pub fn search_from_header(&self, query: String) {
        if query.trim().is_empty() {
            return;
        }
        self.set_pending_search.set(Some(query));
        if self.page.get_untracked() != Page::Home {
            self.navigate(Page::Home);
        }
    }

    pub fn take_pending_search(&self) -> Option<String> {
        let query = self.pending_search.get_untracked();
        if query.is_some() {
            self.set_pending_search.set(None);
        }
        query
    }

    pub fn open_login(&self) {
        self.set_login_open.set(true);
    }

    pub fn close_login(&self) {
        self.set_login_open.set(false);
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.get().is_some()
    }

    pub fn api(&self) -> ApiClient {
        self.services.with_value(|s| s.api.clone())
    }

    pub fn session(&self) -> SessionManager {
        self.services.with_value(|s| s.session.clone())
    }

    pub fn documents(&self) -> Rc<dyn DocumentStore> {
        self.services.with_value(|s| Rc::clone(&s.documents))
    }

    /// Sign out through the identity provider; the session follows via its
    /// subscription
    pub fn sign_out(&self) {
        self.session().provider().sign_out();
        self.navigate(Page::Home);
    }
}

/// Get the app context
pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}
