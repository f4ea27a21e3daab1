//! Pantry Chef App
//!
//! Root component: builds the service graph, mirrors the session into
//! signals and switches between pages.

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::ApiClient;
use crate::components::{Header, LoginDialog};
use crate::config::{AppConfig, TOKEN_REISSUE_INTERVAL_MS};
use crate::context::{AppContext, Page, Services};
use crate::documents::Firestore;
use crate::identity::{FirebaseAuth, IdentityProvider};
use crate::logging;
use crate::models::UserIdentity;
use crate::pages::{BookmarksPage, HomePage, MyRecipesPage, ProfilePage, RecipeDetailPage};
use crate::session::{SessionManager, TokenSource};
use crate::store::{store_clear, LibraryState};

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_build_env();
    logging::init(config.log_level);
    log::info!("starting with backend {}", config.api_base_url);

    let auth = Rc::new(FirebaseAuth::new(config.firebase_api_key.clone()));
    let provider: Rc<dyn IdentityProvider> = auth.clone();
    let session = SessionManager::new(provider);
    let tokens: Rc<dyn TokenSource> = Rc::new(session.clone());
    let services = Services {
        api: ApiClient::new(&config.api_base_url, Rc::clone(&tokens)),
        session: session.clone(),
        documents: Rc::new(Firestore::new(&config.firebase_project_id, tokens)),
    };

    let (identity, set_identity) = signal::<Option<UserIdentity>>(None);
    let (has_token, set_has_token) = signal(false);
    let library = Store::new(LibraryState::default());

    // Mirror the session into signals; collections belong to one user
    session.watch(move |s| {
        let user = s.identity().cloned();
        if identity.with_untracked(|current| current.as_ref().map(|u| &u.id) != user.as_ref().map(|u| &u.id)) {
            store_clear(&library);
        }
        set_identity.set(user);
        set_has_token.set(s.token().is_some());
    });

    let subscription = session.attach(|task| spawn_local(task));
    // Lives as long as the app owner
    StoredValue::new_local(subscription);

    spawn_local(async move {
        auth.restore().await;
    });

    let reissuer = session.clone();
    spawn_local(async move {
        loop {
            TimeoutFuture::new(TOKEN_REISSUE_INTERVAL_MS).await;
            reissuer.reissue().await;
        }
    });

    let ctx = AppContext::new(signal(Page::Home), identity, has_token, services);
    provide_context(ctx);
    provide_context(library);

    view! {
        <div class="app-layout">
            <Header />
            <main class="main-content">
                {move || match ctx.page.get() {
                    Page::Home => view! { <HomePage /> }.into_any(),
                    Page::RecipeDetail(id) => view! { <RecipeDetailPage recipe_id=id /> }.into_any(),
                    Page::Bookmarks => view! { <BookmarksPage /> }.into_any(),
                    Page::MyRecipes => view! { <MyRecipesPage /> }.into_any(),
                    Page::Profile => view! { <ProfilePage /> }.into_any(),
                }}
            </main>
            <LoginDialog />
        </div>
    }
}
