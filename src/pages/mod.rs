//! Pages
//!
//! One component per [`Page`](crate::context::Page) variant.

mod bookmarks;
mod home;
mod my_recipes;
mod profile;
mod recipe_detail;

pub use bookmarks::BookmarksPage;
pub use home::HomePage;
pub use my_recipes::MyRecipesPage;
pub use profile::ProfilePage;
pub use recipe_detail::RecipeDetailPage;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::alert;
use crate::context::AppContext;
use crate::store::{store_begin_delete, store_end_delete, store_is_deleting, LibraryStore};

/// Delete one of the user's recipes, tracking the request per id.
/// `on_deleted` runs only after the backend confirms.
pub(crate) fn delete_own_recipe(
    ctx: AppContext,
    library: LibraryStore,
    recipe_id: String,
    on_deleted: impl FnOnce(&str) + 'static,
) {
    if !store_begin_delete(&library, &recipe_id) {
        return;
    }
    spawn_local(async move {
        match ctx.api().delete_recipe(&recipe_id).await {
            Ok(()) => {
                log::info!("deleted recipe {}", recipe_id);
                on_deleted(&recipe_id);
            }
            Err(e) => {
                log::error!("delete {} failed: {}", recipe_id, e);
                alert("Failed to delete recipe.");
            }
        }
        store_end_delete(&library, &recipe_id);
    });
}

/// Per-card "delete in flight" flag
pub(crate) fn deleting_signal(library: LibraryStore, recipe_id: String) -> Signal<bool> {
    Signal::derive(move || store_is_deleting(&library, &recipe_id))
}

/// Shown in place of a page that needs an account
#[component]
pub(crate) fn SignInPrompt(message: &'static str) -> impl IntoView {
    let ctx = crate::context::use_app();
    view! {
        <div class="sign-in-prompt">
            <p>{message}</p>
            <button on:click=move |_| ctx.open_login()>"Sign In"</button>
        </div>
    }
}
