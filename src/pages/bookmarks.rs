//! Bookmarks Page

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::SignInPrompt;
use crate::components::RecipeCard;
use crate::context::use_app;
use crate::models::RecipeEntry;
use crate::store::{store_remove_bookmark, use_library, LibraryStateStoreFields};

#[component]
pub fn BookmarksPage() -> impl IntoView {
    let ctx = use_app();
    let library = use_library();
    let (loading, set_loading) = signal(false);
    let (failed, set_failed) = signal(false);

    Effect::new(move |_| {
        if !ctx.has_token.get() {
            return;
        }
        set_loading.set(true);
        set_failed.set(false);
        spawn_local(async move {
            match ctx.api().bookmarks().await {
                Ok(list) => {
                    log::debug!("loaded {} bookmarks", list.len());
                    library.bookmarks().set(list);
                }
                Err(e) => {
                    log::error!("bookmarks failed to load: {}", e);
                    set_failed.set(true);
                }
            }
            set_loading.set(false);
        });
    });

    let on_bookmark_change = Callback::new(move |(id, bookmarked): (String, bool)| {
        if !bookmarked {
            store_remove_bookmark(&library, &id);
        }
    });

    view! {
        <div class="library-page">
            <h1>"Bookmarked Recipes"</h1>
            <Show
                when=move || ctx.is_signed_in()
                fallback=|| view! { <SignInPrompt message="Sign in to see your bookmarks." /> }
            >
                {move || {
                    if loading.get() {
                        view! { <div class="spinner"></div> }.into_any()
                    } else if failed.get() {
                        view! { <p class="error">"Failed to load bookmarks."</p> }.into_any()
                    } else if library.bookmarks().with(|b| b.is_empty()) {
                        view! { <p class="empty">"You haven't bookmarked any recipes yet."</p> }.into_any()
                    } else {
                        view! {
                            <div class="recipe-grid">
                                <For
                                    each=move || library.bookmarks().get()
                                    key=|r| r.id.clone()
                                    let:recipe
                                >
                                    <RecipeCard entry=RecipeEntry::Plain(recipe) on_bookmark_change=on_bookmark_change />
                                </For>
                            </div>
                        }.into_any()
                    }
                }}
            </Show>
        </div>
    }
}
