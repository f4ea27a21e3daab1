//! My Recipes Page
//!
//! Recipes the signed-in user authored, with create and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{delete_own_recipe, deleting_signal, SignInPrompt};
use crate::components::{CreateRecipe, RecipeCard};
use crate::context::use_app;
use crate::models::{Recipe, RecipeEntry};
use crate::store::{store_prepend_my_recipe, store_remove_my_recipe, use_library, LibraryStateStoreFields};

#[component]
pub fn MyRecipesPage() -> impl IntoView {
    let ctx = use_app();
    let library = use_library();
    let (loading, set_loading) = signal(false);
    let (failed, set_failed) = signal(false);
    let (creating, set_creating) = signal(false);

    Effect::new(move |_| {
        if !ctx.has_token.get() {
            return;
        }
        set_loading.set(true);
        set_failed.set(false);
        spawn_local(async move {
            match ctx.api().my_recipes().await {
                Ok(list) => library.my_recipes().set(list),
                Err(e) => {
                    log::error!("my recipes failed to load: {}", e);
                    set_failed.set(true);
                }
            }
            set_loading.set(false);
        });
    });

    let on_created = Callback::new(move |recipe: Recipe| store_prepend_my_recipe(&library, recipe));

    let on_delete = Callback::new(move |id: String| {
        delete_own_recipe(ctx, library, id, move |deleted| store_remove_my_recipe(&library, deleted));
    });

    view! {
        <div class="library-page">
            <div class="page-header">
                <h1>"My Recipes"</h1>
                <Show when=move || ctx.has_token.get()>
                    <button class="create-btn" on:click=move |_| set_creating.set(true)>"Create Recipe"</button>
                </Show>
            </div>
            <Show
                when=move || ctx.is_signed_in()
                fallback=|| view! { <SignInPrompt message="Sign in to manage your recipes." /> }
            >
                {move || {
                    if loading.get() {
                        view! { <div class="spinner"></div> }.into_any()
                    } else if failed.get() {
                        view! { <p class="error">"Failed to load your recipes."</p> }.into_any()
                    } else if library.my_recipes().with(|r| r.is_empty()) {
                        view! { <p class="empty">"You haven't created any recipes yet."</p> }.into_any()
                    } else {
                        view! {
                            <div class="recipe-grid">
                                <For
                                    each=move || library.my_recipes().get()
                                    key=|r| r.id.clone()
                                    let:recipe
                                >
                                    {
                                        let deleting = deleting_signal(library, recipe.id.clone());
                                        view! {
                                            <RecipeCard
                                                entry=RecipeEntry::Plain(recipe)
                                                on_delete=on_delete
                                                deleting=deleting
                                            />
                                        }
                                    }
                                </For>
                            </div>
                        }.into_any()
                    }
                }}
            </Show>
            <Show when=move || creating.get()>
                <CreateRecipe on_close=move |_| set_creating.set(false) on_created=on_created />
            </Show>
        </div>
    }
}
