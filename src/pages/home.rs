//! Home Page
//!
//! Pantry sidebar plus the result area driven by [`HomeState`]. Timers and
//! fetches run here; every state transition goes through `HomeState`.

use leptos::prelude::*;
use leptos::task::spawn_local;
use gloo_timers::future::TimeoutFuture;

use super::{delete_own_recipe, deleting_signal};
use crate::api::{ApiClient, ImageUpload};
use crate::components::{CreateRecipe, PantrySidebar, RecipeCard};
use crate::config::PANTRY_DEBOUNCE_MS;
use crate::context::use_app;
use crate::home::{Display, HomeState, PantryChange, PantryRequest, SearchRequest};
use crate::models::{IngredientCategory, Recipe, RecipeEntry};
use crate::store::use_library;

async fn run_pantry(api: ApiClient, state: RwSignal<HomeState>, request: PantryRequest) {
    log::debug!("pantry request #{} with {} items", request.seq, request.ingredients.len());
    let outcome = api
        .generate_recipes(&request.ingredients, request.filters.as_ref())
        .await;
    state.update(|s| {
        s.complete_pantry(request.seq, outcome);
    });
}

async fn run_search(api: ApiClient, state: RwSignal<HomeState>, request: SearchRequest) {
    let outcome = api.search(&request.query).await;
    state.update(|s| {
        s.complete_search(request.seq, &request.query, outcome);
    });
}

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_app();
    let library = use_library();
    let state = RwSignal::new(HomeState::new());
    let (catalog, set_catalog) = signal(Vec::<IngredientCategory>::new());
    let (catalog_error, set_catalog_error) = signal::<Option<String>>(None);
    let (scanning, set_scanning) = signal(false);
    let (creating, set_creating) = signal(false);

    // Catalog and featured recipes on mount
    Effect::new(move |_| {
        spawn_local(async move {
            let api = ctx.api();
            match api.ingredient_catalog().await {
                Ok(loaded) => set_catalog.set(loaded),
                Err(e) => {
                    log::error!("ingredient catalog failed: {}", e);
                    set_catalog_error.set(Some("Could not load ingredient library.".to_string()));
                }
            }
            match api.chefs_choice().await {
                Ok(featured) => state.update(|s| s.set_featured(featured)),
                Err(e) => log::warn!("chef's choice failed: {}", e),
            }
        });
    });

    // Header searches land here
    Effect::new(move |_| {
        if ctx.pending_search.get().is_none() {
            return;
        }
        let Some(query) = ctx.take_pending_search() else { return };
        if let Some(request) = state.try_update(|s| s.submit_search(&query)).flatten() {
            spawn_local(run_search(ctx.api(), state, request));
        }
    });

    let on_toggle = Callback::new(move |name: String| {
        let change = state
            .try_update(|s| s.toggle_ingredient(&name))
            .unwrap_or(PantryChange::Unchanged);
        if let PantryChange::Debounce(ticket) = change {
            spawn_local(async move {
                TimeoutFuture::new(PANTRY_DEBOUNCE_MS).await;
                if let Some(request) = state.try_update(|s| s.debounce_elapsed(ticket)).flatten() {
                    run_pantry(ctx.api(), state, request).await;
                }
            });
        }
    });

    let on_scan = Callback::new(move |upload: ImageUpload| {
        if scanning.get_untracked() {
            return;
        }
        set_scanning.set(true);
        spawn_local(async move {
            let api = ctx.api();
            match api.recognize_ingredients(upload).await {
                Ok(names) => {
                    log::info!("recognized {} ingredients", names.len());
                    if let Some(request) = state.try_update(|s| s.set_pantry_from_recognition(names)).flatten() {
                        set_scanning.set(false);
                        run_pantry(api, state, request).await;
                        return;
                    }
                }
                Err(e) => state.update(|s| s.recognition_failed(&e)),
            }
            set_scanning.set(false);
        });
    });

    let on_created = Callback::new(move |recipe: Recipe| state.update(|s| s.prepend_recipe(recipe)));

    let on_delete = Callback::new(move |id: String| {
        delete_own_recipe(ctx, library, id, move |deleted| state.update(|s| s.remove_recipe(deleted)));
    });

    let display = Memo::new(move |_| state.with(|s| s.display()));

    let card = move |entry: RecipeEntry| {
        let own = {
            let owner = entry.recipe().user_id.clone();
            ctx.identity.with_untracked(|u| u.as_ref().map(|u| Some(u.id.clone()) == owner).unwrap_or(false))
        };
        let deleting = deleting_signal(library, entry.recipe().id.clone());
        if own {
            view! { <RecipeCard entry=entry on_delete=on_delete deleting=deleting /> }.into_any()
        } else {
            view! { <RecipeCard entry=entry /> }.into_any()
        }
    };

    view! {
        <div class="home-layout">
            <PantrySidebar
                state=state
                catalog=catalog
                catalog_error=catalog_error
                scanning=scanning
                on_toggle=on_toggle
                on_scan=on_scan
            />

            <section class="results">
                <div class="results-toolbar">
                    <Show when=move || ctx.has_token.get()>
                        <button class="create-btn" on:click=move |_| set_creating.set(true)>"Create Recipe"</button>
                    </Show>
                </div>

                <Show when=move || state.with(|s| s.is_loading())>
                    <p class="loading">"Please wait while we optimize your search..."</p>
                </Show>

                {move || state.with(|s| s.error().map(str::to_string)).map(|e| view! {
                    <div class="error-banner">
                        <p>{e}</p>
                        <button on:click=move |_| state.update(|s| s.dismiss_error())>"×"</button>
                    </div>
                })}

                {move || match display.get() {
                    Display::Results { title, entries } => view! {
                        <h2>{title}</h2>
                        <div class="recipe-grid">
                            {entries.into_iter().map(card).collect_view()}
                        </div>
                    }.into_any(),
                    Display::Loading => view! { <div class="spinner"></div> }.into_any(),
                    Display::Featured(recipes) => view! {
                        <div class="hero">
                            <h1>"Welcome to Smart Recipes!"</h1>
                            <p>"Add your ingredients to browse and filter delicious recipes."</p>
                            <p class="hero-sub">"Discover chef's choice recipes below"</p>
                        </div>
                        <div class="recipe-grid">
                            {recipes.into_iter().map(|r| card(RecipeEntry::Plain(r))).collect_view()}
                        </div>
                    }.into_any(),
                    Display::Empty(message) => view! { <p class="empty">{message}</p> }.into_any(),
                }}
            </section>

            <Show when=move || creating.get()>
                <CreateRecipe on_close=move |_| set_creating.set(false) on_created=on_created />
            </Show>
        </div>
    }
}
