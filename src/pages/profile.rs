//! Profile Page
//!
//! Profile document editing, the document-store wishlist and the backend
//! bookmarks in one panel.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::SignInPrompt;
use crate::components::alert;
use crate::context::{use_app, Page};
use crate::documents::{load_profile, remove_saved_recipe, saved_recipes, update_profile};
use crate::error::StoreError;
use crate::models::{Recipe, UserProfile};
use crate::store::{store_remove_saved_recipe, use_library, LibraryStateStoreFields};

#[component]
fn RecipeLinks(recipes: Vec<Recipe>, #[prop(optional)] on_remove: Option<Callback<String>>) -> impl IntoView {
    let ctx = use_app();
    view! {
        <ul class="recipe-links">
            {recipes.into_iter().map(|recipe| {
                let open_id = recipe.id.clone();
                let remove_id = recipe.id.clone();
                view! {
                    <li>
                        <a href="#" on:click=move |ev| {
                            ev.prevent_default();
                            ctx.navigate(Page::RecipeDetail(open_id.clone()));
                        }>
                            {recipe.display_name().to_string()}
                        </a>
                        {on_remove.map(|cb| view! {
                            <button class="link-remove" on:click=move |_| cb.run(remove_id.clone())>"Remove"</button>
                        })}
                    </li>
                }
            }).collect_view()}
        </ul>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let ctx = use_app();
    let library = use_library();
    let (profile, set_profile) = signal::<Option<Result<UserProfile, String>>>(None);
    let (name_draft, set_name_draft) = signal(String::new());
    let (photo_draft, set_photo_draft) = signal(String::new());
    let (saving, set_saving) = signal(false);

    // Profile and wishlist follow the signed-in identity
    Effect::new(move |_| {
        let Some(uid) = ctx.identity.with(|u| u.as_ref().map(|u| u.id.clone())) else {
            set_profile.set(None);
            return;
        };
        spawn_local(async move {
            let store = ctx.documents();
            match load_profile(&*store, &uid).await {
                Ok(loaded) => {
                    set_name_draft.set(loaded.display_name.clone());
                    set_photo_draft.set(loaded.photo_url.clone());
                    set_profile.set(Some(Ok(loaded)));
                }
                Err(e) => {
                    log::error!("profile {} failed to load: {}", uid, e);
                    let message = match e {
                        StoreError::NotFound(m) => m,
                        _ => "Failed to load profile.".to_string(),
                    };
                    set_profile.set(Some(Err(message)));
                }
            }
            match saved_recipes(&*store, &uid).await {
                Ok(list) => library.saved_recipes().set(list),
                Err(e) => log::warn!("wishlist for {} unavailable: {}", uid, e),
            }
        });
    });

    // Backend bookmarks once a token exists
    Effect::new(move |_| {
        if !ctx.has_token.get() {
            return;
        }
        spawn_local(async move {
            match ctx.api().bookmarks().await {
                Ok(list) => library.bookmarks().set(list),
                Err(e) => log::warn!("bookmarks failed to load: {}", e),
            }
        });
    });

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(uid) = ctx.identity.with_untracked(|u| u.as_ref().map(|u| u.id.clone())) else {
            return;
        };
        if saving.get_untracked() {
            return;
        }
        set_saving.set(true);
        let (name, photo) = (name_draft.get_untracked(), photo_draft.get_untracked());
        spawn_local(async move {
            match update_profile(&*ctx.documents(), &uid, &name, &photo).await {
                Ok(()) => {
                    set_profile.update(|p| {
                        if let Some(Ok(p)) = p {
                            p.display_name = name.trim().to_string();
                            p.photo_url = photo.trim().to_string();
                        }
                    });
                    alert("Profile updated.");
                }
                Err(e) => {
                    log::error!("profile update for {} failed: {}", uid, e);
                    alert("Failed to update profile.");
                }
            }
            set_saving.set(false);
        });
    };

    let on_remove_saved = Callback::new(move |recipe_id: String| {
        let Some(uid) = ctx.identity.with_untracked(|u| u.as_ref().map(|u| u.id.clone())) else {
            return;
        };
        spawn_local(async move {
            match remove_saved_recipe(&*ctx.documents(), &uid, &recipe_id).await {
                Ok(()) => store_remove_saved_recipe(&library, &recipe_id),
                Err(e) => {
                    log::error!("removing saved recipe {} failed: {}", recipe_id, e);
                    alert("Failed to remove recipe.");
                }
            }
        });
    });

    view! {
        <div class="profile-page">
            <Show
                when=move || ctx.is_signed_in()
                fallback=|| view! { <SignInPrompt message="Sign in to view your profile." /> }
            >
                {move || match profile.get() {
                    None => view! { <div class="spinner"></div> }.into_any(),
                    Some(Err(message)) => view! { <p class="error">{message}</p> }.into_any(),
                    Some(Ok(p)) => view! {
                        <section class="profile-card">
                            {(!p.photo_url.is_empty()).then(|| view! {
                                <img class="avatar" src=p.photo_url.clone() alt="Profile photo" />
                            })}
                            <h1>{p.display_name.clone()}</h1>
                            <p class="email">{p.email.clone().unwrap_or_default()}</p>
                        </section>
                    }.into_any(),
                }}

                <form class="profile-form" on:submit=save>
                    <label>
                        "Display name"
                        <input
                            type="text"
                            prop:value=move || name_draft.get()
                            on:input=move |ev| set_name_draft.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Photo URL"
                        <input
                            type="url"
                            prop:value=move || photo_draft.get()
                            on:input=move |ev| set_photo_draft.set(event_target_value(&ev))
                        />
                    </label>
                    <button type="submit" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </form>

                <section>
                    <h2>"Wishlist"</h2>
                    {move || {
                        let saved = library.saved_recipes().get();
                        if saved.is_empty() {
                            view! { <p class="empty">"No saved recipes."</p> }.into_any()
                        } else {
                            view! { <RecipeLinks recipes=saved on_remove=on_remove_saved /> }.into_any()
                        }
                    }}
                </section>

                <section>
                    <h2>"Bookmarks"</h2>
                    {move || {
                        let bookmarks = library.bookmarks().get();
                        if bookmarks.is_empty() {
                            view! { <p class="empty">"No bookmarks yet."</p> }.into_any()
                        } else {
                            view! { <RecipeLinks recipes=bookmarks /> }.into_any()
                        }
                    }}
                </section>

                <button class="sign-out" on:click=move |_| ctx.sign_out()>"Sign Out"</button>
            </Show>
        </div>
    }
}
