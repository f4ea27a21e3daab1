//! Recipe Card Component
//!
//! Summary of one recipe with rating, bookmark and (for the author) delete.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{alert, DeleteConfirmButton, StarRating};
use crate::context::{use_app, Page};
use crate::models::RecipeEntry;

#[component]
pub fn RecipeCard(
    entry: RecipeEntry,
    /// Shown only for the author's own recipes
    #[prop(optional)]
    on_delete: Option<Callback<String>>,
    #[prop(optional)] deleting: Option<Signal<bool>>,
    /// Fired with `(recipe_id, is_bookmarked)` after a successful toggle
    #[prop(optional)]
    on_bookmark_change: Option<Callback<(String, bool)>>,
) -> impl IntoView {
    let ctx = use_app();
    let recipe = entry.recipe().clone();
    let recipe_id = recipe.id.clone();
    let deleting = deleting.unwrap_or_else(|| Signal::derive(|| false));

    let (average, set_average) = signal(recipe.average_rating);
    let (count, set_count) = signal(recipe.rating_count);
    let (user_rating, set_user_rating) = signal::<Option<u8>>(None);
    let (rating_busy, set_rating_busy) = signal(false);
    let (bookmarked, set_bookmarked) = signal(false);
    let (bookmark_busy, set_bookmark_busy) = signal(false);
    let (show_details, set_show_details) = signal(false);

    // Bookmark status once a token is available
    let check_id = recipe_id.clone();
    Effect::new(move |_| {
        if !ctx.has_token.get() || check_id.is_empty() {
            set_bookmarked.set(false);
            return;
        }
        let id = check_id.clone();
        spawn_local(async move {
            match ctx.api().is_bookmarked(&id).await {
                Ok(status) => set_bookmarked.set(status),
                Err(e) => log::warn!("bookmark check for {} failed: {}", id, e),
            }
        });
    });

    let rate_id = recipe_id.clone();
    let on_rate = Callback::new(move |stars: u8| {
        if rating_busy.get_untracked() {
            return;
        }
        if !ctx.has_token.get_untracked() {
            ctx.open_login();
            return;
        }
        set_rating_busy.set(true);
        let id = rate_id.clone();
        spawn_local(async move {
            match ctx.api().rate_recipe(&id, stars).await {
                Ok(result) => {
                    set_average.set(result.new_average);
                    set_count.set(result.rating_count);
                    set_user_rating.set(Some(stars));
                    alert("Rating submitted successfully!");
                }
                Err(e) => {
                    log::warn!("rating {} failed: {}", id, e);
                    alert("Failed to submit rating. Please try again.");
                }
            }
            set_rating_busy.set(false);
        });
    });

    let bookmark_id = recipe_id.clone();
    let toggle_bookmark = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if bookmark_busy.get_untracked() || bookmark_id.is_empty() {
            return;
        }
        if !ctx.has_token.get_untracked() {
            ctx.open_login();
            return;
        }
        set_bookmark_busy.set(true);
        let id = bookmark_id.clone();
        let current = bookmarked.get_untracked();
        spawn_local(async move {
            match ctx.api().toggle_bookmark(&id, current).await {
                Ok(now) => {
                    set_bookmarked.set(now);
                    alert(if now { "Recipe bookmarked!" } else { "Bookmark removed!" });
                    if let Some(cb) = on_bookmark_change {
                        cb.run((id, now));
                    }
                }
                Err(e) => {
                    log::warn!("bookmark toggle for {} failed: {}", id, e);
                    alert("Failed to update bookmark. Please try again.");
                }
            }
            set_bookmark_busy.set(false);
        });
    };

    let open_id = recipe_id.clone();
    let matching = entry.matching().to_vec();
    let missing = entry.missing().to_vec();
    let is_match = entry.is_match();
    let name = recipe.display_name().to_string();
    let ingredients = recipe.ingredients.clone();
    let steps = recipe.instructions.clone();
    let first_step = recipe.first_step().map(str::to_string);

    view! {
        <article class="recipe-card">
            {recipe.image_url.clone().map(|url| view! {
                <div class="recipe-image"><img src=url alt=name.clone() /></div>
            })}

            <div class="recipe-body">
                <h3 class="recipe-title" on:click=move |_| ctx.navigate(Page::RecipeDetail(open_id.clone()))>
                    {name.clone()}
                </h3>

                <div class="recipe-meta">
                    {recipe.cooking_time_minutes.map(|m| view! { <span class="meta-time">{format!("{} min", m)}</span> })}
                    {recipe.difficulty.clone().map(|d| view! { <span class="meta-difficulty">{d}</span> })}
                    {recipe.dietary_restrictions.iter().map(|tag| view! { <span class="badge">{tag.clone()}</span> }).collect_view()}
                </div>

                <StarRating
                    average=average
                    count=count
                    user_rating=user_rating
                    disabled=rating_busy
                    on_rate=on_rate
                />

                {is_match.then(|| view! {
                    <div class="match-summary">
                        <p class="matching">
                            {format!("You have ({}): {}", matching.len(), matching.join(", "))}
                        </p>
                        <p class="missing">
                            {format!("Missing ({}): {}", missing.len(), missing.join(", "))}
                        </p>
                    </div>
                })}

                {(!is_match).then(|| first_step.map(|s| view! { <p class="first-step">{s}</p> }))}

                <button class="details-toggle" on:click=move |_| set_show_details.update(|v| *v = !*v)>
                    {move || if show_details.get() { "Hide details" } else { "Ingredients & steps" }}
                </button>
                <Show when=move || show_details.get()>
                    <div class="recipe-details">
                        <h4>"Ingredients"</h4>
                        <ul>{ingredients.iter().map(|i| view! { <li>{i.clone()}</li> }).collect_view()}</ul>
                        <h4>"Steps"</h4>
                        <ol>{steps.iter().map(|s| view! { <li>{s.clone()}</li> }).collect_view()}</ol>
                    </div>
                </Show>
            </div>

            <footer class="recipe-actions">
                <button
                    class=move || if bookmarked.get() { "bookmark-btn active" } else { "bookmark-btn" }
                    disabled=move || bookmark_busy.get()
                    on:click=toggle_bookmark
                >
                    {move || if bookmarked.get() { "Bookmarked" } else { "Bookmark" }}
                </button>
                {on_delete.map(|cb| {
                    let id = recipe_id.clone();
                    view! {
                        <DeleteConfirmButton busy=deleting on_confirm=Callback::new(move |_| cb.run(id.clone())) />
                    }
                })}
            </footer>
        </article>
    }
}
