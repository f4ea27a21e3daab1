//! Recipe Detail Page

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{alert, StarRating};
use crate::context::{use_app, Page};
use crate::error::ApiError;
use crate::models::{Feedback, Recipe};

#[component]
pub fn RecipeDetailPage(recipe_id: String) -> impl IntoView {
    let ctx = use_app();
    let (recipe, set_recipe) = signal::<Option<Result<Recipe, String>>>(None);
    let (feedbacks, set_feedbacks) = signal(Vec::<Feedback>::new());
    let (average, set_average) = signal(0.0f64);
    let (count, set_count) = signal(0u32);
    let (user_rating, set_user_rating) = signal::<Option<u8>>(None);
    let (rating_busy, set_rating_busy) = signal(false);
    let (draft, set_draft) = signal(String::new());
    let (posting, set_posting) = signal(false);

    let load_id = recipe_id.clone();
    Effect::new(move |_| {
        let id = load_id.clone();
        spawn_local(async move {
            let api = ctx.api();
            match api.recipe(&id).await {
                Ok(loaded) => {
                    set_average.set(loaded.average_rating);
                    set_count.set(loaded.rating_count);
                    set_recipe.set(Some(Ok(loaded)));
                }
                Err(e) => {
                    log::error!("recipe {} failed to load: {}", id, e);
                    let message = match e {
                        ApiError::NotFound(_) => "Recipe not found".to_string(),
                        other => other.user_message("Failed to load recipe."),
                    };
                    set_recipe.set(Some(Err(message)));
                }
            }
            match api.feedbacks(&id).await {
                Ok(list) => set_feedbacks.set(list),
                Err(e) => {
                    log::warn!("feedback for {} unavailable: {}", id, e);
                    set_feedbacks.set(Vec::new());
                }
            }
        });
    });

    let rate_id = recipe_id.clone();
    let on_rate = Callback::new(move |stars: u8| {
        if rating_busy.get_untracked() || !ctx.has_token.get_untracked() {
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
                }
                Err(e) => {
                    log::warn!("rating {} failed: {}", id, e);
                    alert("Failed to submit rating.");
                }
            }
            set_rating_busy.set(false);
        });
    });

    let feedback_id = recipe_id.clone();
    let submit_feedback = move |_: web_sys::MouseEvent| {
        let text = draft.get_untracked();
        if posting.get_untracked() || text.trim().is_empty() {
            return;
        }
        if !ctx.has_token.get_untracked() {
            ctx.open_login();
            return;
        }
        set_posting.set(true);
        let id = feedback_id.clone();
        spawn_local(async move {
            match ctx.api().add_feedback(&id, &text).await {
                Ok(()) => {
                    let user = ctx
                        .identity
                        .get_untracked()
                        .map(|u| u.display_label())
                        .unwrap_or_else(|| "You".to_string());
                    set_feedbacks.update(|list| list.push(Feedback { user, text }));
                    set_draft.set(String::new());
                }
                Err(e) => {
                    log::warn!("feedback on {} failed: {}", id, e);
                    alert("Failed to submit feedback.");
                }
            }
            set_posting.set(false);
        });
    };

    let body = move |recipe: Recipe| {
        let nutrition: Vec<(String, String)> = recipe.nutritional_info.clone().into_iter().collect();
        view! {
            <div class="detail-layout">
                <div class="detail-left">
                    {recipe.image_url.clone().map(|url| view! { <img class="detail-image" src=url alt=recipe.name.clone() /> })}
                    <h1>{recipe.display_name().to_string()}</h1>
                    {recipe.description.iter().map(|p| view! { <p class="description">{p.clone()}</p> }).collect_view()}

                    <div class="detail-meta">
                        <span>{recipe.difficulty.clone().unwrap_or_else(|| "Unknown".to_string())}</span>
                        {recipe.cooking_time_minutes.map(|m| view! { <span>{format!("{} min", m)}</span> })}
                        {recipe.dietary_restrictions.iter().map(|t| view! { <span class="badge">{t.clone()}</span> }).collect_view()}
                        {recipe.cuisine.iter().map(|c| view! { <span class="badge cuisine">{c.clone()}</span> }).collect_view()}
                    </div>

                    <Show
                        when=move || ctx.has_token.get()
                        fallback=|| view! { <p class="hint">"Sign in to rate"</p> }
                    >
                        <span class="label">"Your Rating:"</span>
                    </Show>
                    <StarRating
                        average=average
                        count=count
                        user_rating=user_rating
                        disabled=Signal::derive(move || rating_busy.get() || !ctx.has_token.get())
                        on_rate=on_rate
                    />

                    <div class="feedback-form">
                        <span class="label">"Leave Feedback:"</span>
                        <textarea
                            rows="2"
                            placeholder="Write your thoughts..."
                            prop:value=move || draft.get()
                            on:input=move |ev| set_draft.set(event_target_value(&ev))
                        ></textarea>
                        <button
                            disabled=move || posting.get() || draft.with(|d| d.trim().is_empty())
                            on:click=submit_feedback.clone()
                        >
                            {move || if posting.get() { "Submitting..." } else { "Submit" }}
                        </button>
                    </div>
                </div>

                <div class="detail-right">
                    <section>
                        <h2>"Ingredients"</h2>
                        <div class="ingredient-chips">
                            {recipe.ingredients.iter().map(|i| view! { <span class="chip">{i.clone()}</span> }).collect_view()}
                        </div>
                    </section>
                    <section>
                        <h2>"Instructions"</h2>
                        <ol>{recipe.instructions.iter().map(|s| view! { <li>{s.clone()}</li> }).collect_view()}</ol>
                    </section>
                    {(!nutrition.is_empty()).then(|| view! {
                        <section>
                            <h2>"Nutrition"</h2>
                            <table class="nutrition">
                                {nutrition.into_iter().map(|(k, v)| view! { <tr><td>{k}</td><td>{v}</td></tr> }).collect_view()}
                            </table>
                        </section>
                    })}
                    <section>
                        <h2>"Feedback"</h2>
                        <Show
                            when=move || feedbacks.with(|f| !f.is_empty())
                            fallback=|| view! { <p class="empty">"No feedback yet."</p> }
                        >
                            <ul class="feedback-list">
                                {move || feedbacks.get().into_iter().map(|f| view! {
                                    <li><strong>{f.user}</strong>": "{f.text}</li>
                                }).collect_view()}
                            </ul>
                        </Show>
                    </section>
                </div>
            </div>
        }
    };

    view! {
        <div class="recipe-detail">
            <button class="back-btn" on:click=move |_| ctx.navigate(Page::Home)>"← Back"</button>
            {move || match recipe.get() {
                None => view! { <div class="spinner"></div> }.into_any(),
                Some(Err(message)) => view! { <p class="error">{message}</p> }.into_any(),
                Some(Ok(loaded)) => body(loaded).into_any(),
            }}
        </div>
    }
}
