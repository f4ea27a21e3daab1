//! Filters Panel Component
//!
//! Collapsible controls over the home view's [`FilterState`]. Changes only
//! re-filter the list already on screen.
//!
//! [`FilterState`]: crate::filters::FilterState

use leptos::prelude::*;

use crate::filters::{Difficulty, CUISINE_OPTIONS, DIETARY_OPTIONS, MAX_TIME_LIMIT, MAX_TIME_STEP, MIN_RATING_STEP};
use crate::home::HomeState;

#[component]
pub fn FiltersPanel(state: RwSignal<HomeState>) -> impl IntoView {
    let (open, set_open) = signal(false);
    let active = Memo::new(move |_| state.with(|s| s.filters.is_active()));

    let max_time = move || state.with(|s| s.filters.max_time.unwrap_or(0));
    let min_rating = move || state.with(|s| s.filters.min_rating.unwrap_or(0.0));

    view! {
        <div class="filters-panel">
            <button
                class=move || if active.get() { "filters-toggle active" } else { "filters-toggle" }
                on:click=move |_| set_open.update(|o| *o = !*o)
            >
                "Filters"
            </button>

            <Show when=move || open.get()>
                <div class="filters-body">
                    <fieldset>
                        <legend>"Dietary"</legend>
                        {DIETARY_OPTIONS.iter().map(|tag| {
                            let tag = *tag;
                            view! {
                                <label class="filter-check">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || state.with(|s| s.filters.dietary.contains(tag))
                                        on:change=move |_| state.update(|s| s.filters.toggle_dietary(tag))
                                    />
                                    {tag}
                                </label>
                            }
                        }).collect_view()}
                    </fieldset>

                    <label class="filter-range">
                        {move || match max_time() {
                            0 => "Max time: any".to_string(),
                            m => format!("Max time: {} min", m),
                        }}
                        <input
                            type="range"
                            min="0"
                            max=MAX_TIME_LIMIT.to_string()
                            step=MAX_TIME_STEP.to_string()
                            prop:value=move || max_time().to_string()
                            on:input=move |ev| {
                                let minutes = event_target_value(&ev).parse::<u32>().ok();
                                state.update(|s| s.filters.set_max_time(minutes));
                            }
                        />
                    </label>

                    <label class="filter-select">
                        "Difficulty"
                        <select on:change=move |ev| {
                            let difficulty = event_target_value(&ev).parse::<Difficulty>().ok();
                            state.update(|s| s.filters.set_difficulty(difficulty));
                        }>
                            <option value="" selected=move || state.with(|s| s.filters.difficulty.is_none())>"Any"</option>
                            {Difficulty::ALL.into_iter().map(|d| view! {
                                <option
                                    value=d.as_str()
                                    selected=move || state.with(|s| s.filters.difficulty == Some(d))
                                >
                                    {d.as_str()}
                                </option>
                            }).collect_view()}
                        </select>
                    </label>

                    <label class="filter-range">
                        {move || format!("Min rating: {:.1}", min_rating())}
                        <input
                            type="range"
                            min="0"
                            max="5"
                            step=MIN_RATING_STEP.to_string()
                            prop:value=move || min_rating().to_string()
                            on:input=move |ev| {
                                let rating = event_target_value(&ev).parse::<f64>().ok();
                                state.update(|s| s.filters.set_min_rating(rating));
                            }
                        />
                    </label>

                    <fieldset>
                        <legend>"Cuisine"</legend>
                        {CUISINE_OPTIONS.iter().map(|cuisine| {
                            let cuisine = *cuisine;
                            view! {
                                <label class="filter-check">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || state.with(|s| s.filters.cuisine.contains(cuisine))
                                        on:change=move |_| state.update(|s| s.filters.toggle_cuisine(cuisine))
                                    />
                                    {cuisine}
                                </label>
                            }
                        }).collect_view()}
                    </fieldset>

                    <button class="filters-clear" on:click=move |_| state.update(|s| s.filters.clear())>
                        "Clear Filters"
                    </button>
                </div>
            </Show>
        </div>
    }
}
