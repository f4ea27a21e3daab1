//! Star Rating Component

use leptos::prelude::*;

/// Five clickable stars showing the average, with the count beside them.
/// The user's own rating, once given, is highlighted instead of the average.
#[component]
pub fn StarRating(
    #[prop(into)] average: Signal<f64>,
    #[prop(into)] count: Signal<u32>,
    #[prop(into)] user_rating: Signal<Option<u8>>,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(into)] on_rate: Callback<u8>,
) -> impl IntoView {
    let (hovered, set_hovered) = signal::<Option<u8>>(None);

    let lit = move || {
        hovered
            .get()
            .map(f64::from)
            .or_else(|| user_rating.get().map(f64::from))
            .unwrap_or_else(|| average.get().round())
    };

    view! {
        <div class="star-rating" on:mouseleave=move |_| set_hovered.set(None)>
            {(1u8..=5).map(|star| view! {
                <button
                    type="button"
                    class=move || if f64::from(star) <= lit() { "star filled" } else { "star" }
                    disabled=move || disabled.get()
                    on:mouseenter=move |_| set_hovered.set(Some(star))
                    on:click=move |ev| {
                        ev.stop_propagation();
                        on_rate.run(star);
                    }
                >
                    "★"
                </button>
            }).collect_view()}
            <span class="rating-summary">
                {move || format!("{:.1} ({})", average.get(), count.get())}
            </span>
        </div>
    }
}
