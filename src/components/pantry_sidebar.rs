//! Pantry Sidebar Component
//!
//! Ingredient catalog with a text filter, the current basket, filters and
//! the image scan button.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{chosen_file, read_image, FiltersPanel};
use crate::api::ImageUpload;
use crate::home::HomeState;
use crate::models::IngredientCategory;
use crate::pantry::filter_catalog;

#[component]
pub fn PantrySidebar(
    state: RwSignal<HomeState>,
    #[prop(into)] catalog: Signal<Vec<IngredientCategory>>,
    #[prop(into)] catalog_error: Signal<Option<String>>,
    #[prop(into)] scanning: Signal<bool>,
    #[prop(into)] on_toggle: Callback<String>,
    #[prop(into)] on_scan: Callback<ImageUpload>,
) -> impl IntoView {
    let (search, set_search) = signal(String::new());
    let (open_category, set_open_category) = signal::<Option<String>>(None);

    let visible = Memo::new(move |_| catalog.with(|c| filter_catalog(c, &search.get())));
    let basket = Memo::new(move |_| state.with(|s| s.pantry.items().to_vec()));

    let on_file = move |ev: web_sys::Event| {
        let Some(file) = chosen_file(&ev) else { return };
        spawn_local(async move {
            match read_image(file).await {
                Ok(upload) => on_scan.run(upload),
                Err(e) => log::error!("{}", e),
            }
        });
    };

    view! {
        <aside class="pantry-sidebar">
            <input
                type="text"
                class="ingredient-search"
                placeholder="Search ingredients..."
                prop:value=move || search.get()
                on:input=move |ev| set_search.set(event_target_value(&ev))
            />

            <div class="basket">
                <div class="basket-header">
                    <h3>{move || format!("My Basket ({})", basket.get().len())}</h3>
                    <FiltersPanel state=state />
                </div>
                <div class="basket-items">
                    <For
                        each=move || basket.get()
                        key=|item| item.clone()
                        children=move |item| {
                            let name = item.clone();
                            view! {
                                <span class="badge">
                                    {item}
                                    <button class="badge-remove" on:click=move |_| on_toggle.run(name.clone())>"×"</button>
                                </span>
                            }
                        }
                    />
                </div>
            </div>

            <label class=move || if scanning.get() { "scan-btn busy" } else { "scan-btn" }>
                {move || if scanning.get() { "Scanning..." } else { "Upload Image to Scan Ingredients" }}
                <input
                    type="file"
                    accept="image/jpeg, image/png"
                    class="hidden"
                    disabled=move || scanning.get()
                    on:change=on_file
                />
            </label>

            {move || catalog_error.get().map(|e| view! { <p class="error">{e}</p> })}

            <div class="catalog">
                <For
                    each=move || visible.get()
                    key=|cat| cat.category.clone()
                    children=move |cat| {
                        let IngredientCategory { category, items } = cat;
                        let title = category.clone();
                        let toggle_key = category.clone();
                        let is_open = move || {
                            !search.get().trim().is_empty() || open_category.get().as_deref() == Some(category.as_str())
                        };
                        view! {
                            <section class="catalog-category">
                                <button
                                    class="category-trigger"
                                    on:click=move |_| set_open_category.update(|open| {
                                        *open = match open.take() {
                                            Some(c) if c == toggle_key => None,
                                            _ => Some(toggle_key.clone()),
                                        };
                                    })
                                >
                                    {title}
                                </button>
                                <Show when=is_open>
                                    <ul class="catalog-items">
                                        {items.clone().into_iter().map(|item| {
                                            let label = item.clone();
                                            let probe = item.clone();
                                            let in_basket = Memo::new(move |_| state.with(|s| s.pantry.contains(&probe)));
                                            view! {
                                                <li class="catalog-item">
                                                    <span>{label}</span>
                                                    <button
                                                        class=move || if in_basket.get() { "toggle-btn remove" } else { "toggle-btn add" }
                                                        on:click=move |_| on_toggle.run(item.clone())
                                                    >
                                                        {move || if in_basket.get() { "−" } else { "+" }}
                                                    </button>
                                                </li>
                                            }
                                        }).collect_view()}
                                    </ul>
                                </Show>
                            </section>
                        }
                    }
                />
            </div>
        </aside>
    }
}
