//! Create Recipe Component
//!
//! Modal authoring form. An optional image is uploaded first, then the
//! recipe is created and handed to `on_created`.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{chosen_file, read_image};
use crate::api::ImageUpload;
use crate::authoring::{
    RecipeDraft, Rows, AUTHORING_DIETARY_OPTIONS, CREATE_FAILED_MESSAGE, IMAGE_UPLOAD_FAILED_MESSAGE,
};
use crate::context::use_app;
use crate::filters::Difficulty;
use crate::models::Recipe;

#[component]
fn RowList(draft: RwSignal<RecipeDraft>, which: Rows, placeholder: &'static str) -> impl IntoView {
    let count = Memo::new(move |_| draft.with(|d| d.rows(which).len()));
    view! {
        <div class="row-list">
            {move || (0..count.get()).map(|index| view! {
                <div class="row">
                    <input
                        type="text"
                        placeholder=format!("{} {}", placeholder, index + 1)
                        prop:value=move || draft.with(|d| d.rows(which).get(index).cloned().unwrap_or_default())
                        on:input=move |ev| draft.update(|d| d.set_row(which, index, event_target_value(&ev)))
                    />
                    <button
                        type="button"
                        class="row-remove"
                        disabled=move || count.get() <= 1
                        on:click=move |_| draft.update(|d| d.remove_row(which, index))
                    >
                        "×"
                    </button>
                </div>
            }).collect_view()}
            <button type="button" class="row-add" on:click=move |_| draft.update(|d| d.add_row(which))>
                {format!("Add {}", placeholder)}
            </button>
        </div>
    }
}

#[component]
pub fn CreateRecipe(
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_created: Callback<Recipe>,
) -> impl IntoView {
    let ctx = use_app();
    let draft = RwSignal::new(RecipeDraft::default());
    let (nutrition_key, set_nutrition_key) = signal(String::new());
    let (nutrition_value, set_nutrition_value) = signal(String::new());
    let (image, set_image) = signal::<Option<ImageUpload>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let on_image = move |ev: web_sys::Event| {
        let file = chosen_file(&ev).filter(|f| f.type_().starts_with("image/"));
        let Some(file) = file else {
            set_image.set(None);
            return;
        };
        spawn_local(async move {
            match read_image(file).await {
                Ok(upload) => set_image.set(Some(upload)),
                Err(e) => {
                    log::error!("{}", e);
                    set_image.set(None);
                }
            }
        });
    };

    let add_nutrition = move |_| {
        let added = draft
            .try_update(|d| d.add_nutrition(&nutrition_key.get_untracked(), &nutrition_value.get_untracked()))
            .unwrap_or(false);
        if added {
            set_nutrition_key.set(String::new());
            set_nutrition_value.set(String::new());
        }
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_error.set(None);
        let mut payload = match draft.with_untracked(|d| d.validate()) {
            Ok(payload) => payload,
            Err(message) => {
                set_error.set(Some(message));
                return;
            }
        };
        set_submitting.set(true);
        let upload = image.get_untracked();
        spawn_local(async move {
            let api = ctx.api();
            if let Some(upload) = upload {
                match api.upload_image(upload).await {
                    Ok(url) => payload.image_url = url,
                    Err(e) => {
                        log::error!("image upload failed: {}", e);
                        set_error.set(Some(IMAGE_UPLOAD_FAILED_MESSAGE.to_string()));
                        set_submitting.set(false);
                        return;
                    }
                }
            }
            match api.create_recipe(&payload).await {
                Ok(recipe) => {
                    log::info!("created recipe {}", recipe.id);
                    on_created.run(recipe);
                    on_close.run(());
                }
                Err(e) => {
                    log::error!("recipe creation failed: {}", e);
                    set_error.set(Some(e.user_message(CREATE_FAILED_MESSAGE)));
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="modal-backdrop">
            <div class="modal create-recipe">
                <header class="modal-header">
                    <h2>"Create a New Recipe"</h2>
                    <button class="modal-close" on:click=move |_| on_close.run(())>"×"</button>
                </header>

                <form on:submit=submit>
                    {move || error.get().map(|e| view! { <p class="error">{e}</p> })}

                    <input
                        type="text"
                        placeholder="Recipe name"
                        prop:value=move || draft.with(|d| d.name.clone())
                        on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                    />
                    <input
                        type="number"
                        min="1"
                        placeholder="Cooking time (minutes)"
                        prop:value=move || draft.with(|d| d.cooking_time.clone())
                        on:input=move |ev| draft.update(|d| d.cooking_time = event_target_value(&ev))
                    />
                    <select on:change=move |ev| {
                        if let Ok(difficulty) = event_target_value(&ev).parse::<Difficulty>() {
                            draft.update(|d| d.difficulty = difficulty);
                        }
                    }>
                        {Difficulty::ALL.into_iter().map(|d| view! {
                            <option value=d.as_str() selected=move || draft.with(|s| s.difficulty == d)>
                                {d.as_str()}
                            </option>
                        }).collect_view()}
                    </select>

                    <label class="image-input">
                        "Image (optional)"
                        <input type="file" accept="image/*" on:change=on_image />
                        {move || image.with(|i| i.as_ref().map(|i| view! { <span class="file-name">{i.file_name.clone()}</span> }))}
                    </label>

                    <h3>"Ingredients"</h3>
                    <RowList draft=draft which=Rows::Ingredients placeholder="Ingredient" />

                    <h3>"Steps"</h3>
                    <RowList draft=draft which=Rows::Steps placeholder="Step" />

                    <fieldset>
                        <legend>"Dietary"</legend>
                        {AUTHORING_DIETARY_OPTIONS.iter().map(|tag| {
                            let tag = *tag;
                            view! {
                                <label class="filter-check">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || draft.with(|d| d.dietary().iter().any(|t| t == tag))
                                        on:change=move |ev| {
                                            let checked = event_target_checked(&ev);
                                            draft.update(|d| d.set_dietary(tag, checked));
                                        }
                                    />
                                    {tag}
                                </label>
                            }
                        }).collect_view()}
                    </fieldset>

                    <fieldset>
                        <legend>"Nutrition"</legend>
                        <ul class="nutrition-list">
                            {move || draft.with(|d| d.nutrition().iter().map(|(k, v)| {
                                let key = k.clone();
                                view! {
                                    <li>
                                        {format!("{}: {}", k, v)}
                                        <button type="button" on:click=move |_| draft.update(|d| d.remove_nutrition(&key))>"×"</button>
                                    </li>
                                }
                            }).collect_view())}
                        </ul>
                        <input
                            type="text"
                            placeholder="e.g. Calories"
                            prop:value=move || nutrition_key.get()
                            on:input=move |ev| set_nutrition_key.set(event_target_value(&ev))
                        />
                        <input
                            type="text"
                            placeholder="e.g. 350 kcal"
                            prop:value=move || nutrition_value.get()
                            on:input=move |ev| set_nutrition_value.set(event_target_value(&ev))
                        />
                        <button type="button" on:click=add_nutrition>"Add"</button>
                    </fieldset>

                    <button type="submit" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Submitting..." } else { "Create Recipe" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
