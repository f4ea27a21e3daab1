//! UI Components
//!
//! Reusable Leptos components.

mod create_recipe;
mod delete_confirm_button;
mod filters_panel;
mod header;
mod login_dialog;
mod pantry_sidebar;
mod recipe_card;
mod star_rating;

pub use create_recipe::CreateRecipe;
pub use delete_confirm_button::DeleteConfirmButton;
pub use filters_panel::FiltersPanel;
pub use header::Header;
pub use login_dialog::LoginDialog;
pub use pantry_sidebar::PantrySidebar;
pub use recipe_card::RecipeCard;
pub use star_rating::StarRating;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::api::ImageUpload;

/// Transient browser alert for the result of a blocking action
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// First file chosen in an `<input type="file">`
pub fn chosen_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    let input = ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    input.files()?.get(0)
}

/// Read a picked file into memory for a multipart upload
pub async fn read_image(file: web_sys::File) -> Result<ImageUpload, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(ImageUpload {
        file_name: file.name(),
        mime: file.type_(),
        bytes,
    })
}
