//! Login Dialog Component
//!
//! Email/password sign-in and sign-up plus Google sign-in. The Google
//! credential comes from the host page's Identity Services integration.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::account::{email_sign_in, federated_sign_in, GOOGLE_PROVIDER};
use crate::context::use_app;

#[wasm_bindgen]
extern "C" {
    /// Resolves to `{ idToken }` once the user picks a Google account
    #[wasm_bindgen(js_namespace = ["window", "recipeAuth"], js_name = requestGoogleCredential, catch)]
    async fn request_google_credential() -> Result<JsValue, JsValue>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCredential {
    id_token: String,
}

async fn google_id_token() -> Result<String, String> {
    let value = request_google_credential()
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| "Google sign-in was cancelled.".to_string()))?;
    serde_wasm_bindgen::from_value::<GoogleCredential>(value)
        .map(|c| c.id_token)
        .map_err(|e| format!("Failed to parse Google credential: {}", e))
}

#[component]
pub fn LoginDialog() -> impl IntoView {
    let ctx = use_app();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (sign_up, set_sign_up) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let finish = move |result: Result<String, String>| {
        match result {
            Ok(uid) => {
                log::info!("signed in as {}", uid);
                set_password.set(String::new());
                ctx.close_login();
            }
            Err(message) => set_error.set(Some(message)),
        }
        set_busy.set(false);
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        let (email, password, sign_up) = (email.get_untracked(), password.get_untracked(), sign_up.get_untracked());
        spawn_local(async move {
            let provider = ctx.session().provider();
            let documents = ctx.documents();
            let result = email_sign_in(&*provider, &*documents, &email, &password, sign_up).await;
            finish(result.map(|u| u.id));
        });
    };

    let google = move |_: web_sys::MouseEvent| {
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = match google_id_token().await {
                Ok(token) => {
                    let provider = ctx.session().provider();
                    let documents = ctx.documents();
                    federated_sign_in(&*provider, &*documents, GOOGLE_PROVIDER, &token)
                        .await
                        .map(|u| u.id)
                }
                Err(e) => Err(e),
            };
            finish(result);
        });
    };

    view! {
        <Show when=move || ctx.login_open.get()>
            <div class="modal-backdrop" on:click=move |_| ctx.close_login()>
                <div class="modal login-dialog" on:click=|ev| ev.stop_propagation()>
                    <button class="modal-close" on:click=move |_| ctx.close_login()>"×"</button>
                    <h2>{move || if sign_up.get() { "Create an Account" } else { "Sign In" }}</h2>

                    {move || error.get().map(|e| view! { <p class="error">{e}</p> })}

                    <form on:submit=submit>
                        <input
                            type="email"
                            placeholder="Email"
                            required
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                        <input
                            type="password"
                            placeholder="Password"
                            required
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                        <button type="submit" disabled=move || busy.get()>
                            {move || if sign_up.get() { "Sign Up" } else { "Sign In" }}
                        </button>
                    </form>

                    <div class="divider">"Or continue with"</div>
                    <button class="google-btn" disabled=move || busy.get() on:click=google>
                        "Sign in with Google"
                    </button>

                    <p class="switch-mode">
                        {move || if sign_up.get() { "Already have an account?" } else { "Don't have an account?" }}
                        <button type="button" on:click=move |_| set_sign_up.update(|s| *s = !*s)>
                            {move || if sign_up.get() { "Sign In" } else { "Sign Up" }}
                        </button>
                    </p>
                </div>
            </div>
        </Show>
    }
}
