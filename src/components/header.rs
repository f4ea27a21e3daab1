//! Header Component
//!
//! App title, recipe search and account navigation.

use leptos::prelude::*;

use crate::context::{use_app, Page};

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app();
    let (query, set_query) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.search_from_header(query.get_untracked());
    };

    let nav_class = move |page: Page| {
        move || if ctx.page.get() == page { "nav-btn active" } else { "nav-btn" }
    };

    view! {
        <header class="app-header">
            <button class="brand" on:click=move |_| ctx.navigate(Page::Home)>
                "Pantry Chef"
            </button>

            <form class="search-form" on:submit=submit>
                <input
                    type="search"
                    placeholder="Search recipes by name"
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
            </form>

            <nav class="account-nav">
                {move || match ctx.identity.get() {
                    Some(user) => view! {
                        <button class=nav_class(Page::Bookmarks) on:click=move |_| ctx.navigate(Page::Bookmarks)>
                            "Bookmarks"
                        </button>
                        <button class=nav_class(Page::MyRecipes) on:click=move |_| ctx.navigate(Page::MyRecipes)>
                            "My Recipes"
                        </button>
                        <button class=nav_class(Page::Profile) on:click=move |_| ctx.navigate(Page::Profile)>
                            {match user.photo_url.clone().filter(|u| !u.is_empty()) {
                                Some(url) => view! { <img class="avatar" src=url alt="User" /> }.into_any(),
                                None => view! { <span>{user.display_label()}</span> }.into_any(),
                            }}
                        </button>
                    }.into_any(),
                    None => view! {
                        <button class="nav-btn" on:click=move |_| ctx.open_login()>"Sign In"</button>
                    }.into_any(),
                }}
            </nav>
        </header>
    }
}
