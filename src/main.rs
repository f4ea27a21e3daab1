//! Pantry Chef Frontend Entry Point

mod account;
mod api;
mod app;
mod authoring;
mod components;
mod config;
mod context;
mod documents;
mod error;
mod filters;
mod home;
mod identity;
mod logging;
mod models;
mod pages;
mod pantry;
mod session;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
