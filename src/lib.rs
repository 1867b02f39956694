#![recursion_limit = "512"]

pub mod api;
pub mod catalog;
pub mod dashboard;
pub mod dto;
pub mod errors;
pub mod format;
pub mod history;
pub mod models;
pub mod recharge;
pub mod session;
pub mod status;
pub mod tasks;

pub mod components;
#[cfg(feature = "ssr")]
pub mod initialize;
pub mod pages;

pub mod app;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use leptos::prelude::*;

    use crate::api::{ApiClient, ClientConfig, Credential};
    use crate::app::*;
    use crate::components::functions::api_url_from_document;

    console_error_panic_hook::set_once();

    let mut config = ClientConfig::default();
    if let Some(api_base_url) = api_url_from_document() {
        config.api_base_url = api_base_url;
    }
    let api = match ApiClient::new(&config, Credential::default()) {
        Ok(api) => api,
        Err(e) => {
            leptos::logging::error!("Cannot reach the recharge backend: {e}");
            return;
        }
    };

    leptos::mount::hydrate_body(move || {
        provide_context(config);
        provide_context(api);
        view! { <App/> }
    });
}
