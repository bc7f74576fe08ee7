use wasm_bindgen::prelude::*;

#[macro_use]
mod macros;

pub mod components;
pub mod constants;
pub mod dom_utils;
pub mod error;
pub mod models;
pub mod network;
pub mod pages;
pub mod reducers;
pub mod toast;
pub mod utils;

use network::{init_api_config, ApiConfig};

// Main entry point for the WASM module.  Every page loads the same bundle;
// each page controller checks for its own anchor element.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    let Some(document) = dom_utils::document() else {
        return Err(JsValue::from_str("no document on window"));
    };

    init_api_config(ApiConfig::from_document(&document));

    pages::create_ticket::mount(&document)?;
    pages::ticket_page::mount(&document)?;
    pages::setup::SetupPage::mount(&document)?;
    pages::login::mount(&document)?;

    debug_log!("fixltpro frontend mounted");
    Ok(())
}
