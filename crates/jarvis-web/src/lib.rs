//! JARVIS Web Frontend
//!
//! Leptos-based WASM frontend: landing page at `/`, chat screen at `/chat`.

mod app;
mod components;
mod pages;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
