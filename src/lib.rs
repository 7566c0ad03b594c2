//! # acme-front
//!
//! Leptos + WASM front-end for the ACME TRANS freight platform.
//!
//! The session layer (`state::session`, `util::token_store`,
//! `net::client`, `util::auth`) is plain Rust and runs natively under
//! `cargo test`. The `csr` feature adds the browser storage, fetch
//! transport, and the WASM entry point that mounts [`app::App`].

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

/// WASM entry point: install the console logger and panic hook, then mount.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already installed: {e}").into());
    }
    leptos::mount::mount_to_body(app::App);
}
