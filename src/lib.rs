//! # chat-widget
//!
//! Leptos + WASM toggleable chat panel. Holds a local transcript, appends
//! what the user types, and answers each message with a canned reply after a
//! fixed delay. There is no backend: state lives for as long as the widget
//! is mounted.
//!
//! The controller in [`widget::controller`] is framework-free and tested on a
//! virtual clock; [`components::chat_widget`] binds it to the DOM.

pub mod components;
pub mod config;
pub mod state;
pub mod widget;

/// Browser entry point: install logging and mount the widget on `<body>`.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use components::chat_widget::ChatWidget;
    use leptos::prelude::*;

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(|| view! { <ChatWidget/> });
}
