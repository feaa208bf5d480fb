//! Leptos view components.

pub mod chat_widget;
