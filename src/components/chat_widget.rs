//! Toggleable chat panel with a canned auto-reply.

use leptos::prelude::*;

use crate::config::ChatWidgetConfig;
use crate::state::chat::ChatWidgetState;
use crate::widget::controller::ChatWidget as Controller;
use crate::widget::scheduler::HostScheduler;

/// Chat toggle button plus a panel with the transcript, an input, and a send
/// button.
///
/// The controller owns the state; every change it publishes is mirrored into
/// a signal that drives the view.
#[component]
pub fn ChatWidget(#[prop(optional)] config: Option<ChatWidgetConfig>) -> impl IntoView {
    let config = config.unwrap_or_default();
    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("chat widget: {e}; using defaults");
            ChatWidgetConfig::default()
        }
    };

    let controller = Controller::new(config, HostScheduler::default());
    let state = RwSignal::new(controller.snapshot());
    controller.subscribe(move |next: &ChatWidgetState| {
        // The signal is gone once the owner is disposed.
        let _ = state.try_set(next.clone());
    });
    let widget = StoredValue::new_local(controller);

    on_cleanup(move || {
        let _ = widget.try_update_value(Controller::unmount);
    });

    let messages_ref = NodeRef::<leptos::html::Div>::new();

    Effect::new(move || {
        let _ = state.get().transcript().len();

        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = messages_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    let visible = move || state.get().visible;
    let can_send = move || state.get().can_send();

    let on_toggle = move |_| widget.with_value(Controller::toggle_visibility);

    let on_click = move |_| {
        widget.with_value(Controller::submit_message);
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            widget.with_value(Controller::submit_message);
        }
    };

    view! {
        <div class="chat-widget">
            <button
                class="btn chat-widget__toggle"
                class:chat-widget__toggle--open=visible
                on:click=on_toggle
                title=move || if visible() { "Close chat" } else { "Open chat" }
            >
                "Chat"
            </button>

            <Show when=visible>
                <div class="chat-widget__panel">
                    <div class="chat-widget__messages" node_ref=messages_ref>
                        {move || {
                            state
                                .get()
                                .transcript()
                                .iter()
                                .map(|entry| {
                                    let class = if entry.is_bot {
                                        "chat-widget__message chat-widget__message--bot"
                                    } else {
                                        "chat-widget__message chat-widget__message--user"
                                    };
                                    let text = entry.text.clone();
                                    view! { <div class=class>{text}</div> }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </div>

                    <div class="chat-widget__input-row">
                        <input
                            class="chat-widget__input"
                            type="text"
                            placeholder="Type a message..."
                            prop:value=move || state.get().pending_input
                            on:input=move |ev| {
                                let text = event_target_value(&ev);
                                widget.with_value(|w| w.set_input(text));
                            }
                            on:keydown=on_keydown
                        />
                        <button
                            class="btn btn--primary chat-widget__send"
                            on:click=on_click
                            disabled=move || !can_send()
                        >
                            "Send"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
