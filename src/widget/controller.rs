//! Chat widget controller: owns the live state, the render subscriptions,
//! and the replies still waiting on their timer.
//!
//! DESIGN
//! ======
//! State lives behind `Rc<Shared>` so a scheduled reply can outlive the call
//! that created it. Every change is published to listeners as an immutable
//! snapshot; listeners may call back into the widget without tripping a
//! `RefCell` borrow.
//!
//! TRADE-OFFS
//! ==========
//! Under [`TeardownPolicy::Detach`] a reply scheduled before unmount still
//! appends to the shared state afterwards. Nothing is rendered at that point
//! because unmount also drops the listeners.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::{ChatWidgetConfig, TeardownPolicy};
use crate::state::chat::ChatWidgetState;
use crate::widget::scheduler::{Scheduler, TaskHandle};

/// Identifies a render listener registered with [`ChatWidget::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&ChatWidgetState)>;

#[derive(Default)]
struct Shared {
    state: RefCell<ChatWidgetState>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
    // `None` marks a reply whose handle has not been stored yet.
    pending: RefCell<BTreeMap<u64, Option<Box<dyn TaskHandle>>>>,
    next_reply: Cell<u64>,
}

impl Shared {
    fn notify(&self) {
        let snapshot = self.state.borrow().clone();
        let listeners: Vec<Listener> = self.listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn deliver_reply(&self, reply_id: u64, text: &str) {
        self.state.borrow_mut().push_reply(text);
        log::debug!("chat widget: reply {reply_id} delivered");
        // Released, not dropped: a browser timer must not be freed from
        // inside its own callback.
        if let Some(Some(handle)) = self.pending.borrow_mut().remove(&reply_id) {
            handle.detach();
        }
        self.notify();
    }
}

/// A toggleable chat panel with a canned, delayed auto-reply.
pub struct ChatWidget<S: Scheduler> {
    shared: Rc<Shared>,
    config: ChatWidgetConfig,
    scheduler: S,
    mounted: bool,
}

impl<S: Scheduler> ChatWidget<S> {
    pub fn new(config: ChatWidgetConfig, scheduler: S) -> Self {
        let shared = Shared {
            state: RefCell::new(ChatWidgetState::with_greeting(config.greeting.clone())),
            ..Shared::default()
        };
        Self {
            shared: Rc::new(shared),
            config,
            scheduler,
            mounted: true,
        }
    }

    pub fn config(&self) -> &ChatWidgetConfig {
        &self.config
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ChatWidgetState {
        self.shared.state.borrow().clone()
    }

    /// Number of auto-replies scheduled but not yet delivered.
    pub fn pending_replies(&self) -> usize {
        self.shared.pending.borrow().len()
    }

    /// Register a listener called with the new state after every change.
    pub fn subscribe(&self, listener: impl Fn(&ChatWidgetState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.shared.next_subscription.get());
        self.shared.next_subscription.set(id.0 + 1);
        self.shared.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.shared.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn toggle_visibility(&self) {
        let visible = self.shared.state.borrow_mut().toggle_visibility();
        log::trace!("chat widget: visible = {visible}");
        self.shared.notify();
    }

    /// Replace the input field content.
    pub fn set_input(&self, text: impl Into<String>) {
        self.shared.state.borrow_mut().set_pending_input(text);
        self.shared.notify();
    }

    /// Submit the pending input.
    ///
    /// Blank input is ignored: no state change, no notification, nothing
    /// scheduled. Otherwise the user entry is appended immediately and one
    /// auto-reply is scheduled after the configured delay. Returns whether
    /// the input was accepted.
    pub fn submit_message(&self) -> bool {
        let Some(text) = self.shared.state.borrow_mut().take_submission() else {
            log::trace!("chat widget: blank submission ignored");
            return false;
        };
        log::debug!("chat widget: accepted message ({} bytes)", text.len());
        self.shared.notify();
        self.schedule_reply();
        true
    }

    fn schedule_reply(&self) {
        let reply_id = self.shared.next_reply.get();
        self.shared.next_reply.set(reply_id + 1);
        self.shared.pending.borrow_mut().insert(reply_id, None);

        let shared = Rc::clone(&self.shared);
        let text = self.config.auto_reply.clone();
        let handle = self.scheduler.schedule(
            self.config.reply_delay(),
            Box::new(move || shared.deliver_reply(reply_id, &text)),
        );

        match self.shared.pending.borrow_mut().get_mut(&reply_id) {
            Some(slot) => *slot = Some(handle),
            // Already delivered by a scheduler that ran it inline.
            None => handle.detach(),
        }
        log::debug!("chat widget: reply {reply_id} scheduled in {}ms", self.config.reply_delay_ms);
    }

    /// Tear the widget down: drop listeners and apply the teardown policy to
    /// outstanding replies. Idempotent; also runs on drop.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.shared.listeners.borrow_mut().clear();

        let pending = std::mem::take(&mut *self.shared.pending.borrow_mut());
        if pending.is_empty() {
            return;
        }
        match self.config.teardown {
            TeardownPolicy::Detach => {
                log::debug!("chat widget: unmounted with {} replies detached", pending.len());
                for handle in pending.into_values().flatten() {
                    handle.detach();
                }
            }
            TeardownPolicy::Cancel => {
                log::debug!("chat widget: unmounted, cancelling {} replies", pending.len());
                for handle in pending.into_values().flatten() {
                    handle.cancel();
                }
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl<S: Scheduler> Drop for ChatWidget<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
