//! Deferred-execution facility supplied by the host.
//!
//! DESIGN
//! ======
//! The widget only needs "run this once, later". Browsers get
//! [`TimeoutScheduler`] (a `setTimeout` wrapper); tests and hosts that drive
//! time themselves use [`ManualScheduler`], a virtual clock that runs due
//! tasks in deadline order when advanced.
//!
//! Everything here is single-threaded. Tasks are `FnOnce() + 'static` but not
//! `Send`, matching the browser event loop.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

/// Handle to a task that has been scheduled but may not have run yet.
pub trait TaskHandle {
    /// Prevent the task from running. No effect if it already ran.
    fn cancel(self: Box<Self>);

    /// Give up the handle; the task still runs when due.
    fn detach(self: Box<Self>);
}

pub trait Scheduler {
    /// Run `task` once after at least `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn TaskHandle>;
}

/// Scheduler used by the mounted component.
#[cfg(feature = "hydrate")]
pub type HostScheduler = TimeoutScheduler;

/// Scheduler used by the mounted component. Server renders never submit,
/// so nothing ever advances it.
#[cfg(not(feature = "hydrate"))]
pub type HostScheduler = ManualScheduler;

// =============================================================================
// MANUAL SCHEDULER
// =============================================================================

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_seq: u64,
    tasks: BTreeMap<(Duration, u64), Task>,
}

/// Virtual-clock scheduler. Clones share the same queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    /// Move the clock forward by `by`, running every task that comes due in
    /// deadline order (ties in scheduling order). Returns how many ran.
    ///
    /// Tasks scheduled while advancing run in the same call if their deadline
    /// falls inside the window.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.queue.borrow().now.saturating_add(by);
        let mut ran = 0;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                match queue.tasks.first_key_value() {
                    Some((&(due, _), _)) if due <= target => {
                        queue.now = due;
                        queue.tasks.pop_first()
                    }
                    _ => None,
                }
            };
            let Some((_, task)) = next else {
                break;
            };
            task();
            ran += 1;
        }
        self.queue.borrow_mut().now = target;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn TaskHandle> {
        let mut queue = self.queue.borrow_mut();
        let key = (queue.now.saturating_add(delay), queue.next_seq);
        queue.next_seq += 1;
        queue.tasks.insert(key, task);
        Box::new(ManualHandle {
            queue: Rc::downgrade(&self.queue),
            key,
        })
    }
}

struct ManualHandle {
    queue: Weak<RefCell<ManualQueue>>,
    key: (Duration, u64),
}

impl TaskHandle for ManualHandle {
    fn cancel(self: Box<Self>) {
        if let Some(queue) = self.queue.upgrade() {
            queue.borrow_mut().tasks.remove(&self.key);
        }
    }

    fn detach(self: Box<Self>) {}
}

// =============================================================================
// BROWSER SCHEDULER
// =============================================================================

/// `setTimeout`-backed scheduler for the browser.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutScheduler;

#[cfg(feature = "hydrate")]
const MAX_TIMEOUT_MS: u128 = 2_147_483_647;

#[cfg(feature = "hydrate")]
impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn TaskHandle> {
        // `setTimeout` takes an i32; anything larger wraps or fires at once.
        let millis = u32::try_from(delay.as_millis().min(MAX_TIMEOUT_MS)).unwrap_or(u32::MAX);
        Box::new(TimeoutHandle(gloo_timers::callback::Timeout::new(millis, task)))
    }
}

#[cfg(feature = "hydrate")]
struct TimeoutHandle(gloo_timers::callback::Timeout);

#[cfg(feature = "hydrate")]
impl TaskHandle for TimeoutHandle {
    fn cancel(self: Box<Self>) {
        let _ = self.0.cancel();
    }

    // Forgetting keeps the JS closure alive, so this is also how a handle is
    // released from inside its own callback.
    fn detach(self: Box<Self>) {
        self.0.forget();
    }
}
