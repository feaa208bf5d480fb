//! Widget controller and the host seams it depends on.
//!
//! SYSTEM CONTEXT
//! ==============
//! `controller` holds the behaviour; `scheduler` isolates the host's timer
//! facility so the controller can be tested on a virtual clock.

pub mod controller;
pub mod scheduler;
