//! Client-side widget state.
//!
//! DESIGN
//! ======
//! State is a plain owned struct with explicit mutators so it can be tested
//! without a reactive runtime. The controller in `widget` owns the live copy
//! and mirrors it into a signal for rendering.

pub mod chat;
