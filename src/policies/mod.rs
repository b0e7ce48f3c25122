//! Worker policies.
//!
//! Knobs that describe **how** a worker loop is scheduled, without changing
//! what it does.
//!
//! ## Contents
//! - [`Priority`] advisory execution priority (default `BelowNormal`)

mod priority;

pub use priority::Priority;
