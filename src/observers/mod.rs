//! # Lifecycle observers.
//!
//! This module provides the [`Observe`] trait, the closure adapter
//! [`ObserverFn`], and [`ObserverSet`], the ordered list each worker notifies.
//!
//! ## Architecture
//! ```text
//! Worker::subscribe(obs) ──► ObserverSet (registration order)
//!
//! worker loop
//!   ├─► Started ──► ObserverSet::emit ──► obs1, obs2, ... (synchronous)
//!   │   ... action / wait cycles ...
//!   └─► Stopped ──► ObserverSet::emit ──► obs1, obs2, ... (synchronous)
//! ```

mod observer;
mod observer_set;

#[cfg(feature = "logging")]
mod embedded;

pub use observer::{ObserverFn, Observe};
pub use observer_set::ObserverSet;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
