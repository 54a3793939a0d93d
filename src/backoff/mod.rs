//! Backoff sequencing: lazily produced wait-or-raise attempt steps.
//!
//! This module is the whole of the crate, following a "pure core,
//! imperative shell" split:
//!
//! - **Pure core**: [`Backoff`] and [`Strategy`] are just data. Delay
//!   computation ([`Backoff::delay_for`]) is a pure function of the
//!   1-based attempt index.
//! - **Imperative shell**: [`BackoffSequence`] is an explicit counter
//!   state machine yielding [`Step`] values; only a step's action
//!   suspends, via `tokio::time::sleep`.
//!
//! # Quick Start
//!
//! ```rust
//! use ebb::Backoff;
//! use std::time::Duration;
//!
//! let backoff = Backoff::exponential(Duration::from_millis(5)).with_max(3);
//!
//! // (5ms * count)^2 for counts 1, 2, 3
//! assert_eq!(backoff.delay_for(1), Ok(Duration::from_millis(25)));
//! assert_eq!(backoff.delay_for(2), Ok(Duration::from_millis(100)));
//! assert_eq!(backoff.delay_for(3), Ok(Duration::from_millis(225)));
//! ```
//!
//! # Sequencing Semantics
//!
//! [`Backoff::start`] yields exactly `max + 1` steps. Every step but the
//! last waits and completes; the last propagates whatever failure the
//! caller hands it, untouched. Producing steps never fails - only
//! invoking an action can, and configuration problems (an empty
//! [`Strategy::Table`]) surface there too, lazily.
//!
//! # Jitter
//!
//! When `jitter > 0`, a random duration in `[0, jitter]` is added after
//! every strategy branch, including [`Strategy::Custom`]. The random
//! source is seedable per sequence ([`Backoff::start_seeded`]) so tests
//! stay deterministic.
//!
//! # Error Types
//!
//! - [`BackoffError::Exhausted`]: the designed-for "we give up" signal,
//!   carrying the caller's failure by value.
//! - [`BackoffError::Strategy`]: a configuration error, fatal and never
//!   retried.
//! - [`BackoffError::Cancelled`]: an in-flight wait aborted via
//!   [`Step::act_until`].

mod config;
mod error;
mod step;
mod strategy;

pub use config::Backoff;
pub use error::{BackoffError, StrategyError};
pub use step::{BackoffSequence, Step};
pub use strategy::{index_or_last, Strategy, StrategyFn, StrategyInput};
