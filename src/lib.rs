//! # Ebb
//!
//! > *"The tide pulls back before it returns"*
//!
//! Lazy backoff sequencing for retry loops.
//!
//! ## Philosophy
//!
//! **Ebb** separates deciding *how long to wait* from *what is being
//! retried*:
//! - **Pure core**: [`Backoff`] and [`Strategy`] are plain data - delay
//!   computation is a pure function of the attempt index, easy to test
//!   and inspect.
//! - **Explicit steps**: a started sequence yields one [`Step`] per
//!   attempt. The caller runs its own operation and only hands the step a
//!   failure when it needs to back off. Ebb never invokes the operation
//!   itself.
//!
//! ## Quick Example
//!
//! ```rust
//! use ebb::{Backoff, BackoffError};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let backoff = Backoff::linear(Duration::from_millis(1)).with_max(2);
//!
//! let mut outcome: Result<(), &str> = Ok(());
//! for mut step in backoff.start() {
//!     // ... run the fallible operation here; on failure, back off:
//!     match step.act("still failing").await {
//!         // Wait elapsed: loop around and retry.
//!         Ok(()) => {}
//!         // Retries exhausted: the failure comes back untouched.
//!         Err(BackoffError::Exhausted(failure)) => outcome = Err(failure),
//!         Err(other) => panic!("unexpected: {other}"),
//!     }
//! }
//! assert_eq!(outcome, Err("still failing"));
//! # });
//! ```
//!
//! For deterministic jitter in tests, see [`Backoff::start_seeded`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;

// Re-exports
pub use backoff::{
    index_or_last, Backoff, BackoffError, BackoffSequence, Step, Strategy, StrategyError,
    StrategyFn, StrategyInput,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::{
        index_or_last, Backoff, BackoffError, BackoffSequence, Step, Strategy, StrategyError,
        StrategyInput,
    };
}
