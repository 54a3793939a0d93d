//! Error types for backoff steps.

/// Error from evaluating a backoff strategy.
///
/// These are configuration mistakes, not transient conditions: they are
/// fatal, never retried, and surface lazily the first time an invoked
/// action evaluates the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyError {
    /// A [`Strategy::Table`](crate::Strategy::Table) with no entries.
    EmptyTable,
}

impl std::fmt::Display for StrategyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTable => write!(f, "backoff table strategy has no entries"),
        }
    }
}

impl std::error::Error for StrategyError {}

/// Error returned by a step's action.
///
/// Keeps the two failure channels of a backoff loop apart: exhaustion
/// (the expected outer "give up" signal, carrying the caller's own
/// failure value untouched) and configuration errors (programmer
/// mistakes, fatal). Callers distinguish them by variant, never by
/// message text.
///
/// # Examples
///
/// ```rust
/// use ebb::{Backoff, BackoffError};
///
/// # tokio_test::block_on(async {
/// // max = 0: the only step is terminal.
/// let mut step = Backoff::new().start().next().unwrap();
///
/// match step.act("boom").await {
///     Err(BackoffError::Exhausted(failure)) => assert_eq!(failure, "boom"),
///     other => panic!("expected exhaustion, got {:?}", other),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffError<E> {
    /// All retries are spent; carries the failure passed to the terminal
    /// step's action, by value and unmodified.
    Exhausted(E),
    /// The configured strategy could not be evaluated.
    Strategy(StrategyError),
    /// An in-flight wait was aborted by the cancel future handed to
    /// [`Step::act_until`](crate::Step::act_until).
    Cancelled,
}

impl<E> BackoffError<E> {
    /// Returns true if this is the exhaustion signal.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    /// Returns true if this is a configuration error.
    pub fn is_strategy(&self) -> bool {
        matches!(self, Self::Strategy(_))
    }

    /// Returns true if a wait was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Get the propagated failure if present.
    pub fn failure(&self) -> Option<&E> {
        match self {
            Self::Exhausted(e) => Some(e),
            _ => None,
        }
    }

    /// Extract the propagated failure, discarding the wrapper.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Exhausted(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for BackoffError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted(e) => write!(f, "retries exhausted: {}", e),
            Self::Strategy(e) => write!(f, "{}", e),
            Self::Cancelled => write!(f, "backoff wait cancelled"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for BackoffError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Exhausted(e) => Some(e),
            Self::Strategy(e) => Some(e),
            Self::Cancelled => None,
        }
    }
}
