//! The backoff sequence state machine and its steps.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::backoff::config::Backoff;
use crate::backoff::error::{BackoffError, StrategyError};
use crate::backoff::strategy::StrategyInput;

/// A lazily-advanced, finite sequence of backoff steps.
///
/// Created by [`Backoff::start`]. Yields exactly `max + 1` [`Step`]
/// values, then `None` forever. The attempt counter is private to the
/// sequence; independent sequences share nothing.
///
/// Producing steps never fails and never suspends - only a step's
/// action does.
pub struct BackoffSequence {
    config: Arc<Backoff>,
    /// 1-based attempt index of the next step.
    count: u32,
    done: bool,
    rng: SmallRng,
}

impl BackoffSequence {
    pub(crate) fn new(config: Backoff, rng: SmallRng) -> Self {
        Self {
            config: Arc::new(config),
            count: 1,
            done: false,
            rng,
        }
    }
}

impl Iterator for BackoffSequence {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.done {
            return None;
        }

        let count = self.count;
        if count > self.config.max() {
            // Terminal step: nothing follows it.
            self.done = true;
        } else {
            self.count = self.count.saturating_add(1);
        }

        // Each step gets its own stream of jitter randomness, split off
        // the sequence source so seeded sequences stay reproducible even
        // when steps are acted on out of order.
        let seed: u64 = self.rng.random();
        Some(Step {
            config: Arc::clone(&self.config),
            count,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = (u64::from(self.config.max()) + 2 - u64::from(self.count)) as usize;
        (remaining, Some(remaining))
    }
}

impl std::iter::FusedIterator for BackoffSequence {}

impl fmt::Debug for BackoffSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackoffSequence")
            .field("config", &self.config)
            .field("count", &self.count)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

/// One attempt of a backoff sequence: remaining-retries metadata plus an
/// invocable wait-or-raise action.
///
/// A step is normally consumed once. Invoking its action again is
/// permitted - the delay is recomputed and jitter resampled each time,
/// with no memory of earlier invocations.
///
/// # Examples
///
/// ```rust
/// use ebb::Backoff;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let backoff = Backoff::constant(Duration::from_millis(1)).with_max(2);
/// let mut sequence = backoff.start();
///
/// let mut first = sequence.next().unwrap();
/// assert_eq!(first.left(), 2);
/// assert!(!first.is_terminal());
///
/// // Non-terminal: waits, then completes - the failure is not inspected.
/// assert_eq!(first.act("try again").await, Ok(()));
/// # });
/// ```
pub struct Step {
    config: Arc<Backoff>,
    count: u32,
    rng: SmallRng,
}

impl Step {
    /// The 1-based attempt index this step was produced for.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Retries remaining after this step: `max - (count - 1)`.
    ///
    /// Counts down to 0 on the terminal step.
    pub fn left(&self) -> u32 {
        self.config.max() - (self.count - 1).min(self.config.max())
    }

    /// True for the final, `max + 1`-th step, whose action always
    /// propagates its failure instead of waiting.
    pub fn is_terminal(&self) -> bool {
        self.count > self.config.max()
    }

    /// Compute this step's wait: the strategy result plus a fresh jitter
    /// sample.
    ///
    /// Exposed for callers that drive their own timer; [`Step::act`]
    /// calls this internally. Terminal steps never reach delay
    /// computation through `act`, but probing one here still evaluates
    /// the strategy.
    pub fn compute_delay(&mut self) -> Result<Duration, StrategyError> {
        let base = self.config.strategy().base_delay(StrategyInput {
            delay: self.config.delay(),
            count: self.count,
            jitter: self.config.jitter(),
        })?;
        Ok(base.saturating_add(self.sample_jitter()))
    }

    /// The wait-or-raise action.
    ///
    /// - Terminal step: returns [`BackoffError::Exhausted`] carrying
    ///   `failure` by value, immediately and without suspending.
    /// - Otherwise: computes the wait (strategy result plus jitter),
    ///   suspends for it, and completes with `Ok(())` so the caller can
    ///   retry. The failure value is never inspected on this path.
    ///
    /// An empty table strategy surfaces here as
    /// [`BackoffError::Strategy`] - a fatal configuration error,
    /// distinct from exhaustion.
    pub async fn act<E>(&mut self, failure: E) -> Result<(), BackoffError<E>> {
        if self.is_terminal() {
            return Err(BackoffError::Exhausted(failure));
        }

        let wait = self.compute_delay().map_err(BackoffError::Strategy)?;
        self.trace_wait(wait);
        tokio::time::sleep(wait).await;
        Ok(())
    }

    /// Like [`Step::act`], but the wait can be aborted early.
    ///
    /// Races the suspension against `cancel`; if `cancel` wins, returns
    /// [`BackoffError::Cancelled`] - distinguishable from both a
    /// completed wait and exhaustion. Terminal steps still propagate the
    /// failure without waiting, so cancellation never masks exhaustion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebb::{Backoff, BackoffError};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let backoff = Backoff::constant(Duration::from_secs(3600)).with_max(1);
    /// let mut step = backoff.start().next().unwrap();
    ///
    /// let result: Result<(), BackoffError<&str>> =
    ///     step.act_until("failure", async {}).await;
    /// assert_eq!(result, Err(BackoffError::Cancelled));
    /// # });
    /// ```
    pub async fn act_until<E, C>(&mut self, failure: E, cancel: C) -> Result<(), BackoffError<E>>
    where
        C: Future<Output = ()>,
    {
        if self.is_terminal() {
            return Err(BackoffError::Exhausted(failure));
        }

        let wait = self.compute_delay().map_err(BackoffError::Strategy)?;
        self.trace_wait(wait);
        tokio::select! {
            () = tokio::time::sleep(wait) => Ok(()),
            () = cancel => Err(BackoffError::Cancelled),
        }
    }

    fn sample_jitter(&mut self) -> Duration {
        let jitter = self.config.jitter();
        if jitter.is_zero() {
            return Duration::ZERO;
        }
        let fraction: f64 = self.rng.random();
        let extra = (jitter.as_millis() as f64 * fraction).round() as u64;
        Duration::from_millis(extra)
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn trace_wait(&self, wait: Duration) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            count = self.count,
            left = self.left(),
            wait_ms = wait.as_millis() as u64,
            "backing off"
        );
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("count", &self.count)
            .field("left", &self.left())
            .field("terminal", &self.is_terminal())
            .finish_non_exhaustive()
    }
}
