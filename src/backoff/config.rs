//! Backoff configuration.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::backoff::error::StrategyError;
use crate::backoff::step::BackoffSequence;
use crate::backoff::strategy::{Strategy, StrategyInput};

/// A backoff configuration describing how a retry loop should wait.
///
/// Configurations are pure data - they describe waiting behavior but
/// don't execute it. [`Backoff::start`] turns one into a live sequence
/// of steps.
///
/// Attempt math: `max` is the number of retries allowed *after* the
/// first attempt, so a started sequence yields `max + 1` steps and only
/// the last one gives up. `max = 0` means "no retries": the single step
/// propagates the failure immediately.
///
/// Negative `max`, `delay`, or `jitter` are unrepresentable: the fields
/// are `u32` and [`Duration`].
///
/// # Examples
///
/// ```rust
/// use ebb::Backoff;
/// use std::time::Duration;
///
/// // Linear growth: 100ms, 200ms, 300ms, then give up.
/// let backoff = Backoff::linear(Duration::from_millis(100)).with_max(3);
///
/// assert_eq!(backoff.max(), 3);
/// assert_eq!(backoff.delay_for(1), Ok(Duration::from_millis(100)));
/// assert_eq!(backoff.delay_for(3), Ok(Duration::from_millis(300)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Backoff {
    max: u32,
    delay: Duration,
    jitter: Duration,
    strategy: Strategy,
}

impl Backoff {
    /// Create a configuration with all defaults: zero retries, zero
    /// delay, zero jitter, constant strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with a fixed wait per attempt.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebb::Backoff;
    /// use std::time::Duration;
    ///
    /// let backoff = Backoff::constant(Duration::from_millis(500)).with_max(3);
    ///
    /// // Every non-terminal step waits 500ms
    /// assert_eq!(backoff.delay_for(1), Ok(Duration::from_millis(500)));
    /// assert_eq!(backoff.delay_for(3), Ok(Duration::from_millis(500)));
    /// ```
    pub fn constant(delay: Duration) -> Self {
        Self {
            delay,
            strategy: Strategy::Constant,
            ..Self::default()
        }
    }

    /// Create a configuration with linearly increasing waits.
    ///
    /// Wait = `delay * count` for the 1-based attempt count.
    pub fn linear(delay: Duration) -> Self {
        Self {
            delay,
            strategy: Strategy::Linear,
            ..Self::default()
        }
    }

    /// Create a configuration with quadratically increasing waits.
    ///
    /// Wait = `(delay * count)^2` in whole milliseconds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebb::Backoff;
    /// use std::time::Duration;
    ///
    /// let backoff = Backoff::exponential(Duration::from_millis(10)).with_max(3);
    ///
    /// assert_eq!(backoff.delay_for(1), Ok(Duration::from_millis(100)));
    /// assert_eq!(backoff.delay_for(2), Ok(Duration::from_millis(400)));
    /// ```
    pub fn exponential(delay: Duration) -> Self {
        Self {
            delay,
            strategy: Strategy::Exponential,
            ..Self::default()
        }
    }

    /// Create a configuration with an explicit per-attempt wait table.
    ///
    /// Attempts past the end of the table reuse its last entry. The
    /// table must not be empty; an empty table surfaces as
    /// [`StrategyError::EmptyTable`] from the first invoked action.
    pub fn table(delays: Vec<Duration>) -> Self {
        Self {
            strategy: Strategy::Table(delays),
            ..Self::default()
        }
    }

    /// Create a configuration with a caller-supplied strategy function.
    ///
    /// The function receives the raw [`StrategyInput`] and its result is
    /// used as-is; jitter, if configured, is still added afterwards.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(StrategyInput) -> Duration + Send + Sync + 'static,
    {
        Self {
            strategy: Strategy::custom(f),
            ..Self::default()
        }
    }

    /// Set the number of retries allowed after the first attempt.
    pub fn with_max(mut self, max: u32) -> Self {
        self.max = max;
        self
    }

    /// Set the base delay unit fed to the strategy.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the jitter bound.
    ///
    /// Each wait gains a random extra duration in `[0, jitter]`, sampled
    /// per action invocation, after the strategy result - uniformly
    /// across all strategies including custom ones.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Replace the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Get the configured retry count.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Get the base delay unit.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Get the jitter bound.
    pub fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Get the strategy.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Evaluate the wait for a 1-based attempt count, without jitter.
    ///
    /// This is the pure strategy evaluator; it ignores `max`, so it can
    /// probe any attempt index.
    pub fn delay_for(&self, count: u32) -> Result<Duration, StrategyError> {
        self.strategy.base_delay(StrategyInput {
            delay: self.delay,
            count,
            jitter: self.jitter,
        })
    }

    /// Start a fresh sequence of `max + 1` steps.
    ///
    /// Each call starts over with the attempt counter at 1; sequences
    /// are single-owner and cannot be restarted in place. Jitter
    /// randomness is OS-seeded; tests wanting determinism should use
    /// [`Backoff::start_seeded`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebb::Backoff;
    ///
    /// let backoff = Backoff::new().with_max(2);
    ///
    /// let lefts: Vec<u32> = backoff.start().map(|step| step.left()).collect();
    /// assert_eq!(lefts, vec![2, 1, 0]);
    /// ```
    pub fn start(&self) -> BackoffSequence {
        BackoffSequence::new(self.clone(), SmallRng::from_os_rng())
    }

    /// Start a fresh sequence with deterministic jitter.
    ///
    /// Two sequences started from the same configuration and seed sample
    /// identical jitter.
    pub fn start_seeded(&self, seed: u64) -> BackoffSequence {
        BackoffSequence::new(self.clone(), SmallRng::seed_from_u64(seed))
    }
}
