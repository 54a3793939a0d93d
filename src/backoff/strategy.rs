//! Backoff strategies and the pure delay evaluator.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::backoff::error::StrategyError;

/// The inputs a strategy sees for one attempt.
///
/// `count` is the 1-based attempt index at the time the action runs.
/// Custom strategies receive the raw configured `delay` and `jitter`;
/// jitter is still added centrally afterwards, so a custom strategy
/// should normally ignore the `jitter` field unless it wants to shape
/// its curve around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyInput {
    /// The configured base delay unit.
    pub delay: Duration,
    /// 1-based attempt index.
    pub count: u32,
    /// The configured jitter bound.
    pub jitter: Duration,
}

/// Signature of a custom strategy.
pub type StrategyFn = Arc<dyn Fn(StrategyInput) -> Duration + Send + Sync>;

/// How the wait duration grows with the attempt count.
///
/// Strategies are a closed set of variants dispatched by pattern match;
/// there is no runtime tag inspection and no catch-all case.
///
/// # Examples
///
/// ```rust
/// use ebb::Backoff;
/// use std::time::Duration;
///
/// let table = Backoff::table(vec![
///     Duration::from_millis(25),
///     Duration::from_millis(100),
///     Duration::from_millis(250),
/// ]);
///
/// // Past the end, the table clamps to its last entry.
/// assert_eq!(table.delay_for(5), Ok(Duration::from_millis(250)));
///
/// let custom = Backoff::custom(|input| input.delay * input.count * 3);
/// # let _ = custom;
/// ```
#[derive(Clone, Default)]
pub enum Strategy {
    /// Every wait is the configured base delay.
    #[default]
    Constant,
    /// `delay * count`.
    Linear,
    /// `(delay * count)^2`, in whole milliseconds.
    Exponential,
    /// Per-attempt durations, clamping to the last entry once the
    /// attempt count runs past the end. Must not be empty.
    Table(Vec<Duration>),
    /// Caller-supplied function of [`StrategyInput`], used as-is.
    Custom(StrategyFn),
}

impl Strategy {
    /// Wrap a closure as a [`Strategy::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(StrategyInput) -> Duration + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Evaluate the base delay for one attempt, before jitter.
    pub(crate) fn base_delay(&self, input: StrategyInput) -> Result<Duration, StrategyError> {
        match self {
            Self::Constant => Ok(input.delay),
            Self::Linear => Ok(input.delay.saturating_mul(input.count)),
            Self::Exponential => {
                // The squared curve is defined over whole milliseconds.
                let ms = saturating_millis(input.delay).saturating_mul(u64::from(input.count));
                Ok(Duration::from_millis(ms.saturating_mul(ms)))
            }
            Self::Table(delays) => {
                index_or_last(delays, input.count.saturating_sub(1) as usize)
                    .copied()
                    .ok_or(StrategyError::EmptyTable)
            }
            Self::Custom(f) => Ok(f(input)),
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => f.write_str("Constant"),
            Self::Linear => f.write_str("Linear"),
            Self::Exponential => f.write_str("Exponential"),
            Self::Table(delays) => f.debug_tuple("Table").field(delays).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Index into a slice, clamping to the last element when out of bounds.
///
/// Returns `None` only for an empty slice.
///
/// # Examples
///
/// ```rust
/// use ebb::index_or_last;
///
/// let delays = [25, 100, 250];
/// assert_eq!(index_or_last(&delays, 1), Some(&100));
/// assert_eq!(index_or_last(&delays, 5), Some(&250));
/// assert_eq!(index_or_last::<i32>(&[], 0), None);
/// ```
pub fn index_or_last<T>(slice: &[T], index: usize) -> Option<&T> {
    slice.get(index).or_else(|| slice.last())
}

fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod strategy_tests {
    use super::*;

    fn input(delay_ms: u64, count: u32) -> StrategyInput {
        StrategyInput {
            delay: Duration::from_millis(delay_ms),
            count,
            jitter: Duration::ZERO,
        }
    }

    #[test]
    fn test_constant_ignores_count() {
        for count in [1, 2, 10] {
            assert_eq!(
                Strategy::Constant.base_delay(input(100, count)),
                Ok(Duration::from_millis(100))
            );
        }
    }

    #[test]
    fn test_linear_scales_with_count() {
        assert_eq!(
            Strategy::Linear.base_delay(input(50, 1)),
            Ok(Duration::from_millis(50))
        );
        assert_eq!(
            Strategy::Linear.base_delay(input(50, 4)),
            Ok(Duration::from_millis(200))
        );
    }

    #[test]
    fn test_exponential_squares_the_linear_delay() {
        // (5 * 1)^2, (5 * 2)^2, (5 * 3)^2
        assert_eq!(
            Strategy::Exponential.base_delay(input(5, 1)),
            Ok(Duration::from_millis(25))
        );
        assert_eq!(
            Strategy::Exponential.base_delay(input(5, 2)),
            Ok(Duration::from_millis(100))
        );
        assert_eq!(
            Strategy::Exponential.base_delay(input(5, 3)),
            Ok(Duration::from_millis(225))
        );
    }

    #[test]
    fn test_table_indexes_then_clamps() {
        let strategy = Strategy::Table(vec![
            Duration::from_millis(25),
            Duration::from_millis(100),
            Duration::from_millis(250),
        ]);

        assert_eq!(
            strategy.base_delay(input(0, 1)),
            Ok(Duration::from_millis(25))
        );
        assert_eq!(
            strategy.base_delay(input(0, 3)),
            Ok(Duration::from_millis(250))
        );
        assert_eq!(
            strategy.base_delay(input(0, 9)),
            Ok(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let strategy = Strategy::Table(vec![]);
        assert_eq!(strategy.base_delay(input(0, 1)), Err(StrategyError::EmptyTable));
    }

    #[test]
    fn test_custom_receives_raw_inputs() {
        let strategy = Strategy::custom(|input| {
            assert_eq!(input.delay, Duration::from_millis(2));
            Duration::from_millis(2u64.pow(input.count))
        });

        assert_eq!(
            strategy.base_delay(input(2, 3)),
            Ok(Duration::from_millis(8))
        );
    }

    #[test]
    fn test_index_or_last_within_bounds() {
        let values = [10, 20, 30];
        assert_eq!(index_or_last(&values, 0), Some(&10));
        assert_eq!(index_or_last(&values, 2), Some(&30));
    }

    #[test]
    fn test_index_or_last_clamps_past_the_end() {
        let values = [10, 20, 30];
        assert_eq!(index_or_last(&values, 3), Some(&30));
        assert_eq!(index_or_last(&values, 500), Some(&30));
    }

    #[test]
    fn test_index_or_last_empty_slice() {
        assert_eq!(index_or_last::<u64>(&[], 0), None);
        assert_eq!(index_or_last::<u64>(&[], 7), None);
    }

    #[test]
    fn test_strategy_is_debug() {
        let debug = format!("{:?}", Strategy::custom(|i| i.delay));
        assert!(debug.contains("Custom"));
        assert!(format!("{:?}", Strategy::Linear).contains("Linear"));
    }
}
