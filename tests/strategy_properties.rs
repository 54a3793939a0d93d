//! Property-based tests for strategy evaluation and sequence shape.

use ebb::{index_or_last, Backoff};
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #[test]
    fn prop_sequence_yields_max_plus_one_steps(max in 0u32..300) {
        let produced = Backoff::new().with_max(max).start().count();
        prop_assert_eq!(produced, max as usize + 1);
    }

    #[test]
    fn prop_left_counts_down_from_max(max in 0u32..300) {
        let lefts: Vec<u32> = Backoff::new()
            .with_max(max)
            .start()
            .map(|step| step.left())
            .collect();

        let expected: Vec<u32> = (0..=max).rev().collect();
        prop_assert_eq!(lefts, expected);
    }

    #[test]
    fn prop_only_the_last_step_is_terminal(max in 0u32..300) {
        let steps: Vec<bool> = Backoff::new()
            .with_max(max)
            .start()
            .map(|step| step.is_terminal())
            .collect();

        prop_assert_eq!(steps.iter().filter(|&&t| t).count(), 1);
        prop_assert_eq!(steps.last(), Some(&true));
    }

    #[test]
    fn prop_constant_ignores_count(
        delay_ms in 0u64..10_000,
        count in 1u32..1_000,
    ) {
        let backoff = Backoff::constant(Duration::from_millis(delay_ms));
        prop_assert_eq!(
            backoff.delay_for(count),
            Ok(Duration::from_millis(delay_ms))
        );
    }

    #[test]
    fn prop_linear_is_delay_times_count(
        delay_ms in 0u64..10_000,
        count in 1u32..1_000,
    ) {
        let backoff = Backoff::linear(Duration::from_millis(delay_ms));
        prop_assert_eq!(
            backoff.delay_for(count),
            Ok(Duration::from_millis(delay_ms * u64::from(count)))
        );
    }

    #[test]
    fn prop_exponential_is_linear_squared(
        delay_ms in 0u64..1_000,
        count in 1u32..100,
    ) {
        let backoff = Backoff::exponential(Duration::from_millis(delay_ms));
        let linear = delay_ms * u64::from(count);
        prop_assert_eq!(
            backoff.delay_for(count),
            Ok(Duration::from_millis(linear * linear))
        );
    }

    #[test]
    fn prop_table_clamps_to_last_entry(
        entries in prop::collection::vec(0u64..10_000, 1..20),
        count in 1u32..200,
    ) {
        let table: Vec<Duration> = entries.iter().copied().map(Duration::from_millis).collect();
        let backoff = Backoff::table(table);

        let index = (count as usize - 1).min(entries.len() - 1);
        prop_assert_eq!(
            backoff.delay_for(count),
            Ok(Duration::from_millis(entries[index]))
        );
    }

    #[test]
    fn prop_index_or_last_matches_manual_clamp(
        entries in prop::collection::vec(any::<i64>(), 1..30),
        index in 0usize..100,
    ) {
        let expected = entries[index.min(entries.len() - 1)];
        prop_assert_eq!(index_or_last(&entries, index), Some(&expected));
    }

    #[test]
    fn prop_index_or_last_empty_is_none(index in 0usize..100) {
        prop_assert_eq!(index_or_last::<i64>(&[], index), None);
    }

    #[test]
    fn prop_custom_result_is_used_as_is(
        delay_ms in 0u64..1_000,
        count in 1u32..100,
    ) {
        let backoff = Backoff::custom(|input| input.delay.saturating_mul(input.count) * 3)
            .with_delay(Duration::from_millis(delay_ms));

        prop_assert_eq!(
            backoff.delay_for(count),
            Ok(Duration::from_millis(delay_ms * u64::from(count) * 3))
        );
    }
}
