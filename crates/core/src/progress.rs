//! Enrollment progress calculation.
//!
//! Progress is derived from the rank of the visited lesson within the
//! course's ordered lesson sequence: visiting the lesson at zero-based rank
//! `i` of `n` lessons counts `min(i + 1, n)` lessons as completed.
//!
//! Whether a visit to an *earlier* lesson may lower previously recorded
//! progress is a policy decision, not an accident of recomputation order:
//! see [`ProgressPolicy`].

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Progress value at which an enrollment counts as completed.
pub const COMPLETE: Decimal = dec!(100);

/// How a new visit combines with previously recorded progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressPolicy {
    /// Progress reflects the visited lesson's rank. Revisiting an earlier
    /// lesson lowers progress back to that lesson's rank.
    #[default]
    VisitedRank,
    /// Progress is the high-water mark: `max(current, computed)`. Revisits
    /// never lower it.
    HighWater,
}

/// A computed progress update for an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Completion percentage, 0-100 inclusive, whole percent.
    pub progress: Decimal,
    /// True iff `progress` is exactly 100.
    pub completed: bool,
}

/// Locates a lesson's zero-based rank within a course's lesson sequence.
///
/// The sequence is ordered by `order` ascending; ties (the `order` field is
/// not unique within a course) break deterministically by lesson id
/// ascending. Returns `None` if the lesson is not in the sequence.
#[must_use]
pub fn lesson_rank(sequence: &[(i32, Uuid)], lesson_id: Uuid) -> Option<usize> {
    let mut ordered: Vec<(i32, Uuid)> = sequence.to_vec();
    ordered.sort_unstable();
    ordered.iter().position(|&(_, id)| id == lesson_id)
}

/// Completion percentage after visiting the lesson at `rank` of `total`.
///
/// `round(min(rank + 1, total) / total * 100)`, rounding halves away from
/// zero (so 1 of 8 lessons is 13%, not banker's 12%). Returns zero for an
/// empty sequence, though callers never see one: the visited lesson itself
/// belongs to the sequence.
#[must_use]
pub fn visited_progress(rank: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    let completed = rank.saturating_add(1).min(total);
    (Decimal::from(completed) * dec!(100) / Decimal::from(total))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Combines a visit with the current progress under the given policy.
#[must_use]
pub fn progress_after_visit(
    policy: ProgressPolicy,
    current: Decimal,
    rank: usize,
    total: usize,
) -> ProgressUpdate {
    let computed = visited_progress(rank, total);
    let progress = match policy {
        ProgressPolicy::VisitedRank => computed,
        ProgressPolicy::HighWater => current.max(computed),
    };
    ProgressUpdate {
        progress,
        completed: progress == COMPLETE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn seq(orders: &[i32]) -> Vec<(i32, Uuid)> {
        orders.iter().map(|&o| (o, Uuid::now_v7())).collect()
    }

    #[test]
    fn test_rank_follows_order_field() {
        let mut lessons = seq(&[1, 2, 3]);
        // present out of storage order
        lessons.swap(0, 2);
        let third = lessons.iter().find(|&&(o, _)| o == 3).unwrap().1;
        assert_eq!(lesson_rank(&lessons, third), Some(2));
    }

    #[test]
    fn test_rank_missing_lesson() {
        let lessons = seq(&[1, 2]);
        assert_eq!(lesson_rank(&lessons, Uuid::now_v7()), None);
    }

    #[test]
    fn test_rank_ties_break_by_id() {
        // Two lessons share order 1; the lower id ranks first.
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let lessons = vec![(1, hi), (1, lo), (2, Uuid::now_v7())];
        assert_eq!(lesson_rank(&lessons, lo), Some(0));
        assert_eq!(lesson_rank(&lessons, hi), Some(1));
    }

    #[rstest]
    #[case(1, 4, dec!(50))] // second of four lessons
    #[case(3, 4, dec!(100))] // last of four
    #[case(0, 3, dec!(33))]
    #[case(1, 3, dec!(67))]
    #[case(0, 1, dec!(100))]
    #[case(0, 8, dec!(13))] // 12.5 rounds away from zero
    fn test_visited_progress(#[case] rank: usize, #[case] total: usize, #[case] expected: Decimal) {
        assert_eq!(visited_progress(rank, total), expected);
    }

    #[test]
    fn test_rank_beyond_sequence_clamps() {
        assert_eq!(visited_progress(10, 4), dec!(100));
    }

    #[test]
    fn test_empty_sequence_is_zero() {
        assert_eq!(visited_progress(0, 0), Decimal::ZERO);
    }

    #[test]
    fn test_visit_scenario_four_lessons() {
        // Visit rank 2-of-4 (zero-based 1), then rank 4-of-4.
        let mid = progress_after_visit(ProgressPolicy::VisitedRank, Decimal::ZERO, 1, 4);
        assert_eq!(mid.progress, dec!(50));
        assert!(!mid.completed);

        let last = progress_after_visit(ProgressPolicy::VisitedRank, mid.progress, 3, 4);
        assert_eq!(last.progress, dec!(100));
        assert!(last.completed);
    }

    #[test]
    fn test_visited_rank_policy_lowers_on_revisit() {
        let update = progress_after_visit(ProgressPolicy::VisitedRank, dec!(100), 0, 4);
        assert_eq!(update.progress, dec!(25));
        assert!(!update.completed);
    }

    #[test]
    fn test_high_water_policy_never_lowers() {
        let update = progress_after_visit(ProgressPolicy::HighWater, dec!(100), 0, 4);
        assert_eq!(update.progress, dec!(100));
        assert!(update.completed);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Progress is always within (0, 100] for a non-empty sequence.
        #[test]
        fn prop_progress_bounds(total in 1usize..200, rank in 0usize..200) {
            let p = visited_progress(rank, total);
            prop_assert!(p > Decimal::ZERO);
            prop_assert!(p <= COMPLETE);
        }

        /// Visiting the final lesson always yields exactly 100.
        #[test]
        fn prop_final_lesson_completes(total in 1usize..200) {
            prop_assert_eq!(visited_progress(total - 1, total), COMPLETE);
        }

        /// Progress is non-decreasing in rank for a fixed sequence length.
        #[test]
        fn prop_progress_monotonic_in_rank(total in 2usize..200, rank in 1usize..200) {
            let rank = rank.min(total - 1);
            prop_assert!(visited_progress(rank, total) >= visited_progress(rank - 1, total));
        }

        /// The high-water policy never reports less than current progress.
        #[test]
        fn prop_high_water_never_decreases(
            current in 0u32..=100,
            total in 1usize..50,
            rank in 0usize..50,
        ) {
            let current = Decimal::from(current);
            let update = progress_after_visit(ProgressPolicy::HighWater, current, rank, total);
            prop_assert!(update.progress >= current);
        }

        /// Completion is exactly the progress == 100 predicate, either policy.
        #[test]
        fn prop_completed_iff_full(
            current in 0u32..=100,
            total in 1usize..50,
            rank in 0usize..50,
        ) {
            for policy in [ProgressPolicy::VisitedRank, ProgressPolicy::HighWater] {
                let update = progress_after_visit(policy, Decimal::from(current), rank, total);
                prop_assert_eq!(update.completed, update.progress == COMPLETE);
            }
        }
    }
}
