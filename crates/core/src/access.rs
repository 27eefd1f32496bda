//! Access policy for courses and lessons.
//!
//! Two independent grant paths exist: course-level access (enrollment,
//! premium subscription, or a free course) and per-lesson preview. A missing
//! or inactive course is a not-found condition handled by callers before the
//! policy is consulted; the policy itself is pure and deterministic.

use lyceum_shared::types::{Credits, SubscriptionTier};

/// Decides whether a user may access a course's content as a whole.
///
/// Grants access if the user is enrolled in the course, holds a premium
/// subscription, or the course is free. Credit balance plays no role here:
/// credits buy enrollment, enrollment grants access.
#[must_use]
pub fn course_access(tier: SubscriptionTier, price: Credits, is_enrolled: bool) -> bool {
    is_enrolled || tier.is_premium() || price.is_zero()
}

/// Decides whether a user may view a single lesson.
///
/// A preview lesson is viewable without any course-level grant.
#[must_use]
pub fn lesson_access(course_grant: bool, is_preview: bool) -> bool {
    course_grant || is_preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(SubscriptionTier::Free, dec!(30), true, true)] // enrolled
    #[case(SubscriptionTier::Premium, dec!(30), false, true)] // premium
    #[case(SubscriptionTier::Free, dec!(0), false, true)] // free course
    #[case(SubscriptionTier::Free, dec!(30), false, false)] // no grant path
    fn test_course_access(
        #[case] tier: SubscriptionTier,
        #[case] price: rust_decimal::Decimal,
        #[case] enrolled: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(course_access(tier, Credits::new(price), enrolled), expected);
    }

    #[test]
    fn test_premium_access_ignores_balance() {
        // Premium access is tier-driven; there is no balance input at all.
        assert!(course_access(
            SubscriptionTier::Premium,
            Credits::new(dec!(9999)),
            false
        ));
    }

    #[test]
    fn test_preview_lesson_without_course_grant() {
        assert!(lesson_access(false, true));
    }

    #[test]
    fn test_non_preview_lesson_requires_course_grant() {
        assert!(!lesson_access(false, false));
        assert!(lesson_access(true, false));
    }
}
