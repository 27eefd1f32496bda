//! Tier-limited listing caps for premium content.
//!
//! Stock recommendations and market news are teasers for free-tier users and
//! fully listed for premium users. Caps are matched exhaustively so a new
//! tier cannot silently inherit a default.

use lyceum_shared::types::SubscriptionTier;

/// Number of stock recommendations shown on the dashboard.
#[must_use]
pub const fn dashboard_recommendations(tier: SubscriptionTier) -> u64 {
    match tier {
        SubscriptionTier::Free => 2,
        SubscriptionTier::Premium => 5,
    }
}

/// Number of news articles shown on the dashboard.
#[must_use]
pub const fn dashboard_news(tier: SubscriptionTier) -> u64 {
    match tier {
        SubscriptionTier::Free => 3,
        SubscriptionTier::Premium => 5,
    }
}

/// Cap on the recommendations listing page. `None` means unlimited.
#[must_use]
pub const fn recommendations_cap(tier: SubscriptionTier) -> Option<u64> {
    match tier {
        SubscriptionTier::Free => Some(3),
        SubscriptionTier::Premium => None,
    }
}

/// Cap on the news listing page. `None` means unlimited.
#[must_use]
pub const fn news_cap(tier: SubscriptionTier) -> Option<u64> {
    match tier {
        SubscriptionTier::Free => Some(5),
        SubscriptionTier::Premium => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tier_sees_teasers() {
        assert_eq!(dashboard_recommendations(SubscriptionTier::Free), 2);
        assert_eq!(dashboard_news(SubscriptionTier::Free), 3);
        assert_eq!(recommendations_cap(SubscriptionTier::Free), Some(3));
        assert_eq!(news_cap(SubscriptionTier::Free), Some(5));
    }

    #[test]
    fn test_premium_tier_uncapped_listings() {
        assert_eq!(recommendations_cap(SubscriptionTier::Premium), None);
        assert_eq!(news_cap(SubscriptionTier::Premium), None);
    }

    #[test]
    fn test_premium_dashboard_previews() {
        assert_eq!(dashboard_recommendations(SubscriptionTier::Premium), 5);
        assert_eq!(dashboard_news(SubscriptionTier::Premium), 5);
    }
}
