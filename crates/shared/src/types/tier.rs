//! Subscription tiers.

use serde::{Deserialize, Serialize};

/// Subscription tier of a user account.
///
/// A closed set checked exhaustively wherever tier drives behavior
/// (access policy, content visibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Free tier: pays per course, limited content previews.
    Free,
    /// Premium tier: full course and content access.
    Premium,
}

impl SubscriptionTier {
    /// Returns true for the premium tier.
    #[must_use]
    pub const fn is_premium(self) -> bool {
        matches!(self, Self::Premium)
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

impl std::str::FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            _ => Err(format!("Unknown subscription tier: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tier_display() {
        assert_eq!(SubscriptionTier::Free.to_string(), "free");
        assert_eq!(SubscriptionTier::Premium.to_string(), "premium");
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!(
            SubscriptionTier::from_str("free").unwrap(),
            SubscriptionTier::Free
        );
        assert_eq!(
            SubscriptionTier::from_str("PREMIUM").unwrap(),
            SubscriptionTier::Premium
        );
        assert!(SubscriptionTier::from_str("gold").is_err());
    }

    #[test]
    fn test_is_premium() {
        assert!(SubscriptionTier::Premium.is_premium());
        assert!(!SubscriptionTier::Free.is_premium());
    }
}
