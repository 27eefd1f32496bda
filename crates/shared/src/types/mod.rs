//! Common types used across the application.

pub mod credits;
pub mod tier;

pub use credits::Credits;
pub use tier::SubscriptionTier;
