//! Shared types, errors, and configuration for Lyceum.
//!
//! This crate provides common types used across all other crates:
//! - Credit amounts with decimal precision
//! - Subscription tiers
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
