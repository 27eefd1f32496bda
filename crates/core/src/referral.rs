//! Referral credit rules and referral-code generation.
//!
//! A referral is a one-time credit-granting relationship created at signup:
//! the referrer earns [`REFERRER_CREDIT`], the new user earns
//! [`REFERRED_BONUS`]. The two constants are independent and both additive
//! to existing balances.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Credits granted to the referring user per successful referral.
pub const REFERRER_CREDIT: Decimal = dec!(50.00);

/// Signup bonus granted to the referred user.
pub const REFERRED_BONUS: Decimal = dec!(25.00);

/// Maximum length of the username-derived portion of a referral code.
pub const CODE_BASE_LEN: usize = 8;

/// Derives the base referral code from a username: lowercased, spaces
/// stripped, truncated to [`CODE_BASE_LEN`] characters. Falls back to
/// `"member"` if nothing remains.
#[must_use]
pub fn code_base(username: &str) -> String {
    let base: String = username
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(CODE_BASE_LEN)
        .collect();

    if base.is_empty() {
        "member".to_string()
    } else {
        base
    }
}

/// The `n`-th candidate code for a base: the base itself, then `base1`,
/// `base2`, ... The store appends candidates until one is unique.
#[must_use]
pub fn code_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}{attempt}")
    }
}
