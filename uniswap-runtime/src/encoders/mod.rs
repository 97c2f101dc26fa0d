//! Pure calldata builders.
//!
//! Each encoder turns validated arguments into an [`EncodedTransaction`]
//! against a fixed contract address. No chain access happens here, which
//! keeps every encoding path unit-testable.

pub mod position_manager;
pub mod swap_router;

use alloy::primitives::U256;
use chrono::Utc;

pub use position_manager::{MintArgs, PositionManagerEncoder};
pub use swap_router::SwapRouterEncoder;

/// Transactions carry a deadline 20 minutes out, matching the plugin's
/// original submission window.
pub const DEADLINE_SECS: i64 = 1200;

/// uint128 max, used as the "collect everything" sentinel.
pub const MAX_UINT128: u128 = u128::MAX;

/// Unix deadline `DEADLINE_SECS` from now.
pub fn deadline_from_now() -> U256 {
    U256::from(Utc::now().timestamp().max(0) as u64 + DEADLINE_SECS as u64)
}
