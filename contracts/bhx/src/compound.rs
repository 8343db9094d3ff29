//! Overflow-checked compound interest
//!
//! Rates are fixed point with four decimals: `10_000` is 1.0x per period, so a
//! 1% period rate is `10_100`. Compounding runs in batches of
//! [`COMPOUND_BATCH_PERIODS`]:
//!
//! ```text
//! value = value * rate^10 / 10_000^10     (once per full batch)
//! value = value * rate^r  / 10_000^r      (once for the r < 10 leftover periods)
//! ```
//!
//! Every multiplication is checked against `Uint256::MAX`; the first one that
//! would exceed it aborts with [`ContractError::ArithmeticOverflow`]. The
//! principal is divided by [`PRECISION_SCALE`] before compounding to keep
//! headroom. The remainder of that division is added back uncompounded.

use cosmwasm_std::{Uint128, Uint256};

use crate::error::ContractError;

/// Fixed-point unit for rates (1.0x)
pub const RATE_BASE: u64 = 10_000;

/// Periods folded into one multiply/divide step
pub const COMPOUND_BATCH_PERIODS: u64 = 10;

/// Precision dropped from the principal while compounding
pub const PRECISION_SCALE: u128 = 10_000_000_000;

/// Multiply, failing instead of wrapping past the 256-bit ceiling.
fn checked_mul(a: Uint256, b: Uint256) -> Result<Uint256, ContractError> {
    a.checked_mul(b).map_err(|_| ContractError::ArithmeticOverflow)
}

/// `base^exp` by repeated checked multiplication.
fn checked_pow(base: u64, exp: u64) -> Result<Uint256, ContractError> {
    let base = Uint256::from(base);
    let mut result = Uint256::one();
    for _ in 0..exp {
        result = checked_mul(result, base)?;
    }
    Ok(result)
}

/// Compound `principal` over `periods` at fixed-point `rate`.
pub fn compound(principal: Uint128, periods: u64, rate: u64) -> Result<Uint128, ContractError> {
    let scale = Uint128::new(PRECISION_SCALE);
    let dust = principal.checked_rem(scale)?;
    let mut value = Uint256::from(principal.checked_div(scale)?);
    if value.is_zero() || rate == RATE_BASE {
        return Ok(principal);
    }

    let full_batches = periods / COMPOUND_BATCH_PERIODS;
    let leftover = periods % COMPOUND_BATCH_PERIODS;

    if full_batches > 0 {
        let rate_pow = checked_pow(rate, COMPOUND_BATCH_PERIODS)?;
        let base_pow = checked_pow(RATE_BASE, COMPOUND_BATCH_PERIODS)?;
        for _ in 0..full_batches {
            value = checked_mul(value, rate_pow)? / base_pow;
            if value.is_zero() {
                break;
            }
        }
    }

    if leftover > 0 {
        let rate_pow = checked_pow(rate, leftover)?;
        let base_pow = checked_pow(RATE_BASE, leftover)?;
        value = checked_mul(value, rate_pow)? / base_pow;
    }

    let rescaled = checked_mul(value, Uint256::from(PRECISION_SCALE))?;
    let compounded = Uint128::try_from(rescaled)?;
    Ok(compounded.checked_add(dust)?)
}

/// Period rate for a stake holding `share` percent of supply.
///
/// Larger shares dilute the bonus over [`RATE_BASE`]; share is floored at 1.
pub fn share_scaled_rate(interest_rate_percent: u64, share: u64) -> u64 {
    let share = share.max(1);
    interest_rate_percent * 100 / share + RATE_BASE
}
