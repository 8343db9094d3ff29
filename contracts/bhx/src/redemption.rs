//! Redemption value schedule
//!
//! A snapshot entry of `satoshis` converts to tokens in three steps:
//!
//! | Step        | Rule                                                        |
//! |-------------|-------------------------------------------------------------|
//! | Precision   | `v = satoshis * 1e10` (8 → 18 decimals)                     |
//! | Whale curve | `v ∈ (1e21, 1e23)`: `(v - 1e21) * 2 / 9 + 5e20`; `v ≥ 1e23`: `v / 4` |
//! | Late decay  | `v * (100 - 2 * weeks) / 100`, zero from week 50            |
//!
//! The speed bonus is then a percentage of the decayed amount that steps down
//! from 10% in the first weeks to nothing after week 45.

use cosmwasm_std::{Uint128, Uint256};

use crate::error::ContractError;
use crate::state::{BONUS_WEEKS, SATOSHI_TO_TOKEN};

/// Redemptions above this (token precision) follow the whale curve
pub const WHALE_THRESHOLD: u128 = 1_000_000_000_000_000_000_000; // 1e21

/// Redemptions at or above this are quartered
pub const WHALE_QUARTER_THRESHOLD: u128 = 100_000_000_000_000_000_000_000; // 1e23

/// Whale curve offset: half of `WHALE_THRESHOLD`
const WHALE_CURVE_OFFSET: u128 = 500_000_000_000_000_000_000; // 5e20

/// Components of a single redemption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeemBreakdown {
    pub base_amount: Uint128,
    pub speed_bonus: Uint128,
    /// `base_amount + speed_bonus`, credited to the redeemer
    pub redeem_amount: Uint128,
}

/// Convert a satoshi amount to token precision and apply the whale curve.
pub fn scaled_amount(satoshis: Uint128) -> Result<Uint128, ContractError> {
    let value = Uint256::from(satoshis).checked_mul(Uint256::from(SATOSHI_TO_TOKEN))?;

    let value = if value >= Uint256::from(WHALE_QUARTER_THRESHOLD) {
        value / Uint256::from(4u8)
    } else if value > Uint256::from(WHALE_THRESHOLD) {
        (value - Uint256::from(WHALE_THRESHOLD)) * Uint256::from(2u8) / Uint256::from(9u8)
            + Uint256::from(WHALE_CURVE_OFFSET)
    } else {
        value
    };

    Ok(Uint128::try_from(value)?)
}

/// Token amount credited for `satoshis` redeemed `weeks` after launch, before bonus.
pub fn base_amount(satoshis: Uint128, weeks: u64) -> Result<Uint128, ContractError> {
    let scaled = scaled_amount(satoshis)?;
    let weeks = weeks.min(BONUS_WEEKS);
    let remaining_percent = 100 - 2 * weeks;
    Ok(scaled.multiply_ratio(remaining_percent, 100u64))
}

/// Speed bonus percentage for redemptions `weeks` after launch.
pub fn speed_bonus_percent(weeks: u64) -> u64 {
    match weeks {
        0..=1 => 10,
        2..=3 => 9,
        4..=5 => 8,
        6..=7 => 7,
        8..=10 => 6,
        11..=14 => 5,
        15..=18 => 4,
        19..=24 => 3,
        25..=32 => 2,
        33..=45 => 1,
        _ => 0,
    }
}

/// Speed bonus on an already-decayed base amount.
pub fn speed_bonus(base_amount: Uint128, weeks: u64) -> Uint128 {
    base_amount.multiply_ratio(speed_bonus_percent(weeks), 100u64)
}

/// Full breakdown for redeeming `satoshis` at `weeks` since launch.
pub fn redeem_breakdown(satoshis: Uint128, weeks: u64) -> Result<RedeemBreakdown, ContractError> {
    let base_amount = base_amount(satoshis, weeks)?;
    let speed_bonus = speed_bonus(base_amount, weeks);
    let redeem_amount = base_amount.checked_add(speed_bonus)?;
    Ok(RedeemBreakdown {
        base_amount,
        speed_bonus,
        redeem_amount,
    })
}

/// Referral reward: 5% of the redeemed amount.
pub fn referral_reward(redeem_amount: Uint128) -> Uint128 {
    redeem_amount / Uint128::new(20)
}

/// Smallest `maximum_redeemable` under which every listed snapshot entry can
/// be redeemed.
///
/// `total_redeemed` accumulates bonus-inclusive amounts, so the ceiling is the
/// sum of week-zero payouts. Decay and the bonus step-down only shrink a
/// payout, so later redemptions always fit.
pub fn maximum_redeemable_for<I>(satoshis: I) -> Result<Uint128, ContractError>
where
    I: IntoIterator<Item = Uint128>,
{
    satoshis
        .into_iter()
        .try_fold(Uint128::zero(), |total, amount| -> Result<Uint128, ContractError> {
            Ok(total.checked_add(redeem_breakdown(amount, 0)?.redeem_amount)?)
        })
}
