//! Staking reward calculations
//!
//! A matured stake earns:
//! - staking rewards: compound interest at a share-scaled period rate
//! - satoshi rewards: 2% of each week's unclaimed pool the stake spanned
//! - viral rewards: 10% of `amount * redeemed_count / external_circulation`
//! - crit-mass rewards: 10% of `amount * total_redeemed / maximum_redeemable`
//!
//! The last three are the "additional" rewards, which the origin account
//! receives a second time on every claim.

use cosmwasm_std::{Storage, Uint128};

use crate::compound::{compound, share_scaled_rate};
use crate::error::ContractError;
use crate::state::{
    Genesis, RedemptionState, Stake, BONUS_WEEKS, INTEREST_PERIOD_SECONDS,
    INTEREST_RATE_PERCENT,
};
use crate::weeks::{unclaimed_coins, week_index};

/// Percent of each week's unclaimed pool paid as satoshi rewards
pub const SATOSHI_REWARD_PERCENT: u128 = 2;

/// Percent applied to the viral and crit-mass ratios
pub const ADOPTION_REWARD_PERCENT: u128 = 10;

/// Every reward component of one stake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StakeRewards {
    pub staking: Uint128,
    pub satoshi: Uint128,
    pub viral: Uint128,
    pub crit_mass: Uint128,
}

impl StakeRewards {
    /// `satoshi + viral + crit_mass`
    pub fn additional(&self) -> Result<Uint128, ContractError> {
        Ok(self
            .satoshi
            .checked_add(self.viral)?
            .checked_add(self.crit_mass)?)
    }
}

/// Staker's percentage of supply that was staked when the stake opened, at least 1.
pub fn network_share(stake: &Stake) -> u64 {
    if stake.total_supply_at_start.is_zero() {
        return 1;
    }
    let share = stake
        .total_staked_coins_at_start
        .full_mul(100u128)
        .checked_div(stake.total_supply_at_start.into())
        .unwrap_or_default();
    Uint128::try_from(share)
        .ok()
        .and_then(|share| u64::try_from(share.u128()).ok())
        .unwrap_or(u64::MAX)
        .max(1)
}

/// Compound interest earned by `stake` over its whole lock.
pub fn staking_rewards(stake: &Stake) -> Result<Uint128, ContractError> {
    let periods = stake.unlock_time.saturating_sub(stake.stake_time) / INTEREST_PERIOD_SECONDS;
    let rate = share_scaled_rate(INTEREST_RATE_PERCENT, network_share(stake));
    let compounded = compound(stake.amount, periods, rate)?;
    Ok(compounded.checked_sub(stake.amount)?)
}

/// 2% of the unclaimed pool for each bonus week in `[start week, end week)`.
pub fn satoshi_rewards(
    storage: &dyn Storage,
    launch_time: u64,
    stake_time: u64,
    unlock_time: u64,
) -> Result<Uint128, ContractError> {
    let start_week = week_index(launch_time, stake_time);
    let end_week = week_index(launch_time, unlock_time).min(BONUS_WEEKS);

    let mut total = Uint128::zero();
    for week in start_week..end_week {
        let pool = unclaimed_coins(storage, week)?;
        let reward = pool.multiply_ratio(SATOSHI_REWARD_PERCENT, 100u128);
        total = total.checked_add(reward)?;
    }
    Ok(total)
}

/// Bonus scaled by how many snapshot entries have been redeemed.
pub fn viral_rewards(
    genesis: &Genesis,
    redemption: &RedemptionState,
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    ratio_bonus(
        amount,
        Uint128::from(redemption.redeemed_count),
        genesis.total_external_circulation_at_fork,
    )
}

/// Bonus scaled by how much of the redeemable value has been claimed.
pub fn crit_mass_rewards(
    genesis: &Genesis,
    redemption: &RedemptionState,
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    ratio_bonus(amount, redemption.total_redeemed, genesis.maximum_redeemable)
}

/// `amount * numerator / denominator * 10%`, each division floored; zero on empty denominator.
fn ratio_bonus(
    amount: Uint128,
    numerator: Uint128,
    denominator: Uint128,
) -> Result<Uint128, ContractError> {
    if denominator.is_zero() {
        return Ok(Uint128::zero());
    }
    let scaled = amount.full_mul(numerator).checked_div(denominator.into())?;
    let scaled = Uint128::try_from(scaled)?;
    Ok(scaled.multiply_ratio(ADOPTION_REWARD_PERCENT, 100u128))
}

/// All reward components for `stake` given the current ledger state.
pub fn stake_rewards(
    storage: &dyn Storage,
    genesis: &Genesis,
    redemption: &RedemptionState,
    stake: &Stake,
) -> Result<StakeRewards, ContractError> {
    Ok(StakeRewards {
        staking: staking_rewards(stake)?,
        satoshi: satoshi_rewards(
            storage,
            genesis.launch_time,
            stake.stake_time,
            stake.unlock_time,
        )?,
        viral: viral_rewards(genesis, redemption, stake.amount)?,
        crit_mass: crit_mass_rewards(genesis, redemption, stake.amount)?,
    })
}
