//! Weekly accounting shared by the redemption and staking ledgers.
//!
//! The bonus period is the first [`BONUS_WEEKS`] weeks after launch. Each time a
//! week boundary is crossed, the still-unclaimed snapshot pool is recorded so
//! stakes can later draw satoshi rewards from it.

use cosmwasm_std::{Storage, Uint128};

use crate::error::ContractError;
use crate::state::{Genesis, BONUS_WEEKS, GENESIS, REDEMPTION, UNCLAIMED_COINS, WEEK_SECONDS};

/// Whole weeks elapsed between `launch_time` and `now`, capped at the bonus period.
///
/// Times before launch count as week 0.
pub fn weeks_since_launch(launch_time: u64, now: u64) -> u64 {
    (now.saturating_sub(launch_time) / WEEK_SECONDS).min(BONUS_WEEKS)
}

/// Week index containing `time`, uncapped.
pub fn week_index(launch_time: u64, time: u64) -> u64 {
    time.saturating_sub(launch_time) / WEEK_SECONDS
}

/// Snapshot the unclaimed pool for every week crossed since the last update.
///
/// Returns the number of weeks recorded by this call; zero when nothing changed.
pub fn store_week_data(storage: &mut dyn Storage, now: u64) -> Result<u64, ContractError> {
    let genesis = GENESIS.load(storage)?;
    let mut redemption = REDEMPTION.load(storage)?;

    let current_week = weeks_since_launch(genesis.launch_time, now);
    if current_week <= redemption.last_updated_week {
        return Ok(0);
    }

    let unclaimed = unclaimed_pool(&genesis, redemption.total_redeemed);
    for week in redemption.last_updated_week..current_week {
        UNCLAIMED_COINS.save(storage, week, &unclaimed)?;
    }

    let recorded = current_week - redemption.last_updated_week;
    redemption.last_updated_week = current_week;
    REDEMPTION.save(storage, &redemption)?;

    Ok(recorded)
}

/// Unclaimed coins recorded for `week`, zero if that week was never crossed.
pub fn unclaimed_coins(storage: &dyn Storage, week: u64) -> Result<Uint128, ContractError> {
    Ok(UNCLAIMED_COINS.may_load(storage, week)?.unwrap_or_default())
}

fn unclaimed_pool(genesis: &Genesis, total_redeemed: Uint128) -> Uint128 {
    genesis.maximum_redeemable.saturating_sub(total_redeemed)
}
