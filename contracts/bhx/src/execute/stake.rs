//! Staking handlers: open, claim one, claim all, claim a page.
//!
//! Claims remove stakes with `Vec::swap_remove`, so a claim at `index` moves the
//! staker's last stake into `index`. Bulk and paged claims walk the list from
//! the tail so a removal never moves a stake that has not been visited yet.

use cosmwasm_std::{Addr, DepsMut, Env, Event, MessageInfo, Response, Storage, Uint128};

use crate::error::ContractError;
use crate::ledger::{burn, mint, total_supply};
use crate::rewards::{stake_rewards, StakeRewards};
use crate::state::{
    Genesis, RedemptionState, Stake, GENESIS, MAX_STAKES_PER_CLAIM, MAX_STAKE_SECONDS,
    MIN_STAKE_AMOUNT, MIN_STAKE_SECONDS, REDEMPTION, STAKES, TOTAL_STAKED,
};
use crate::weeks::store_week_data;

/// Burn `amount` from the sender into a stake that unlocks at `unlock_time`.
pub fn execute_start_stake(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
    unlock_time: u64,
) -> Result<Response, ContractError> {
    let genesis = GENESIS.load(deps.storage)?;
    let now = env.block.time.seconds();
    if now < genesis.launch_time {
        return Err(ContractError::NotYetLaunched {
            launch_time: genesis.launch_time,
        });
    }

    if amount <= Uint128::new(MIN_STAKE_AMOUNT) {
        return Err(ContractError::StakeBelowMinimum {
            minimum: Uint128::new(MIN_STAKE_AMOUNT),
        });
    }

    let duration = unlock_time.saturating_sub(now);
    if !(MIN_STAKE_SECONDS..=MAX_STAKE_SECONDS).contains(&duration) {
        return Err(ContractError::StakeDurationOutOfRange {
            duration,
            min: MIN_STAKE_SECONDS,
            max: MAX_STAKE_SECONDS,
        });
    }

    store_week_data(deps.storage, now)?;

    // Snapshot globals before this stake moves them
    let total_staked = TOTAL_STAKED.may_load(deps.storage)?.unwrap_or_default();
    let supply = total_supply(deps.storage)?;

    burn(deps.storage, &info.sender, amount)?;

    let stake = Stake {
        amount,
        stake_time: now,
        unlock_time,
        total_staked_coins_at_start: total_staked,
        total_supply_at_start: supply,
    };
    let mut stakes = STAKES
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    stakes.push(stake);
    let index = stakes.len() - 1;
    STAKES.save(deps.storage, &info.sender, &stakes)?;

    let total_staked = total_staked.checked_add(amount)?;
    TOTAL_STAKED.save(deps.storage, &total_staked)?;

    Ok(Response::new()
        .add_attribute("action", "start_stake")
        .add_attribute("staker", info.sender)
        .add_attribute("index", index.to_string())
        .add_attribute("amount", amount)
        .add_attribute("stake_time", now.to_string())
        .add_attribute("unlock_time", unlock_time.to_string())
        .add_attribute("total_staked", total_staked))
}

/// Claim the stake at `index`. The staker's last stake takes its place.
pub fn execute_claim_staking_reward(
    deps: DepsMut,
    env: Env,
    staker: String,
    index: u32,
) -> Result<Response, ContractError> {
    let staker = deps.api.addr_validate(&staker)?;
    let now = env.block.time.seconds();
    let (genesis, redemption) = load_accounting(deps.storage, now)?;

    let mut stakes = STAKES.may_load(deps.storage, &staker)?.unwrap_or_default();
    let position = index as usize;
    let stake = stakes.get(position).ok_or_else(|| ContractError::NoSuchStake {
        staker: staker.to_string(),
        index,
    })?;
    ensure_matured(stake, now)?;

    let claimed = settle_stake(deps.storage, &genesis, &redemption, &staker, &mut stakes, position)?;
    save_stakes(deps.storage, &staker, &stakes)?;

    Ok(claim_response("claim_staking_reward", &staker, &[claimed], stakes.len()))
}

/// Claim every stake of `staker`. Fails if any stake is immature or there are too many.
pub fn execute_claim_all_staking_rewards(
    deps: DepsMut,
    env: Env,
    staker: String,
) -> Result<Response, ContractError> {
    let staker = deps.api.addr_validate(&staker)?;
    let now = env.block.time.seconds();
    let (genesis, redemption) = load_accounting(deps.storage, now)?;

    let mut stakes = STAKES.may_load(deps.storage, &staker)?.unwrap_or_default();
    if stakes.len() > MAX_STAKES_PER_CLAIM {
        return Err(ContractError::ComputeBudgetExhausted {
            stakes: stakes.len(),
            limit: MAX_STAKES_PER_CLAIM,
        });
    }
    for stake in &stakes {
        ensure_matured(stake, now)?;
    }

    let mut claimed = Vec::with_capacity(stakes.len());
    for position in (0..stakes.len()).rev() {
        claimed.push(settle_stake(
            deps.storage,
            &genesis,
            &redemption,
            &staker,
            &mut stakes,
            position,
        )?);
    }
    save_stakes(deps.storage, &staker, &stakes)?;

    Ok(claim_response("claim_all_staking_rewards", &staker, &claimed, stakes.len()))
}

/// Claim up to `limit` matured stakes, skipping immature ones.
pub fn execute_claim_staking_rewards_page(
    deps: DepsMut,
    env: Env,
    staker: String,
    limit: Option<u32>,
) -> Result<Response, ContractError> {
    let staker = deps.api.addr_validate(&staker)?;
    let now = env.block.time.seconds();
    let (genesis, redemption) = load_accounting(deps.storage, now)?;
    let limit = limit
        .map(|l| l as usize)
        .unwrap_or(MAX_STAKES_PER_CLAIM)
        .min(MAX_STAKES_PER_CLAIM);

    let mut stakes = STAKES.may_load(deps.storage, &staker)?.unwrap_or_default();
    let mut claimed = Vec::new();
    for position in (0..stakes.len()).rev() {
        if claimed.len() >= limit {
            break;
        }
        if now < stakes[position].unlock_time {
            continue;
        }
        claimed.push(settle_stake(
            deps.storage,
            &genesis,
            &redemption,
            &staker,
            &mut stakes,
            position,
        )?);
    }
    save_stakes(deps.storage, &staker, &stakes)?;

    Ok(claim_response("claim_staking_rewards_page", &staker, &claimed, stakes.len()))
}

// ============================================================================
// Helpers
// ============================================================================

/// One settled stake
struct ClaimedStake {
    index: usize,
    amount: Uint128,
    rewards: StakeRewards,
    additional: Uint128,
}

/// Advance weekly accounting, then read what reward calculation needs.
fn load_accounting(
    storage: &mut dyn Storage,
    now: u64,
) -> Result<(Genesis, RedemptionState), ContractError> {
    store_week_data(storage, now)?;
    Ok((GENESIS.load(storage)?, REDEMPTION.load(storage)?))
}

fn ensure_matured(stake: &Stake, now: u64) -> Result<(), ContractError> {
    if now < stake.unlock_time {
        return Err(ContractError::NotYetMatured {
            unlock_time: stake.unlock_time,
        });
    }
    Ok(())
}

/// Pay out `stakes[position]` and swap-remove it. The caller persists `stakes`.
fn settle_stake(
    storage: &mut dyn Storage,
    genesis: &Genesis,
    redemption: &RedemptionState,
    staker: &Addr,
    stakes: &mut Vec<Stake>,
    position: usize,
) -> Result<ClaimedStake, ContractError> {
    let stake = stakes.swap_remove(position);
    let rewards = stake_rewards(storage, genesis, redemption, &stake)?;
    let additional = rewards.additional()?;

    let payout = stake
        .amount
        .checked_add(rewards.staking)?
        .checked_add(additional)?;
    mint(storage, staker, payout)?;
    mint(storage, &genesis.origin, additional)?;

    let total_staked = TOTAL_STAKED.may_load(storage)?.unwrap_or_default();
    TOTAL_STAKED.save(storage, &total_staked.checked_sub(stake.amount)?)?;

    Ok(ClaimedStake {
        index: position,
        amount: stake.amount,
        rewards,
        additional,
    })
}

fn save_stakes(storage: &mut dyn Storage, staker: &Addr, stakes: &[Stake]) -> Result<(), ContractError> {
    if stakes.is_empty() {
        STAKES.remove(storage, staker);
    } else {
        STAKES.save(storage, staker, &stakes.to_vec())?;
    }
    Ok(())
}

fn claim_response(
    action: &str,
    staker: &Addr,
    claimed: &[ClaimedStake],
    remaining: usize,
) -> Response {
    let mut total_payout = Uint128::zero();
    let mut events = Vec::with_capacity(claimed.len());
    for c in claimed {
        total_payout += c.amount + c.rewards.staking + c.additional;
        events.push(
            Event::new("claim_stake")
                .add_attribute("staker", staker.as_str())
                .add_attribute("index", c.index.to_string())
                .add_attribute("amount", c.amount)
                .add_attribute("staking_rewards", c.rewards.staking)
                .add_attribute("satoshi_rewards", c.rewards.satoshi)
                .add_attribute("viral_rewards", c.rewards.viral)
                .add_attribute("crit_mass_rewards", c.rewards.crit_mass)
                .add_attribute("additional_rewards", c.additional),
        );
    }

    Response::new()
        .add_events(events)
        .add_attribute("action", action)
        .add_attribute("staker", staker.as_str())
        .add_attribute("claimed", claimed.len().to_string())
        .add_attribute("remaining", remaining.to_string())
        .add_attribute("total_payout", total_payout)
}
