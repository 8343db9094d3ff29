//! Query handlers for the BitcoinHex contract.

use cosmwasm_std::{Binary, Deps, Env, StdError, StdResult, Uint128};

use common::hash::{bytes20_to_hex, p2pkh_address};
use common::merkle::verify_slices;

use crate::address::{
    derive_external_address, derive_local_address, parse_pub_key, utxo_leaf, verify_claim,
};
use crate::compound::compound;
use crate::error::ContractError;
use crate::msg::{
    AccountStakedResponse, CanRedeemResponse, CompoundResponse, DerivedAddressesResponse,
    GenesisResponse, InterestRatePercentResponse, IsRedeemedResponse, RedeemPreviewResponse,
    RedemptionStateResponse, StakeResponse, StakesResponse, StakingRewardsResponse,
    TotalStakedCoinsResponse, UnclaimedCoinsResponse, VerifyClaimResponse,
};
use crate::redemption::{redeem_breakdown, referral_reward};
use crate::rewards::stake_rewards;
use crate::state::{
    Stake, GENESIS, INTEREST_RATE_PERCENT, REDEEMED, REDEMPTION, STAKES, TOTAL_STAKED,
};
use crate::weeks::{unclaimed_coins, weeks_since_launch};

fn to_std(err: ContractError) -> StdError {
    StdError::generic_err(err.to_string())
}

fn to_bytes32(bytes: &[u8]) -> StdResult<[u8; 32]> {
    bytes
        .try_into()
        .map_err(|_| to_std(ContractError::InvalidHashLength { got: bytes.len() }))
}

// ============================================================================
// Redemption Queries
// ============================================================================

pub fn query_genesis(deps: Deps) -> StdResult<GenesisResponse> {
    let genesis = GENESIS.load(deps.storage)?;
    Ok(GenesisResponse {
        origin: genesis.origin,
        launch_time: genesis.launch_time,
        root_hash: Binary::from(genesis.root_hash.to_vec()),
        maximum_redeemable: genesis.maximum_redeemable,
        total_external_circulation_at_fork: genesis.total_external_circulation_at_fork,
    })
}

pub fn query_redemption_state(deps: Deps, env: Env) -> StdResult<RedemptionStateResponse> {
    let genesis = GENESIS.load(deps.storage)?;
    let redemption = REDEMPTION.load(deps.storage)?;
    Ok(RedemptionStateResponse {
        total_redeemed: redemption.total_redeemed,
        redeemed_count: redemption.redeemed_count,
        maximum_redeemable: genesis.maximum_redeemable,
        last_updated_week: redemption.last_updated_week,
        weeks_since_launch: weeks_since_launch(genesis.launch_time, env.block.time.seconds()),
    })
}

pub fn query_unclaimed_coins(deps: Deps, week: u64) -> StdResult<UnclaimedCoinsResponse> {
    let amount = unclaimed_coins(deps.storage, week).map_err(to_std)?;
    Ok(UnclaimedCoinsResponse { week, amount })
}

/// Proof check against the genesis root plus the redeemed flag.
pub fn query_can_redeem(deps: Deps, leaf: Binary, proof: Vec<Binary>) -> StdResult<CanRedeemResponse> {
    let leaf = to_bytes32(&leaf)?;
    can_redeem(deps, leaf, &proof)
}

pub fn query_can_redeem_utxo(
    deps: Deps,
    external_address: Binary,
    amount: Uint128,
    proof: Vec<Binary>,
) -> StdResult<CanRedeemResponse> {
    let external_address: [u8; 20] = external_address.as_slice().try_into().map_err(|_| {
        StdError::generic_err(format!(
            "Invalid external address: expected 20 bytes, got {}",
            external_address.len()
        ))
    })?;
    can_redeem(deps, utxo_leaf(&external_address, amount), &proof)
}

fn can_redeem(deps: Deps, leaf: [u8; 32], proof: &[Binary]) -> StdResult<CanRedeemResponse> {
    let genesis = GENESIS.load(deps.storage)?;
    Ok(CanRedeemResponse {
        leaf: Binary::from(leaf.to_vec()),
        valid_proof: verify_slices(&leaf, proof, &genesis.root_hash),
        redeemed: REDEEMED.has(deps.storage, leaf.as_slice()),
    })
}

pub fn query_is_redeemed(deps: Deps, leaf: Binary) -> StdResult<IsRedeemedResponse> {
    let leaf = to_bytes32(&leaf)?;
    Ok(IsRedeemedResponse {
        redeemed: REDEEMED.has(deps.storage, leaf.as_slice()),
    })
}

pub fn query_derived_addresses(pub_key: Binary) -> StdResult<DerivedAddressesResponse> {
    let key = parse_pub_key(&pub_key).map_err(to_std)?;
    let external = derive_external_address(&key);
    Ok(DerivedAddressesResponse {
        external_address: Binary::from(external.to_vec()),
        external_address_p2pkh: p2pkh_address(&external),
        local_address: bytes20_to_hex(&derive_local_address(&key)),
    })
}

pub fn query_verify_claim(
    deps: Deps,
    pub_key: Binary,
    claimer: String,
    signature: Binary,
) -> StdResult<VerifyClaimResponse> {
    let valid = verify_claim(deps.api, &pub_key, &claimer, &signature).map_err(to_std)?;
    Ok(VerifyClaimResponse { valid })
}

/// Payout for redeeming `amount` satoshis at the current block.
pub fn query_redeem_preview(deps: Deps, env: Env, amount: Uint128) -> StdResult<RedeemPreviewResponse> {
    let genesis = GENESIS.load(deps.storage)?;
    let weeks = weeks_since_launch(genesis.launch_time, env.block.time.seconds());
    let breakdown = redeem_breakdown(amount, weeks).map_err(to_std)?;
    Ok(RedeemPreviewResponse {
        weeks_since_launch: weeks,
        base_amount: breakdown.base_amount,
        speed_bonus: breakdown.speed_bonus,
        redeem_amount: breakdown.redeem_amount,
        referral_reward: referral_reward(breakdown.redeem_amount),
    })
}

// ============================================================================
// Staking Queries
// ============================================================================

fn stake_response(index: usize, stake: &Stake) -> StakeResponse {
    StakeResponse {
        index: index as u32,
        amount: stake.amount,
        stake_time: stake.stake_time,
        unlock_time: stake.unlock_time,
        total_staked_coins_at_start: stake.total_staked_coins_at_start,
        total_supply_at_start: stake.total_supply_at_start,
    }
}

fn load_stake(deps: Deps, staker: &str, index: u32) -> StdResult<Stake> {
    let addr = deps.api.addr_validate(staker)?;
    let stakes = STAKES.may_load(deps.storage, &addr)?.unwrap_or_default();
    stakes.get(index as usize).cloned().ok_or_else(|| {
        to_std(ContractError::NoSuchStake {
            staker: addr.to_string(),
            index,
        })
    })
}

pub fn query_stake(deps: Deps, staker: String, index: u32) -> StdResult<StakeResponse> {
    let stake = load_stake(deps, &staker, index)?;
    Ok(stake_response(index as usize, &stake))
}

pub fn query_stakes(deps: Deps, staker: String) -> StdResult<StakesResponse> {
    let addr = deps.api.addr_validate(&staker)?;
    let stakes = STAKES
        .may_load(deps.storage, &addr)?
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, stake)| stake_response(i, stake))
        .collect();
    Ok(StakesResponse { stakes })
}

pub fn query_account_staked(deps: Deps, staker: String) -> StdResult<AccountStakedResponse> {
    let addr = deps.api.addr_validate(&staker)?;
    let stakes = STAKES.may_load(deps.storage, &addr)?.unwrap_or_default();
    let mut amount = Uint128::zero();
    for stake in &stakes {
        amount = amount.checked_add(stake.amount)?;
    }
    Ok(AccountStakedResponse {
        staker: addr,
        amount,
    })
}

pub fn query_total_staked_coins(deps: Deps) -> StdResult<TotalStakedCoinsResponse> {
    Ok(TotalStakedCoinsResponse {
        amount: TOTAL_STAKED.may_load(deps.storage)?.unwrap_or_default(),
    })
}

pub fn query_interest_rate_percent() -> StdResult<InterestRatePercentResponse> {
    Ok(InterestRatePercentResponse {
        percent: INTEREST_RATE_PERCENT,
    })
}

/// Rewards a claim would pay now. Unrecorded weeks contribute nothing to the satoshi reward.
pub fn query_staking_rewards(
    deps: Deps,
    env: Env,
    staker: String,
    index: u32,
) -> StdResult<StakingRewardsResponse> {
    let stake = load_stake(deps, &staker, index)?;
    let genesis = GENESIS.load(deps.storage)?;
    let redemption = REDEMPTION.load(deps.storage)?;
    let rewards = stake_rewards(deps.storage, &genesis, &redemption, &stake).map_err(to_std)?;
    let additional = rewards.additional().map_err(to_std)?;

    Ok(StakingRewardsResponse {
        amount: stake.amount,
        staking: rewards.staking,
        satoshi: rewards.satoshi,
        viral: rewards.viral,
        crit_mass: rewards.crit_mass,
        additional,
        matured: env.block.time.seconds() >= stake.unlock_time,
    })
}

pub fn query_compound(principal: Uint128, periods: u64, rate: u64) -> StdResult<CompoundResponse> {
    let amount = compound(principal, periods, rate).map_err(to_std)?;
    Ok(CompoundResponse { amount })
}
