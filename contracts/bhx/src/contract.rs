//! BitcoinHex Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    Uint128,
};
use cw2::set_contract_version;
use cw20_base::contract::{query_balance, query_token_info};
use cw20_base::allowances::query_allowance;
use cw20_base::state::{TokenInfo, TOKEN_INFO};

use common::hash::bytes32_to_hex;

use crate::error::ContractError;
use crate::execute::{
    execute_burn, execute_claim_all_staking_rewards, execute_claim_staking_reward,
    execute_claim_staking_rewards_page, execute_decrease_allowance, execute_increase_allowance,
    execute_redeem, execute_send, execute_start_stake, execute_store_week_data, execute_transfer,
    execute_transfer_from,
};
use crate::ledger::mint;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_account_staked, query_can_redeem, query_can_redeem_utxo, query_compound,
    query_derived_addresses, query_genesis, query_interest_rate_percent, query_is_redeemed,
    query_redeem_preview, query_redemption_state, query_stake, query_stakes,
    query_staking_rewards, query_total_staked_coins, query_unclaimed_coins, query_verify_claim,
};
use crate::state::{
    Genesis, RedemptionState, CONTRACT_NAME, CONTRACT_VERSION, GENESIS, REDEMPTION,
    TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL, TOTAL_STAKED,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let origin = deps.api.addr_validate(&msg.origin)?;
    let root_hash: [u8; 32] = msg.root_hash.as_slice().try_into().map_err(|_| {
        ContractError::InvalidHashLength {
            got: msg.root_hash.len(),
        }
    })?;

    let genesis = Genesis {
        origin,
        launch_time: msg.launch_time,
        root_hash,
        maximum_redeemable: msg.maximum_redeemable,
        total_external_circulation_at_fork: msg.total_external_circulation_at_fork,
    };
    GENESIS.save(deps.storage, &genesis)?;

    REDEMPTION.save(
        deps.storage,
        &RedemptionState {
            total_redeemed: Uint128::zero(),
            redeemed_count: 0,
            last_updated_week: 0,
        },
    )?;
    TOTAL_STAKED.save(deps.storage, &Uint128::zero())?;

    // The contract mints for itself; no external minter
    TOKEN_INFO.save(
        deps.storage,
        &TokenInfo {
            name: TOKEN_NAME.to_string(),
            symbol: TOKEN_SYMBOL.to_string(),
            decimals: TOKEN_DECIMALS,
            total_supply: Uint128::zero(),
            mint: None,
        },
    )?;

    let mut initial_supply = Uint128::zero();
    for coin in msg.initial_balances {
        let address = deps.api.addr_validate(&coin.address)?;
        mint(deps.storage, &address, coin.amount)?;
        initial_supply = initial_supply.checked_add(coin.amount)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("origin", genesis.origin)
        .add_attribute("launch_time", genesis.launch_time.to_string())
        .add_attribute("root_hash", bytes32_to_hex(&genesis.root_hash))
        .add_attribute("maximum_redeemable", genesis.maximum_redeemable)
        .add_attribute("initial_supply", initial_supply))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Redemption
        ExecuteMsg::Redeem {
            amount,
            proof,
            pub_key,
            signature,
        } => execute_redeem(deps, env, info, amount, proof, pub_key, signature, None),
        ExecuteMsg::RedeemReferred {
            amount,
            proof,
            pub_key,
            signature,
            referrer,
        } => execute_redeem(
            deps,
            env,
            info,
            amount,
            proof,
            pub_key,
            signature,
            Some(referrer),
        ),
        ExecuteMsg::StoreWeekData {} => execute_store_week_data(deps, env),

        // Staking
        ExecuteMsg::StartStake {
            amount,
            unlock_time,
        } => execute_start_stake(deps, env, info, amount, unlock_time),
        ExecuteMsg::ClaimStakingReward { staker, index } => {
            execute_claim_staking_reward(deps, env, staker, index)
        }
        ExecuteMsg::ClaimAllStakingRewards { staker } => {
            execute_claim_all_staking_rewards(deps, env, staker)
        }
        ExecuteMsg::ClaimStakingRewardsPage { staker, limit } => {
            execute_claim_staking_rewards_page(deps, env, staker, limit)
        }

        // CW20
        ExecuteMsg::Transfer { recipient, amount } => {
            execute_transfer(deps, env, info, recipient, amount)
        }
        ExecuteMsg::Send {
            contract,
            amount,
            msg,
        } => execute_send(deps, env, info, contract, amount, msg),
        ExecuteMsg::Burn { amount } => execute_burn(deps, env, info, amount),
        ExecuteMsg::IncreaseAllowance {
            spender,
            amount,
            expires,
        } => execute_increase_allowance(deps, env, info, spender, amount, expires),
        ExecuteMsg::DecreaseAllowance {
            spender,
            amount,
            expires,
        } => execute_decrease_allowance(deps, env, info, spender, amount, expires),
        ExecuteMsg::TransferFrom {
            owner,
            recipient,
            amount,
        } => execute_transfer_from(deps, env, info, owner, recipient, amount),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Redemption
        QueryMsg::Genesis {} => to_json_binary(&query_genesis(deps)?),
        QueryMsg::RedemptionState {} => to_json_binary(&query_redemption_state(deps, env)?),
        QueryMsg::UnclaimedCoins { week } => to_json_binary(&query_unclaimed_coins(deps, week)?),
        QueryMsg::CanRedeem { leaf, proof } => {
            to_json_binary(&query_can_redeem(deps, leaf, proof)?)
        }
        QueryMsg::CanRedeemUtxo {
            external_address,
            amount,
            proof,
        } => to_json_binary(&query_can_redeem_utxo(
            deps,
            external_address,
            amount,
            proof,
        )?),
        QueryMsg::IsRedeemed { leaf } => to_json_binary(&query_is_redeemed(deps, leaf)?),
        QueryMsg::DerivedAddresses { pub_key } => {
            to_json_binary(&query_derived_addresses(pub_key)?)
        }
        QueryMsg::VerifyClaim {
            pub_key,
            claimer,
            signature,
        } => to_json_binary(&query_verify_claim(deps, pub_key, claimer, signature)?),
        QueryMsg::RedeemPreview { amount } => {
            to_json_binary(&query_redeem_preview(deps, env, amount)?)
        }

        // Staking
        QueryMsg::Stake { staker, index } => to_json_binary(&query_stake(deps, staker, index)?),
        QueryMsg::Stakes { staker } => to_json_binary(&query_stakes(deps, staker)?),
        QueryMsg::AccountStaked { staker } => {
            to_json_binary(&query_account_staked(deps, staker)?)
        }
        QueryMsg::TotalStakedCoins {} => to_json_binary(&query_total_staked_coins(deps)?),
        QueryMsg::InterestRatePercent {} => to_json_binary(&query_interest_rate_percent()?),
        QueryMsg::StakingRewards { staker, index } => {
            to_json_binary(&query_staking_rewards(deps, env, staker, index)?)
        }
        QueryMsg::Compound {
            principal,
            periods,
            rate,
        } => to_json_binary(&query_compound(principal, periods, rate)?),

        // CW20
        QueryMsg::Balance { address } => to_json_binary(&query_balance(deps, address)?),
        QueryMsg::TokenInfo {} => to_json_binary(&query_token_info(deps)?),
        QueryMsg::Allowance { owner, spender } => {
            to_json_binary(&query_allowance(deps, owner, spender)?)
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
