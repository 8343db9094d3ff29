//! Snapshot redemption handlers.
//!
//! A redemption proves two things at once: the sender controls the snapshot key
//! (signature over the sender's claim message) and the key's pubkey hash owns
//! `amount` satoshis in the snapshot (merkle proof). Each leaf redeems once.

use cosmwasm_std::{Addr, Binary, DepsMut, Env, Event, MessageInfo, Response, Uint128};

use common::hash::{bytes20_to_hex, bytes32_to_hex};
use common::merkle::verify_slices;

use crate::address::{derive_external_address, parse_pub_key, utxo_leaf, verify_claim};
use crate::error::ContractError;
use crate::ledger::mint;
use crate::redemption::{redeem_breakdown, referral_reward};
use crate::state::{GENESIS, REDEEMED, REDEMPTION};
use crate::weeks::{store_week_data, weeks_since_launch};

/// Redeem a snapshot entry, optionally crediting a referrer.
#[allow(clippy::too_many_arguments)]
pub fn execute_redeem(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
    proof: Vec<Binary>,
    pub_key: Binary,
    signature: Binary,
    referrer: Option<String>,
) -> Result<Response, ContractError> {
    let genesis = GENESIS.load(deps.storage)?;
    let now = env.block.time.seconds();
    if now < genesis.launch_time {
        return Err(ContractError::NotYetLaunched {
            launch_time: genesis.launch_time,
        });
    }

    let referrer = match referrer {
        Some(referrer) => Some(validate_referrer(&deps, &info.sender, &referrer)?),
        None => None,
    };

    store_week_data(deps.storage, now)?;

    // Key ownership
    let key = parse_pub_key(&pub_key)?;
    if !verify_claim(deps.api, &pub_key, info.sender.as_str(), &signature)? {
        return Err(ContractError::SignatureMismatch);
    }

    // Snapshot membership
    let external_address = derive_external_address(&key);
    let leaf = utxo_leaf(&external_address, amount);
    if !verify_slices(&leaf, &proof, &genesis.root_hash) {
        return Err(ContractError::InvalidProof);
    }
    if REDEEMED.has(deps.storage, leaf.as_slice()) {
        return Err(ContractError::AlreadyRedeemed {
            leaf: bytes32_to_hex(&leaf),
        });
    }

    let weeks = weeks_since_launch(genesis.launch_time, now);
    let breakdown = redeem_breakdown(amount, weeks)?;

    let mut redemption = REDEMPTION.load(deps.storage)?;
    let total_redeemed = redemption
        .total_redeemed
        .checked_add(breakdown.redeem_amount)?;
    if total_redeemed > genesis.maximum_redeemable {
        return Err(ContractError::MaximumRedeemableExceeded {
            maximum: genesis.maximum_redeemable,
        });
    }

    mint(deps.storage, &info.sender, breakdown.redeem_amount)?;
    mint(deps.storage, &genesis.origin, breakdown.speed_bonus)?;
    let referral = match &referrer {
        Some(referrer) => {
            let reward = referral_reward(breakdown.redeem_amount);
            mint(deps.storage, referrer, reward)?;
            reward
        }
        None => Uint128::zero(),
    };

    REDEEMED.save(deps.storage, leaf.as_slice(), &true)?;
    redemption.total_redeemed = total_redeemed;
    redemption.redeemed_count += 1;
    REDEMPTION.save(deps.storage, &redemption)?;

    let leaf_hex = bytes32_to_hex(&leaf);
    let referrer_attr = referrer
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_default();

    let event = Event::new("redeem")
        .add_attribute("redeemer", info.sender.as_str())
        .add_attribute("leaf", leaf_hex.clone())
        .add_attribute("satoshis", amount.to_string())
        .add_attribute("redeem_amount", breakdown.redeem_amount.to_string())
        .add_attribute("speed_bonus", breakdown.speed_bonus.to_string())
        .add_attribute("referral_reward", referral.to_string());

    Ok(Response::new()
        .add_event(event)
        .add_attribute("action", "redeem")
        .add_attribute("redeemer", info.sender)
        .add_attribute("external_address", bytes20_to_hex(&external_address))
        .add_attribute("leaf", leaf_hex)
        .add_attribute("weeks_since_launch", weeks.to_string())
        .add_attribute("base_amount", breakdown.base_amount.to_string())
        .add_attribute("speed_bonus", breakdown.speed_bonus.to_string())
        .add_attribute("redeem_amount", breakdown.redeem_amount.to_string())
        .add_attribute("referrer", referrer_attr)
        .add_attribute("referral_reward", referral.to_string())
        .add_attribute("total_redeemed", redemption.total_redeemed.to_string())
        .add_attribute("redeemed_count", redemption.redeemed_count.to_string()))
}

/// Advance weekly accounting without redeeming.
pub fn execute_store_week_data(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let recorded = store_week_data(deps.storage, env.block.time.seconds())?;
    let redemption = REDEMPTION.load(deps.storage)?;

    Ok(Response::new()
        .add_attribute("action", "store_week_data")
        .add_attribute("weeks_recorded", recorded.to_string())
        .add_attribute("last_updated_week", redemption.last_updated_week.to_string()))
}

/// Referrer must be a valid account other than the redeemer.
fn validate_referrer(
    deps: &DepsMut,
    sender: &Addr,
    referrer: &str,
) -> Result<Addr, ContractError> {
    if referrer.is_empty() || referrer == sender.as_str() {
        return Err(ContractError::SelfOrZeroReferrer);
    }
    let referrer = deps.api.addr_validate(referrer)?;
    if &referrer == sender {
        return Err(ContractError::SelfOrZeroReferrer);
    }
    Ok(referrer)
}
