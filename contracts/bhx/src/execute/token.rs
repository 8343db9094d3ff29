//! CW20 transfer surface, delegated to cw20-base.
//!
//! Transfers into the token contract's own address are rejected; nothing can
//! move tokens back out of it.

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response, Uint128};
use cw20::Expiration;
use cw20_base::allowances;
use cw20_base::contract as cw20_contract;

use crate::error::ContractError;

pub fn execute_transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    ensure_not_contract(&deps, &env, &recipient)?;
    Ok(cw20_contract::execute_transfer(deps, env, info, recipient, amount)?)
}

pub fn execute_send(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    contract: String,
    amount: Uint128,
    msg: Binary,
) -> Result<Response, ContractError> {
    ensure_not_contract(&deps, &env, &contract)?;
    Ok(cw20_contract::execute_send(deps, env, info, contract, amount, msg)?)
}

/// Burn through the CW20 path; supply shrinks the same way a stake does.
pub fn execute_burn(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    Ok(cw20_contract::execute_burn(deps, env, info, amount)?)
}

pub fn execute_increase_allowance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    spender: String,
    amount: Uint128,
    expires: Option<Expiration>,
) -> Result<Response, ContractError> {
    Ok(allowances::execute_increase_allowance(
        deps, env, info, spender, amount, expires,
    )?)
}

pub fn execute_decrease_allowance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    spender: String,
    amount: Uint128,
    expires: Option<Expiration>,
) -> Result<Response, ContractError> {
    Ok(allowances::execute_decrease_allowance(
        deps, env, info, spender, amount, expires,
    )?)
}

pub fn execute_transfer_from(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    ensure_not_contract(&deps, &env, &recipient)?;
    Ok(allowances::execute_transfer_from(
        deps, env, info, owner, recipient, amount,
    )?)
}

fn ensure_not_contract(deps: &DepsMut, env: &Env, recipient: &str) -> Result<(), ContractError> {
    let recipient = deps.api.addr_validate(recipient)?;
    if recipient == env.contract.address {
        return Err(ContractError::TransferToContract);
    }
    Ok(())
}
