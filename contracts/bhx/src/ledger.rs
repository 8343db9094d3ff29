//! Mint and burn over the cw20-base balance and supply storage.
//!
//! The contract is its own minter: redemption and stake claims create supply,
//! opening a stake destroys it. Both paths keep `TOKEN_INFO.total_supply` equal
//! to the sum of `BALANCES`.

use cosmwasm_std::{Addr, Storage, Uint128};
use cw20_base::state::{BALANCES, TOKEN_INFO};

use crate::error::ContractError;

/// Credit `amount` new tokens to `recipient`.
pub fn mint(storage: &mut dyn Storage, recipient: &Addr, amount: Uint128) -> Result<(), ContractError> {
    if amount.is_zero() {
        return Ok(());
    }

    let mut info = TOKEN_INFO.load(storage)?;
    info.total_supply = info.total_supply.checked_add(amount)?;
    TOKEN_INFO.save(storage, &info)?;

    let balance = BALANCES.may_load(storage, recipient)?.unwrap_or_default();
    BALANCES.save(storage, recipient, &balance.checked_add(amount)?)?;
    Ok(())
}

/// Destroy `amount` tokens held by `owner`.
pub fn burn(storage: &mut dyn Storage, owner: &Addr, amount: Uint128) -> Result<(), ContractError> {
    let balance = BALANCES.may_load(storage, owner)?.unwrap_or_default();
    if balance < amount {
        return Err(ContractError::InsufficientBalance {
            balance,
            required: amount,
        });
    }
    BALANCES.save(storage, owner, &(balance - amount))?;

    let mut info = TOKEN_INFO.load(storage)?;
    info.total_supply = info.total_supply.checked_sub(amount)?;
    TOKEN_INFO.save(storage, &info)?;
    Ok(())
}

pub fn balance(storage: &dyn Storage, owner: &Addr) -> Result<Uint128, ContractError> {
    Ok(BALANCES.may_load(storage, owner)?.unwrap_or_default())
}

pub fn total_supply(storage: &dyn Storage) -> Result<Uint128, ContractError> {
    Ok(TOKEN_INFO.load(storage)?.total_supply)
}
