//! BitcoinHex Contract - Snapshot Redemption and Time-Locked Staking
//!
//! A CW20 token whose supply is created by redeeming entries of an external
//! UTXO snapshot and grown by compounding stakes.
//!
//! # Redemption Flow
//! 1. Holder signs `sha256("BitcoinHex claim:" ‖ recipient)` with the snapshot key
//! 2. Recipient submits `Redeem` with the key, signature, satoshi amount and merkle proof
//! 3. Contract checks the signature, rebuilds the leaf from the key's hash160 and
//!    amount, verifies the proof and mints the decayed amount plus speed bonus
//!
//! # Staking Flow
//! 1. `StartStake` burns tokens into a position locked for 1 to 365 days
//! 2. After unlock anyone may claim; the staker receives principal, compound
//!    interest and the satoshi/viral/crit-mass bonuses
//!
//! Weekly snapshots of the unclaimed pool (first 50 weeks) feed the satoshi bonus.

pub mod address;
pub mod compound;
pub mod contract;
pub mod error;
mod execute;
pub mod ledger;
pub mod msg;
mod query;
pub mod redemption;
pub mod rewards;
pub mod state;
pub mod weeks;

pub use crate::error::ContractError;
pub use crate::compound::compound;
