//! Error types for the BitcoinHex contract

use cosmwasm_std::{
    ConversionOverflowError, DivideByZeroError, OverflowError, StdError, Uint128,
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Cw20(#[from] cw20_base::ContractError),

    // ========================================================================
    // Redemption Errors
    // ========================================================================

    #[error("Contract has not launched: launch at {launch_time}")]
    NotYetLaunched { launch_time: u64 },

    #[error("Invalid merkle proof for snapshot entry")]
    InvalidProof,

    #[error("Snapshot entry already redeemed: {leaf}")]
    AlreadyRedeemed { leaf: String },

    #[error("Referrer must not be the redeemer or the zero address")]
    SelfOrZeroReferrer,

    #[error("Redemption would exceed maximum redeemable: {maximum}")]
    MaximumRedeemableExceeded { maximum: Uint128 },

    // ========================================================================
    // Signature Errors
    // ========================================================================

    #[error("Signature does not match public key for claimer")]
    SignatureMismatch,

    #[error("Invalid public key: expected 64 or 65 bytes, got {got}")]
    InvalidPublicKey { got: usize },

    #[error("Invalid signature length: expected 65 bytes, got {got}")]
    InvalidSignatureLength { got: usize },

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },

    // ========================================================================
    // Transfer Errors
    // ========================================================================

    #[error("Cannot transfer tokens to the token contract itself")]
    TransferToContract,

    // ========================================================================
    // Staking Errors
    // ========================================================================

    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: Uint128, required: Uint128 },

    #[error("Stake amount must exceed {minimum}")]
    StakeBelowMinimum { minimum: Uint128 },

    #[error("Stake duration out of range: {duration} seconds (allowed {min}..={max})")]
    StakeDurationOutOfRange { duration: u64, min: u64, max: u64 },

    #[error("Stake not matured: unlocks at {unlock_time}")]
    NotYetMatured { unlock_time: u64 },

    #[error("No stake at index {index} for {staker}")]
    NoSuchStake { staker: String, index: u32 },

    #[error("Compute budget exhausted: {stakes} stakes exceeds limit of {limit} per call")]
    ComputeBudgetExhausted { stakes: usize, limit: usize },

    // ========================================================================
    // Arithmetic Errors
    // ========================================================================

    #[error("Arithmetic overflow: checked multiplication exceeded ceiling")]
    ArithmeticOverflow,
}

impl From<OverflowError> for ContractError {
    fn from(_: OverflowError) -> Self {
        ContractError::ArithmeticOverflow
    }
}

impl From<ConversionOverflowError> for ContractError {
    fn from(_: ConversionOverflowError) -> Self {
        ContractError::ArithmeticOverflow
    }
}

impl From<DivideByZeroError> for ContractError {
    fn from(_: DivideByZeroError) -> Self {
        ContractError::ArithmeticOverflow
    }
}
