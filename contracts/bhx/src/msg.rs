//! Message types for the BitcoinHex contract
//!
//! Redemption and staking messages, plus the subset of the CW20 surface this
//! token exposes. Satoshi amounts (`Redeem::amount`, `RedeemPreview::amount`)
//! use 8 decimals; every other amount is in token precision (18 decimals).

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};
use cw20::{AllowanceResponse, BalanceResponse, Cw20Coin, Expiration, TokenInfoResponse};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message: the immutable genesis parameters
#[cw_serde]
pub struct InstantiateMsg {
    /// Account receiving speed bonuses and mirrored staking bonuses
    pub origin: String,
    /// Seconds since epoch at which redemption and staking open
    pub launch_time: u64,
    /// Root of the snapshot merkle tree (32 bytes)
    pub root_hash: Binary,
    /// Ceiling on total redeemed tokens, bonus included. Use
    /// `redemption::maximum_redeemable_for` over the snapshot so every entry
    /// fits; the bare snapshot total leaves no room for speed bonuses.
    pub maximum_redeemable: Uint128,
    /// Snapshot-chain circulating supply at the fork block
    pub total_external_circulation_at_fork: Uint128,
    /// Genesis allocation, minted at instantiation
    pub initial_balances: Vec<Cw20Coin>,
}

// ============================================================================
// Execute Messages
// ============================================================================

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Redemption
    // ========================================================================
    /// Redeem a snapshot entry to the sender
    Redeem {
        /// Satoshi amount committed in the snapshot leaf
        amount: Uint128,
        /// Sibling hashes from leaf to root (32 bytes each)
        proof: Vec<Binary>,
        /// Snapshot key, 65-byte uncompressed or 64-byte raw
        pub_key: Binary,
        /// 65-byte `r ‖ s ‖ v` signature over the sender's claim message
        signature: Binary,
    },

    /// Redeem with a referrer who receives 5% of the redeemed amount
    RedeemReferred {
        amount: Uint128,
        proof: Vec<Binary>,
        pub_key: Binary,
        signature: Binary,
        referrer: String,
    },

    /// Snapshot the unclaimed pool for every week crossed since the last call
    StoreWeekData {},

    // ========================================================================
    // Staking
    // ========================================================================
    /// Burn `amount` from the sender into a new stake locked until `unlock_time`
    StartStake { amount: Uint128, unlock_time: u64 },

    /// Claim one matured stake. Moves the last stake into `index`.
    ClaimStakingReward { staker: String, index: u32 },

    /// Claim every stake of `staker`; fails if any is immature
    ClaimAllStakingRewards { staker: String },

    /// Claim up to `limit` matured stakes, skipping immature ones
    ClaimStakingRewardsPage { staker: String, limit: Option<u32> },

    // ========================================================================
    // CW20
    // ========================================================================
    Transfer {
        recipient: String,
        amount: Uint128,
    },
    Send {
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
    Burn {
        amount: Uint128,
    },
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    DecreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    TransferFrom {
        owner: String,
        recipient: String,
        amount: Uint128,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ========================================================================
    // Redemption
    // ========================================================================
    /// Returns the genesis parameters
    #[returns(GenesisResponse)]
    Genesis {},

    /// Returns redemption counters
    #[returns(RedemptionStateResponse)]
    RedemptionState {},

    /// Returns the unclaimed pool recorded for a bonus week
    #[returns(UnclaimedCoinsResponse)]
    UnclaimedCoins { week: u64 },

    /// Checks a leaf against the root without mutating anything
    #[returns(CanRedeemResponse)]
    CanRedeem { leaf: Binary, proof: Vec<Binary> },

    /// Same as `CanRedeem` with the leaf built from a pubkey hash and satoshi amount
    #[returns(CanRedeemResponse)]
    CanRedeemUtxo {
        external_address: Binary,
        amount: Uint128,
        proof: Vec<Binary>,
    },

    #[returns(IsRedeemedResponse)]
    IsRedeemed { leaf: Binary },

    /// Both address forms of a snapshot key
    #[returns(DerivedAddressesResponse)]
    DerivedAddresses { pub_key: Binary },

    /// Checks a claim signature without redeeming
    #[returns(VerifyClaimResponse)]
    VerifyClaim {
        pub_key: Binary,
        claimer: String,
        signature: Binary,
    },

    /// What redeeming `amount` satoshis would pay right now
    #[returns(RedeemPreviewResponse)]
    RedeemPreview { amount: Uint128 },

    // ========================================================================
    // Staking
    // ========================================================================
    #[returns(StakeResponse)]
    Stake { staker: String, index: u32 },

    #[returns(StakesResponse)]
    Stakes { staker: String },

    /// Sum of open stake amounts for one account
    #[returns(AccountStakedResponse)]
    AccountStaked { staker: String },

    #[returns(TotalStakedCoinsResponse)]
    TotalStakedCoins {},

    #[returns(InterestRatePercentResponse)]
    InterestRatePercent {},

    /// Reward breakdown a claim of this stake would pay
    #[returns(StakingRewardsResponse)]
    StakingRewards { staker: String, index: u32 },

    /// Evaluates the compounding engine directly
    #[returns(CompoundResponse)]
    Compound {
        principal: Uint128,
        periods: u64,
        rate: u64,
    },

    // ========================================================================
    // CW20
    // ========================================================================
    #[returns(BalanceResponse)]
    Balance { address: String },

    #[returns(TokenInfoResponse)]
    TokenInfo {},

    #[returns(AllowanceResponse)]
    Allowance { owner: String, spender: String },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct GenesisResponse {
    pub origin: Addr,
    pub launch_time: u64,
    pub root_hash: Binary,
    pub maximum_redeemable: Uint128,
    pub total_external_circulation_at_fork: Uint128,
}

#[cw_serde]
pub struct RedemptionStateResponse {
    pub total_redeemed: Uint128,
    pub redeemed_count: u64,
    pub maximum_redeemable: Uint128,
    pub last_updated_week: u64,
    /// Weeks since launch at the current block, capped at 50
    pub weeks_since_launch: u64,
}

#[cw_serde]
pub struct UnclaimedCoinsResponse {
    pub week: u64,
    pub amount: Uint128,
}

#[cw_serde]
pub struct CanRedeemResponse {
    pub leaf: Binary,
    /// Proof verifies against the genesis root
    pub valid_proof: bool,
    /// Leaf has already been consumed
    pub redeemed: bool,
}

#[cw_serde]
pub struct IsRedeemedResponse {
    pub redeemed: bool,
}

#[cw_serde]
pub struct DerivedAddressesResponse {
    /// 20-byte hash160 of the compressed key
    pub external_address: Binary,
    /// Base58check P2PKH rendering of `external_address`
    pub external_address_p2pkh: String,
    /// `0x`-prefixed EVM-style address
    pub local_address: String,
}

#[cw_serde]
pub struct VerifyClaimResponse {
    pub valid: bool,
}

#[cw_serde]
pub struct RedeemPreviewResponse {
    pub weeks_since_launch: u64,
    pub base_amount: Uint128,
    pub speed_bonus: Uint128,
    /// Credited to the redeemer
    pub redeem_amount: Uint128,
    /// Credited to a referrer, if any
    pub referral_reward: Uint128,
}

#[cw_serde]
pub struct StakeResponse {
    pub index: u32,
    pub amount: Uint128,
    pub stake_time: u64,
    pub unlock_time: u64,
    pub total_staked_coins_at_start: Uint128,
    pub total_supply_at_start: Uint128,
}

#[cw_serde]
pub struct StakesResponse {
    pub stakes: Vec<StakeResponse>,
}

#[cw_serde]
pub struct AccountStakedResponse {
    pub staker: Addr,
    pub amount: Uint128,
}

#[cw_serde]
pub struct TotalStakedCoinsResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct InterestRatePercentResponse {
    pub percent: u64,
}

#[cw_serde]
pub struct StakingRewardsResponse {
    pub amount: Uint128,
    pub staking: Uint128,
    pub satoshi: Uint128,
    pub viral: Uint128,
    pub crit_mass: Uint128,
    /// `satoshi + viral + crit_mass`, paid to the staker and again to origin
    pub additional: Uint128,
    pub matured: bool,
}

#[cw_serde]
pub struct CompoundResponse {
    pub amount: Uint128,
}
