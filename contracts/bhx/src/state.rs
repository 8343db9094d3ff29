//! State definitions for the BitcoinHex contract
//!
//! Token balances and total supply live in `cw20-base` storage
//! (`cw20_base::state::{BALANCES, TOKEN_INFO}`); everything below is the
//! redemption and staking bookkeeping layered on top of it.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Genesis & Redemption
// ============================================================================

/// Immutable parameters fixed at instantiation
#[cw_serde]
pub struct Genesis {
    /// Account receiving speed bonuses and mirrored staking bonuses
    pub origin: Addr,
    /// Seconds since epoch; redemption and staking open at this time
    pub launch_time: u64,
    /// Root of the sorted-pair merkle tree over snapshot leaves
    pub root_hash: [u8; 32],
    /// Ceiling on `RedemptionState::total_redeemed` (token precision)
    pub maximum_redeemable: Uint128,
    /// Circulating supply of the external chain at the snapshot block
    pub total_external_circulation_at_fork: Uint128,
}

/// Mutable redemption counters
#[cw_serde]
pub struct RedemptionState {
    /// Sum of every `redeem_amount` credited to redeemers
    pub total_redeemed: Uint128,
    /// Number of snapshot entries redeemed
    pub redeemed_count: u64,
    /// Weeks since launch already snapshotted into `UNCLAIMED_COINS` (max 50)
    pub last_updated_week: u64,
}

// ============================================================================
// Staking
// ============================================================================

/// A time-locked stake position
#[cw_serde]
pub struct Stake {
    /// Tokens burned from the staker's balance when the stake opened
    pub amount: Uint128,
    /// Block time the stake opened
    pub stake_time: u64,
    /// Earliest block time the stake can be claimed
    pub unlock_time: u64,
    /// `TOTAL_STAKED` when the stake opened
    pub total_staked_coins_at_start: Uint128,
    /// Token total supply when the stake opened
    pub total_supply_at_start: Uint128,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:bitcoinhex";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const TOKEN_NAME: &str = "BitcoinHex";
pub const TOKEN_SYMBOL: &str = "BHX";
pub const TOKEN_DECIMALS: u8 = 18;

/// Satoshi (8 decimals) to token (18 decimals) scale
pub const SATOSHI_TO_TOKEN: u128 = 10_000_000_000;

/// Length of one week in seconds
pub const WEEK_SECONDS: u64 = 7 * 86_400;

/// Number of weeks in the bonus period
pub const BONUS_WEEKS: u64 = 50;

/// Length of one interest period in seconds (1 day)
pub const INTEREST_PERIOD_SECONDS: u64 = 86_400;

/// Shortest allowed stake: one interest period
pub const MIN_STAKE_SECONDS: u64 = INTEREST_PERIOD_SECONDS;

/// Longest allowed stake: 365 interest periods
pub const MAX_STAKE_SECONDS: u64 = 365 * INTEREST_PERIOD_SECONDS;

/// Stakes must strictly exceed one unit of compounding precision
pub const MIN_STAKE_AMOUNT: u128 = 10_000_000_000;

/// Base interest rate per period, in percent
pub const INTEREST_RATE_PERCENT: u64 = 1;

/// Maximum stakes settled by a single bulk claim
pub const MAX_STAKES_PER_CLAIM: usize = 42;

// ============================================================================
// Storage
// ============================================================================

/// Genesis parameters
pub const GENESIS: Item<Genesis> = Item::new("genesis");

/// Redemption counters
pub const REDEMPTION: Item<RedemptionState> = Item::new("redemption");

/// Unclaimed pool recorded as each bonus week was crossed
/// Key: week index (0..50), Value: maximum_redeemable - total_redeemed
pub const UNCLAIMED_COINS: Map<u64, Uint128> = Map::new("unclaimed_coins");

/// Consumed snapshot leaves
/// Key: 32-byte leaf hash, Value: always true
pub const REDEEMED: Map<&[u8], bool> = Map::new("redeemed");

/// Per-account stake list. Removal swaps the last stake into the freed index.
pub const STAKES: Map<&Addr, Vec<Stake>> = Map::new("stakes");

/// Sum of all open stake amounts
pub const TOTAL_STAKED: Item<Uint128> = Item::new("total_staked");
