//! Execute handlers for the BitcoinHex contract.
//!
//! - `redeem` - snapshot redemption and weekly accounting
//! - `stake` - opening and claiming stakes
//! - `token` - CW20 transfer surface

mod redeem;
mod stake;
mod token;

pub use redeem::*;
pub use stake::*;
pub use token::*;
