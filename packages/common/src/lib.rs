//! Common - Hashing and Merkle Utilities for BitcoinHex Contracts
//!
//! This package holds the pure, chain-agnostic pieces shared by the contract
//! and by off-chain snapshot tooling: keccak/sha256/hash160 helpers, Bitcoin
//! address encoding, and the sorted-pair merkle tree.

pub mod hash;
pub mod merkle;

pub use hash::{bytes20_to_hex, bytes32_to_hex, hash160, keccak256, p2pkh_address, sha256};
pub use merkle::MerkleTree;
