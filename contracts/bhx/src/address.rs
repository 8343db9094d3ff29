//! Signature/address bridge between the snapshot chain and this ledger
//!
//! One secp256k1 key maps to two address spaces:
//!
//! ```text
//! external = hash160(sec1_compressed(x ‖ y))        (Bitcoin pubkey hash)
//! local    = keccak256(x ‖ y)[12..32]                (EVM-style address)
//! ```
//!
//! A claim signature is produced by the snapshot key over
//! `sha256("BitcoinHex claim:" ‖ claimer)`, where `claimer` is the address
//! that will receive the redeemed tokens. Verification recovers the signer and
//! compares its local address with the one derived from the supplied key.

use cosmwasm_std::{Api, Uint128};

use common::hash::{hash160, keccak256, sha256};

use crate::error::ContractError;

/// Domain prefix of every claim message
pub const CLAIM_MESSAGE_PREFIX: &[u8] = b"BitcoinHex claim:";

/// Accept `0x04 ‖ x ‖ y` or raw `x ‖ y`; returns the 64-byte `x ‖ y`.
pub fn parse_pub_key(pub_key: &[u8]) -> Result<[u8; 64], ContractError> {
    let raw = match pub_key.len() {
        65 if pub_key[0] == 0x04 => &pub_key[1..],
        64 => pub_key,
        got => return Err(ContractError::InvalidPublicKey { got }),
    };
    let mut key = [0u8; 64];
    key.copy_from_slice(raw);
    Ok(key)
}

/// SEC1 compressed form: `0x02 | 0x03` by parity of `y`, then `x`.
pub fn compress_pub_key(key: &[u8; 64]) -> [u8; 33] {
    let mut compressed = [0u8; 33];
    compressed[0] = if key[63] & 1 == 0 { 0x02 } else { 0x03 };
    compressed[1..].copy_from_slice(&key[..32]);
    compressed
}

/// Bitcoin pubkey hash of the compressed key.
pub fn derive_external_address(key: &[u8; 64]) -> [u8; 20] {
    hash160(&compress_pub_key(key))
}

/// Last 20 bytes of `keccak256(x ‖ y)`.
pub fn derive_local_address(key: &[u8; 64]) -> [u8; 20] {
    let hash = keccak256(key);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Message hash a snapshot key signs to bind a claim to `claimer`.
pub fn claim_message_hash(claimer: &str) -> [u8; 32] {
    let mut message = Vec::with_capacity(CLAIM_MESSAGE_PREFIX.len() + claimer.len());
    message.extend_from_slice(CLAIM_MESSAGE_PREFIX);
    message.extend_from_slice(claimer.as_bytes());
    sha256(&message)
}

/// Snapshot leaf for an external pubkey hash and satoshi amount.
///
/// `keccak256(hash160 ‖ amount as 32-byte big-endian)`
pub fn utxo_leaf(external_address: &[u8; 20], amount: Uint128) -> [u8; 32] {
    let mut data = [0u8; 52];
    data[..20].copy_from_slice(external_address);
    data[36..].copy_from_slice(&amount.u128().to_be_bytes());
    keccak256(&data)
}

/// Check that `signature` over the claim message for `claimer` was made by `pub_key`.
///
/// `signature` is `r ‖ s ‖ v` with `v` in `{0, 1, 27, 28}`. A signature that
/// fails recovery verifies as `false`; malformed inputs are errors.
pub fn verify_claim(
    api: &dyn Api,
    pub_key: &[u8],
    claimer: &str,
    signature: &[u8],
) -> Result<bool, ContractError> {
    let key = parse_pub_key(pub_key)?;
    if signature.len() != 65 {
        return Err(ContractError::InvalidSignatureLength {
            got: signature.len(),
        });
    }

    let recovery_param = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return Ok(false),
    };

    let hash = claim_message_hash(claimer);
    let recovered = match api.secp256k1_recover_pubkey(&hash, &signature[..64], recovery_param) {
        Ok(recovered) => recovered,
        Err(_) => return Ok(false),
    };
    let recovered = parse_pub_key(&recovered)?;

    Ok(derive_local_address(&recovered) == derive_local_address(&key))
}
