//! Hash primitives shared by the BitcoinHex contracts
//!
//! Two hash families meet here:
//! - keccak256 for EVM-style addresses, snapshot leaves and merkle nodes
//! - sha256 / ripemd160 for Bitcoin addresses (`hash160`) and claim messages
//!
//! # Bitcoin address derivation
//! ```text
//! hash160  = ripemd160(sha256(sec1_compressed_pubkey))
//! p2pkh    = base58(0x00 ‖ hash160 ‖ sha256(sha256(0x00 ‖ hash160))[0..4])
//! ```

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher, Keccak};

/// Version byte of a mainnet pay-to-pubkey-hash address
pub const P2PKH_VERSION: u8 = 0x00;

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Compute sha256 hash of arbitrary data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Bitcoin `hash160`: ripemd160 over sha256
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(data)).into()
}

/// Encode a 20-byte pubkey hash as a base58check P2PKH address
pub fn p2pkh_address(pubkey_hash: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(25);
    payload.push(P2PKH_VERSION);
    payload.extend_from_slice(pubkey_hash);
    let checksum = sha256(&sha256(&payload));
    payload.extend_from_slice(&checksum[..4]);
    bs58::encode(payload).into_string()
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Convert 20-byte address to hex string (for attributes/queries)
pub fn bytes20_to_hex(bytes: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(bytes))
}
