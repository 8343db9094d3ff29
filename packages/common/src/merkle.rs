//! Sorted-pair keccak256 merkle proofs
//!
//! Every internal node is `keccak256(min(a, b) ‖ max(a, b))`, so a proof is just
//! the list of sibling hashes from leaf to root with no left/right markers.
//! A level with an odd number of nodes promotes its last node unchanged.
//!
//! [`verify`] is what the contract runs on-chain. [`MerkleTree`] builds roots and
//! proofs for the same convention and is used by snapshot tooling and tests.

use crate::hash::keccak256;

/// Hash two nodes in ascending byte order
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(lo);
    data[32..].copy_from_slice(hi);
    keccak256(&data)
}

/// Fold `proof` over `leaf` and compare the result with `root`.
pub fn verify(leaf: &[u8; 32], proof: &[[u8; 32]], root: &[u8; 32]) -> bool {
    let computed = proof
        .iter()
        .fold(*leaf, |running, sibling| hash_pair(&running, sibling));
    &computed == root
}

/// Like [`verify`], but over raw byte slices as they arrive in messages.
///
/// Any element that is not exactly 32 bytes makes the proof invalid.
pub fn verify_slices<P: AsRef<[u8]>>(leaf: &[u8], proof: &[P], root: &[u8]) -> bool {
    let (Ok(leaf), Ok(root)) = (<[u8; 32]>::try_from(leaf), <[u8; 32]>::try_from(root)) else {
        return false;
    };
    let mut nodes = Vec::with_capacity(proof.len());
    for node in proof {
        match <[u8; 32]>::try_from(node.as_ref()) {
            Ok(node) => nodes.push(node),
            Err(_) => return false,
        }
    }
    verify(&leaf, &nodes, &root)
}

/// In-memory merkle tree over pre-hashed leaves.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// `levels[0]` are the leaves, the last level holds the root
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build a tree from leaf hashes. Returns `None` for an empty leaf set.
    pub fn new(leaves: Vec<[u8; 32]>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let next = levels[levels.len() - 1]
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => hash_pair(a, b),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            levels.push(next);
        }

        Some(Self { levels })
    }

    pub fn root(&self) -> [u8; 32] {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Sibling path for the leaf at `index`, or `None` when out of range.
    pub fn proof(&self, index: usize) -> Option<Vec<[u8; 32]>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut proof = Vec::with_capacity(self.levels.len());
        let mut position = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = position ^ 1;
            if let Some(node) = level.get(sibling) {
                proof.push(*node);
            }
            position /= 2;
        }
        Some(proof)
    }
}
