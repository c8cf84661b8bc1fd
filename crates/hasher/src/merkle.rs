//! Balanced binary Merkle reduction.
//!
//! Leaves are padded with zero to the next power of two, then adjacent pairs
//! `(2i, 2i + 1)` are combined level by level until a single node remains.
//! Each level is hashed in parallel with rayon; levels are strictly sequential.

use class_id_common::Fr;
use rayon::prelude::*;
use tracing::trace;

use crate::constants::GeneratorIndex;
use crate::poseidon2;
use crate::sha256::sha256_fr_concat;

/// Two-to-one node hash of a Merkle tree.
pub trait MerkleHasher: Sync {
    fn hash(&self, left: Fr, right: Fr) -> Fr;
}

/// Domain-separated Poseidon2 node hash: `H(generator, left, right)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poseidon2MerkleHasher {
    pub generator: GeneratorIndex,
}

impl Poseidon2MerkleHasher {
    pub const fn new(generator: GeneratorIndex) -> Self {
        Self { generator }
    }
}

impl MerkleHasher for Poseidon2MerkleHasher {
    fn hash(&self, left: Fr, right: Fr) -> Fr {
        poseidon2::hash_with_generator(&[left, right], self.generator)
    }
}

/// `sha256(left || right)` over the 32-byte big-endian encodings, reduced mod p.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256MerkleHasher;

impl MerkleHasher for Sha256MerkleHasher {
    fn hash(&self, left: Fr, right: Fr) -> Fr {
        sha256_fr_concat([left.to_bytes().as_slice(), right.to_bytes().as_slice()])
    }
}

/// Number of hashing levels above `leaf_count` padded leaves.
pub const fn merkle_depth(leaf_count: usize) -> u32 {
    if leaf_count <= 1 {
        0
    } else {
        leaf_count.next_power_of_two().trailing_zeros()
    }
}

fn padded_leaves(leaves: &[Fr]) -> Vec<Fr> {
    let mut nodes = leaves.to_vec();
    nodes.resize(leaves.len().next_power_of_two(), Fr::ZERO);
    nodes
}

/// Root of the tree over `leaves`, hashing each level in parallel.
///
/// Returns zero when there are no leaves.
pub fn merkle_root<H: MerkleHasher>(leaves: &[Fr], hasher: &H) -> Fr {
    if leaves.is_empty() {
        return Fr::ZERO;
    }
    let mut nodes = padded_leaves(leaves);
    while nodes.len() > 1 {
        trace!(width = nodes.len(), "hashing merkle level");
        nodes = nodes
            .par_chunks_exact(2)
            .map(|pair| hasher.hash(pair[0], pair[1]))
            .collect();
    }
    nodes[0]
}

/// Same as [`merkle_root`] on the calling thread.
pub fn merkle_root_sequential<H: MerkleHasher>(leaves: &[Fr], hasher: &H) -> Fr {
    if leaves.is_empty() {
        return Fr::ZERO;
    }
    let mut nodes = padded_leaves(leaves);
    while nodes.len() > 1 {
        nodes = nodes
            .chunks_exact(2)
            .map(|pair| hasher.hash(pair[0], pair[1]))
            .collect();
    }
    nodes[0]
}

/// Dispatches to the parallel or sequential reduction.
pub fn merkle_root_with<H: MerkleHasher>(leaves: &[Fr], hasher: &H, parallel: bool) -> Fr {
    if parallel {
        merkle_root(leaves, hasher)
    } else {
        merkle_root_sequential(leaves, hasher)
    }
}
