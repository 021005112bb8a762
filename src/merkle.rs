//! Merkle commitments over a finality provider's per-block public randomness (C4).
//!
//! Leaves hash `(blockNumber, pubRand)` with ABI-tuple-style 32-byte-word padding so the tree is
//! verifiable by a Solidity-side Merkle library; internal nodes hash their children in sorted
//! order so a verifier doesn't need to track left/right position alongside each sibling.

use crate::curve;

/// The leaf hash for `(block_number, pub_rand)`: `Keccak256(u64_be_padded(block_number) ||
/// pub_rand)`, where `block_number` occupies the low 8 bytes of a 32-byte big-endian word (as a
/// Solidity `uint256` argument would be ABI-encoded).
#[must_use]
pub fn leaf_hash(block_number: u64, pub_rand: [u8; 32]) -> [u8; 32] {
  let mut preimage = [0u8; 64];
  preimage[24 .. 32].copy_from_slice(&block_number.to_be_bytes());
  preimage[32 ..].copy_from_slice(&pub_rand);
  curve::keccak256(preimage)
}

/// The internal node hash of two children, order-independent: `Keccak256(min(a,b) || max(a,b))`.
#[must_use]
pub fn node_hash(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
  let mut preimage = [0u8; 64];
  if a <= b {
    preimage[.. 32].copy_from_slice(&a);
    preimage[32 ..].copy_from_slice(&b);
  } else {
    preimage[.. 32].copy_from_slice(&b);
    preimage[32 ..].copy_from_slice(&a);
  }
  curve::keccak256(preimage)
}

/// Verify that `leaf` is included in the tree committed to by `root`, given its `proof` (the
/// sibling hash at each level, root-ward).
#[must_use]
pub fn verify_proof(root: [u8; 32], leaf: [u8; 32], proof: &[[u8; 32]]) -> bool {
  let mut current = leaf;
  for sibling in proof {
    current = node_hash(current, *sibling);
  }
  current == root
}

/// A Merkle tree over an epoch's `(block_number, pub_rand)` leaves, built bottom-up with odd
/// levels duplicating their last node (matching the padding convention used by [`node_hash`]'s
/// ordered-pair construction, since duplicating a node against itself is its own order-independent
/// case). Exposed for test and reference use; the registry only ever needs a committed `root` and
/// individual [`verify_proof`] checks, not the tree itself.
pub struct Tree {
  levels: Vec<Vec<[u8; 32]>>,
}

impl Tree {
  /// Build a tree over the given leaves, in order. Panics if `leaves` is empty.
  #[must_use]
  pub fn build(leaves: Vec<[u8; 32]>) -> Self {
    assert!(!leaves.is_empty(), "cannot build a Merkle tree over zero leaves");

    let mut levels = vec![leaves];
    while levels.last().expect("levels is never empty").len() > 1 {
      let prior = levels.last().expect("levels is never empty");
      let mut next = Vec::with_capacity(prior.len().div_ceil(2));
      let mut i = 0;
      while i < prior.len() {
        let left = prior[i];
        let right = if i + 1 < prior.len() { prior[i + 1] } else { prior[i] };
        next.push(node_hash(left, right));
        i += 2;
      }
      levels.push(next);
    }

    Self { levels }
  }

  /// The tree's root.
  #[must_use]
  pub fn root(&self) -> [u8; 32] {
    self.levels.last().expect("levels is never empty")[0]
  }

  /// The inclusion proof for the leaf at `index`, root-ward.
  #[must_use]
  pub fn proof(&self, mut index: usize) -> Vec<[u8; 32]> {
    let mut proof = Vec::new();
    for level in &self.levels[.. self.levels.len() - 1] {
      let sibling_index = if index % 2 == 0 { index + 1 } else { index - 1 };
      let sibling = level.get(sibling_index).copied().unwrap_or(level[index]);
      proof.push(sibling);
      index /= 2;
    }
    proof
  }
}
