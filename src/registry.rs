//! The public-randomness registry (C5): a committed `(epoch, fpKey) -> merkleRoot` map, gating
//! commits behind a proof-of-possession over the batch being committed.

use std::{
  collections::HashMap,
  sync::{Mutex, RwLock},
};

use crate::{
  config::{VerifierConfig, VotingPowerOracle},
  curve, merkle,
  error::RegistryError,
  schnorr::{self, Parity, PublicKey, Signature},
};

type RootKey = (u64, Vec<u8>);

/// The public-randomness registry: one committed root per `(epoch, fpKey)` pair, write-once.
pub struct Registry<O: VotingPowerOracle> {
  config: VerifierConfig,
  oracle: O,
  roots: RwLock<HashMap<RootKey, [u8; 32]>>,
  write_lock: Mutex<()>,
}

impl<O: VotingPowerOracle> Registry<O> {
  /// Build a registry over an empty root map.
  pub fn new(config: VerifierConfig, oracle: O) -> Self {
    Self { config, oracle, roots: RwLock::new(HashMap::new()), write_lock: Mutex::new(()) }
  }

  /// Commit a Merkle root for `(epoch, fp_key)`, authenticated by `proof_of_possession` per §4.5.
  pub fn commit(
    &self,
    epoch: u64,
    fp_key: &[u8],
    proof_of_possession: &[u8],
    merkle_root: [u8; 32],
  ) -> Result<(), RegistryError> {
    let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    let (_, to_block) = self.config.block_range(epoch);
    if to_block <= self.oracle.current_l2_block() {
      log::warn!("rejected commit for ended epoch: epoch={epoch} fp_key={fp_key:?}");
      return Err(RegistryError::InvalidBlockRange);
    }

    let (parity_byte, px, m, e, s) = schnorr::unpack(proof_of_possession)?;

    let mut preimage = Vec::with_capacity(8 + fp_key.len() + 32);
    preimage.extend_from_slice(&epoch.to_be_bytes());
    preimage.extend_from_slice(fp_key);
    preimage.extend_from_slice(&merkle_root);
    let expected = curve::keccak256(preimage);
    if m != expected {
      log::warn!("rejected commit with mismatched PoP message: epoch={epoch} fp_key={fp_key:?}");
      return Err(RegistryError::MessageMismatch { expected, actual: m });
    }

    let parity = Parity::from_byte(parity_byte).map_err(|_| RegistryError::InvalidProofOfPossession)?;
    let public_key =
      PublicKey::from_parts(parity, px).map_err(|_| RegistryError::InvalidProofOfPossession)?;
    let signature =
      Signature::from_parts(e, s).map_err(|_| RegistryError::InvalidProofOfPossession)?;
    let valid = schnorr::verify(&public_key, &m, &signature)
      .map_err(|_| RegistryError::InvalidProofOfPossession)?;
    if !valid {
      log::warn!("rejected commit with invalid proof-of-possession: epoch={epoch} fp_key={fp_key:?}");
      return Err(RegistryError::InvalidProofOfPossession);
    }

    let mut roots = self.roots.write().unwrap_or_else(std::sync::PoisonError::into_inner);
    let key = (epoch, fp_key.to_vec());
    if roots.contains_key(&key) {
      log::warn!("rejected duplicate commit: epoch={epoch} fp_key={fp_key:?}");
      return Err(RegistryError::DuplicateBatch);
    }
    roots.insert(key, merkle_root);

    log::debug!("committed pub-rand batch: epoch={epoch} fp_key={fp_key:?} merkle_root={merkle_root:?}");
    Ok(())
  }

  /// Verify that `pub_rand` at `at_block` is included in the committed root for `(epoch,
  /// fp_key)`, returning `false` (not an error) if no root is committed or the proof fails.
  #[must_use]
  pub fn verify_pub_rand_at_block(
    &self,
    epoch: u64,
    fp_key: &[u8],
    at_block: u64,
    pub_rand: [u8; 32],
    proof: &[[u8; 32]],
  ) -> bool {
    let roots = self.roots.read().unwrap_or_else(std::sync::PoisonError::into_inner);
    let Some(root) = roots.get(&(epoch, fp_key.to_vec())) else {
      return false;
    };
    let leaf = merkle::leaf_hash(at_block, pub_rand);
    merkle::verify_proof(*root, leaf, proof)
  }
}
