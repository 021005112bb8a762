use k256::{ProjectivePoint, Scalar};

use crate::{
  config::{VerifierConfig, VotingPowerOracle},
  curve, eots, merkle,
  error::RegistryError,
  registry::Registry,
  schnorr::{self, PublicKey},
};

struct FixedOracle {
  current_l2_block: u64,
}

impl VotingPowerOracle for FixedOracle {
  fn current_l2_block(&self) -> u64 {
    self.current_l2_block
  }
  fn total_voting_power(&self, _chain_id: u32, _at_block: u64) -> u64 {
    100
  }
  fn voting_power_for(&self, _chain_id: u32, _at_block: u64, _fp_key: &[u8]) -> u64 {
    10
  }
}

fn valid_scalar(seed: u64) -> Scalar {
  for n in 0 .. 1000u64 {
    let candidate = Scalar::from(seed + n);
    if PublicKey::from_point(ProjectivePoint::GENERATOR * candidate).is_ok() {
      return candidate;
    }
  }
  panic!("no valid scalar near {seed}");
}

fn pop_for(epoch: u64, fp_key: &[u8], merkle_root: [u8; 32], d: Scalar, k: Scalar) -> Vec<u8> {
  let mut preimage = Vec::new();
  preimage.extend_from_slice(&epoch.to_be_bytes());
  preimage.extend_from_slice(fp_key);
  preimage.extend_from_slice(&merkle_root);
  let m = curve::keccak256(preimage);

  let (public_key, signature) = eots::sign(d, k, &m).unwrap();
  schnorr::pack(public_key.parity(), public_key.x_bytes(), m, signature.e_bytes(), signature.s_bytes())
}

#[test]
fn commit_then_verify_pub_rand_round_trips() {
  let config = VerifierConfig::new(1, 0, 1000).unwrap();
  let registry = Registry::new(config, FixedOracle { current_l2_block: 0 });

  let fp_key = b"fp-alpha".to_vec();
  let leaf = merkle::leaf_hash(42, [0xAB; 32]);
  let tree = merkle::Tree::build(vec![leaf, merkle::leaf_hash(43, [0xCD; 32])]);

  let d = valid_scalar(12345);
  let k = valid_scalar(67890);
  let pop = pop_for(1, &fp_key, tree.root(), d, k);

  registry.commit(1, &fp_key, &pop, tree.root()).unwrap();
  assert!(registry.verify_pub_rand_at_block(1, &fp_key, 42, [0xAB; 32], &tree.proof(0)));
  assert!(!registry.verify_pub_rand_at_block(1, &fp_key, 42, [0xFF; 32], &tree.proof(0)));
}

#[test]
fn commit_rejects_ended_epoch() {
  let config = VerifierConfig::new(1, 0, 1000).unwrap();
  let registry = Registry::new(config, FixedOracle { current_l2_block: 5000 });
  let d = valid_scalar(1);
  let k = valid_scalar(2);
  let tree = merkle::Tree::build(vec![merkle::leaf_hash(1, [0; 32])]);
  let pop = pop_for(1, b"fp", tree.root(), d, k);
  let err = registry.commit(1, b"fp", &pop, tree.root()).unwrap_err();
  assert!(matches!(err, RegistryError::InvalidBlockRange));
}

#[test]
fn commit_rejects_wrong_pop_public_key() {
  let config = VerifierConfig::new(1, 0, 1000).unwrap();
  let registry = Registry::new(config, FixedOracle { current_l2_block: 0 });
  let tree = merkle::Tree::build(vec![merkle::leaf_hash(1, [0; 32])]);

  let d = valid_scalar(1);
  let k = valid_scalar(2);
  let mut pop = pop_for(1, b"fp", tree.root(), d, k);
  // Corrupt the PoP's Px field (an off-by-one slice of the signer's real key, simulating
  // "Px = pubKey[0..32] instead of pubKey[1..33]"): e/s still encode the real signature, but
  // Px no longer names the key that produced it, so verification must fail.
  pop[1] ^= 0xFF;

  let err = registry.commit(1, b"fp", &pop, tree.root()).unwrap_err();
  assert!(matches!(err, RegistryError::InvalidProofOfPossession));
}

#[test]
fn commit_rejects_duplicate_batch() {
  let config = VerifierConfig::new(1, 0, 1000).unwrap();
  let registry = Registry::new(config, FixedOracle { current_l2_block: 0 });
  let d = valid_scalar(1);
  let k = valid_scalar(2);
  let tree = merkle::Tree::build(vec![merkle::leaf_hash(1, [0; 32])]);
  let pop = pop_for(1, b"fp", tree.root(), d, k);

  registry.commit(1, b"fp", &pop, tree.root()).unwrap();
  let err = registry.commit(1, b"fp", &pop, tree.root()).unwrap_err();
  assert!(matches!(err, RegistryError::DuplicateBatch));
}
