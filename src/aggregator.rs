//! The finality aggregator (C6): accumulates voting power across EOTS submissions for a rollup
//! block and declares finality once a two-thirds supermajority is reached.

use crate::{
  config::{VerifierConfig, VotingPowerOracle},
  error::{AggregatorError, SchnorrError},
  registry::Registry,
  schnorr::{Parity, PublicKey, Signature},
};

/// A single finality provider's EOTS vote over an epoch's output root.
pub struct EotsSubmission<'a> {
  /// The finality provider's registry key.
  pub fp_key: &'a [u8],
  /// The committed public-randomness value this submission claims as its nonce's x-coordinate.
  pub pub_rand: [u8; 32],
  /// The block this `pub_rand` was committed at.
  pub at_block: u64,
  /// The Merkle proof tying `pub_rand` to the registry's committed root for `(epoch, fp_key)`.
  pub pub_rand_proof: Vec<[u8; 32]>,
  /// The submitted public key's parity, as the raw wire byte (`27`/`28`, or anything else a
  /// hostile caller sent). Kept unvalidated here — like `px`/`e`/`s` — so that an out-of-range
  /// byte is just another way for this one submission to fail verification and be skipped,
  /// rather than a reason to reject the whole caller-supplied slice before the loop runs.
  pub parity: u8,
  /// The submitted public key's x-coordinate.
  pub px: [u8; 32],
  /// The signature's `e` field.
  pub e: [u8; 32],
  /// The signature's `s` field.
  pub s: [u8; 32],
}

/// Verifies EOTS submissions against a [`Registry`] and declares finality once accumulated
/// voting power crosses the oracle's two-thirds threshold.
pub struct Aggregator<O: VotingPowerOracle> {
  config: VerifierConfig,
  oracle: O,
}

impl<O: VotingPowerOracle> Aggregator<O> {
  /// Build an aggregator over the given config and oracle.
  pub fn new(config: VerifierConfig, oracle: O) -> Self {
    Self { config, oracle }
  }

  /// Verify that `submissions` collectively carry at least two-thirds of the voting power
  /// eligible at `at_block`, for the claimed `output_root` at `epoch`, per §4.6.
  pub fn verify_eots(
    &self,
    registry: &Registry<O>,
    epoch: u64,
    at_block: u64,
    output_root: [u8; 32],
    submissions: &[EotsSubmission<'_>],
  ) -> Result<bool, AggregatorError> {
    let (from_block, to_block) = self.config.block_range(epoch);
    if at_block < from_block || at_block > to_block {
      return Err(AggregatorError::InvalidBlockRange);
    }
    if submissions.is_empty() {
      return Err(AggregatorError::DataEmpty);
    }

    let chain_id = self.config.chain_id();
    let threshold = (self.oracle.total_voting_power(chain_id, at_block) * 2) / 3;
    let mut accumulated = 0u64;

    for submission in submissions {
      if !registry.verify_pub_rand_at_block(
        epoch,
        submission.fp_key,
        submission.at_block,
        submission.pub_rand,
        &submission.pub_rand_proof,
      ) {
        log::debug!(
          "rejected submission with unregistered pub-rand: fp_key={:?}",
          submission.fp_key
        );
        return Err(AggregatorError::PubRandMismatch);
      }

      let Ok(parity) = Parity::from_byte(submission.parity) else {
        log::debug!("skipping submission with invalid parity byte: fp_key={:?}", submission.fp_key);
        continue;
      };
      let Ok(public_key) = PublicKey::from_parts(parity, submission.px) else {
        log::debug!("skipping submission with invalid public key: fp_key={:?}", submission.fp_key);
        continue;
      };
      let Ok(signature) = Signature::from_parts(submission.e, submission.s) else {
        log::debug!("skipping submission with invalid signature: fp_key={:?}", submission.fp_key);
        continue;
      };

      let valid = match crate::schnorr::verify(&public_key, &output_root, &signature) {
        Ok(valid) => valid,
        Err(SchnorrError::EcRecoverInputZero | SchnorrError::EcRecoverOutputZero) => false,
        Err(err) => {
          log::debug!("skipping submission with malformed signature: {err}");
          false
        }
      };
      if !valid {
        log::debug!("skipping submission with invalid EOTS signature: fp_key={:?}", submission.fp_key);
        continue;
      }

      accumulated += self.oracle.voting_power_for(chain_id, at_block, submission.fp_key);
      if accumulated >= threshold {
        log::debug!("quorum reached: accumulated={accumulated} threshold={threshold}");
        return Ok(true);
      }
    }

    log::debug!("quorum not reached: accumulated={accumulated} threshold={threshold}");
    Ok(false)
  }
}
