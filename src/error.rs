//! Error taxonomy for every fallible surface of this crate.

/// Errors returned when verifying or signing with the EVM-compatible Schnorr kernel.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SchnorrError {
  /// The public key's x-coordinate wasn't less than `HALF_Q`.
  #[error("public key's x-coordinate exceeds or equals HALF_Q")]
  InvalidPublicKey,
  /// The signature's `s` scalar wasn't canonically less than `Q`.
  #[error("signature's s scalar overflows Q")]
  SignatureOverflow,
  /// The parity byte wasn't `27` or `28`.
  #[error("parity byte wasn't 27 or 28")]
  InvalidParity,
  /// The derived `ecrecover` input collapsed to zero.
  #[error("derived ecrecover input was zero")]
  EcRecoverInputZero,
  /// `ecrecover` returned the zero address.
  #[error("ecrecover recovered the zero address")]
  EcRecoverOutputZero,
}

/// Errors returned when packing or unpacking a proof-of-possession.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum CodecError {
  /// The encoded proof-of-possession wasn't the expected length.
  #[error("invalid proof-of-possession length: expected {expected}, got {actual}")]
  InvalidSignatureLength {
    /// The length this codec requires.
    expected: usize,
    /// The length actually supplied.
    actual: usize,
  },
}

/// Errors returned when extracting a private key from two EOTS signatures.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum EotsError {
  /// The underlying Schnorr kernel rejected the signature.
  #[error("schnorr verification failed: {0}")]
  Schnorr(#[from] SchnorrError),
  /// The nonce point's y-coordinate was odd.
  #[error("nonce point has an odd y-coordinate")]
  OddNonce,
  /// The nonce point's x-coordinate didn't match the committed public randomness.
  #[error("nonce point's x-coordinate doesn't match the committed public randomness")]
  PubRandMismatch,
  /// `Extract` was called with two identical messages or two identical signatures.
  #[error("extraction requires two distinct messages and two distinct signatures")]
  IdenticalSignatures,
  /// The extracted scalar didn't reproduce the claimed public key.
  #[error("extracted private key doesn't reproduce the claimed public key")]
  ExtractionMismatch,
}

/// Errors returned by the public-randomness registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
  /// The epoch has already ended (or hasn't started) relative to the chain's current block.
  #[error("block range is invalid for this operation")]
  InvalidBlockRange,
  /// A root was already committed for this `(epoch, fpKey)` pair.
  #[error("a root is already committed for this (epoch, fpKey) pair")]
  DuplicateBatch,
  /// The proof-of-possession's message didn't match the canonical preimage.
  #[error("proof-of-possession message mismatch: expected {expected:?}, got {actual:?}")]
  MessageMismatch {
    /// The canonical preimage this registry computed.
    expected: [u8; 32],
    /// The message actually embedded in the proof-of-possession.
    actual: [u8; 32],
  },
  /// The proof-of-possession's signature didn't verify.
  #[error("invalid proof-of-possession")]
  InvalidProofOfPossession,
  /// The proof-of-possession couldn't be decoded.
  #[error("couldn't decode proof-of-possession: {0}")]
  Codec(#[from] CodecError),
}

/// Errors returned by the finality aggregator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AggregatorError {
  /// `atBlock` wasn't within the epoch's block range.
  #[error("block range is invalid for this operation")]
  InvalidBlockRange,
  /// The submissions array was empty.
  #[error("no submissions were provided")]
  DataEmpty,
  /// A submission's Merkle proof didn't verify against the committed root.
  #[error("submitted public randomness didn't match the committed root")]
  PubRandMismatch,
}

/// Errors returned when constructing a [`crate::config::VerifierConfig`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ConfigError {
  /// `epoch_size` was zero.
  #[error("epoch_size must be non-zero")]
  InvalidEpochSize,
}
