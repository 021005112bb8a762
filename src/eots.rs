//! Extractable One-Time Signatures (C3): a Schnorr variant where reusing a nonce across two
//! distinct messages leaks the signer's private key. This is the mechanism by which a rollup
//! punishes a Bitcoin-staked finality provider that double-signs conflicting finality votes.

use k256::{ProjectivePoint, Scalar};

use crate::{
  curve,
  error::{EotsError, SchnorrError},
  schnorr::{self, PublicKey, Signature},
};

/// Sign `message` with private key `d` and nonce `k`.
///
/// Unlike [`schnorr::sign`], this does not normalize `d` or `k` to force an even-y point: a real
/// finality provider's staking key has whatever parity it has, and the whole point of EOTS is
/// that the *same* key and the *same* committed nonce are reused across an epoch's blocks, so
/// there is nothing to normalize away. Consequently `d·G`'s x-coordinate may land at or above
/// `HALF_Q`, which [`PublicKey::from_point`] rejects; that failure is propagated rather than
/// normalized away, same as [`schnorr::sign`] propagates it for the generic Schnorr path.
pub fn sign(d: Scalar, k: Scalar, message: &[u8]) -> Result<(PublicKey, Signature), SchnorrError> {
  let p_point = ProjectivePoint::GENERATOR * d;
  let r_point = ProjectivePoint::GENERATOR * k;

  let public_key = PublicKey::from_point(p_point)?;
  let e = schnorr::challenge(r_point, &public_key, message);
  let s = k + (e * d);
  Ok((public_key, Signature::from_scalars(e, s)))
}

/// Verify an EOTS signature against a committed public randomness value `pub_rand`: the
/// recovered nonce point must have an even y-coordinate and its x-coordinate must equal
/// `pub_rand`, on top of the plain Schnorr kernel's own challenge check.
pub fn verify(
  public_key: &PublicKey,
  pub_rand: [u8; 32],
  message: &[u8],
  signature: &Signature,
) -> Result<bool, EotsError> {
  let outcome = schnorr::verify_detailed(public_key, message, signature)?;
  if !outcome.valid {
    return Ok(false);
  }

  if !curve::is_even_y(outcome.nonce_point) {
    return Err(EotsError::OddNonce);
  }

  use k256::elliptic_curve::point::AffineCoordinates;
  let nonce_x: [u8; 32] = outcome.nonce_point.to_affine().x().into();
  if nonce_x != pub_rand {
    return Err(EotsError::PubRandMismatch);
  }

  Ok(true)
}

/// Extract the private key behind `public_key` from two EOTS signatures over distinct messages
/// that reused the same nonce.
///
/// Both signatures must independently verify against `public_key` and `pub_rand` before
/// extraction is attempted. Returns [`EotsError::IdenticalSignatures`] if the two messages or the
/// two signatures coincide (nothing to extract), and [`EotsError::ExtractionMismatch`] if the
/// recovered scalar doesn't reproduce `public_key`.
pub fn extract(
  public_key: &PublicKey,
  pub_rand: [u8; 32],
  message1: &[u8],
  signature1: &Signature,
  message2: &[u8],
  signature2: &Signature,
) -> Result<Scalar, EotsError> {
  if message1 == message2 || (signature1.e() == signature2.e() && signature1.s() == signature2.s())
  {
    return Err(EotsError::IdenticalSignatures);
  }

  if !verify(public_key, pub_rand, message1, signature1)? {
    return Err(EotsError::Schnorr(crate::error::SchnorrError::EcRecoverOutputZero));
  }
  if !verify(public_key, pub_rand, message2, signature2)? {
    return Err(EotsError::Schnorr(crate::error::SchnorrError::EcRecoverOutputZero));
  }

  let e_diff = signature1.e() - signature2.e();
  let e_diff_inv: Scalar = Option::from(e_diff.invert()).ok_or(EotsError::IdenticalSignatures)?;
  let d = (signature1.s() - signature2.s()) * e_diff_inv;

  let recovered = PublicKey::from_point(ProjectivePoint::GENERATOR * d).map_err(EotsError::Schnorr)?;
  if recovered.parity() != public_key.parity() || recovered.x_bytes() != public_key.x_bytes() {
    return Err(EotsError::ExtractionMismatch);
  }

  Ok(d)
}
