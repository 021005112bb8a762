//! secp256k1 scalar/point primitives and the EVM-compatible `ecrecover` routine this crate's
//! Schnorr kernel is built on.

use group::{ff::PrimeField, Group};
use sha3::{Digest, Keccak256};
use subtle::ConditionallySelectable;

use k256::{
  elliptic_curve::{point::DecompressPoint, sec1::ToEncodedPoint},
  AffinePoint, ProjectivePoint, Scalar, U256,
};

/// The order of the secp256k1 group.
pub const Q: U256 =
  U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

/// `(Q >> 1) + 1`, the bound a Schnorr public key's x-coordinate must fall under.
///
/// This isn't a general secp256k1 property. It's specific to verifying Schnorr signatures via
/// `ecrecover`, where a public key whose x-coordinate exceeds half the group order would let an
/// attacker produce a second, unrelated-looking signature accepted under the same challenge.
pub const HALF_Q: U256 =
  U256::from_be_hex("7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A1");

/// Hash arbitrary bytes with Keccak-256.
#[must_use]
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
  Keccak256::digest(data.as_ref()).into()
}

/// Reduce a Keccak-256 digest into a scalar mod `Q`.
#[must_use]
pub fn hash_to_scalar(data: impl AsRef<[u8]>) -> Scalar {
  hash_to_scalar_bytes(keccak256(data))
}

/// Reduce a raw 32-byte big-endian value into a scalar mod `Q`, without hashing it first. Used
/// to accept a wire-supplied challenge `e` that a hostile caller may not have reduced.
#[must_use]
pub fn hash_to_scalar_bytes(bytes: [u8; 32]) -> Scalar {
  use k256::elliptic_curve::ops::Reduce;
  <Scalar as Reduce<U256>>::reduce_bytes(&bytes.into())
}

/// The EVM-style 20-byte address derived from a curve point: the low 20 bytes of the Keccak-256
/// hash of its uncompressed SEC1 encoding, excluding the leading `0x04` tag byte.
#[must_use]
pub fn addr(point: ProjectivePoint) -> [u8; 20] {
  let encoded = point.to_encoded_point(false);
  let hash = keccak256(&encoded.as_bytes()[1 ..]);
  let mut address = [0; 20];
  address.copy_from_slice(&hash[12 ..]);
  address
}

/// Whether an affine y-coordinate (as produced by `AffineCoordinates::y_is_odd`) is even.
#[must_use]
pub fn is_even_y(point: ProjectivePoint) -> bool {
  use k256::elliptic_curve::point::AffineCoordinates;
  bool::from(!point.to_affine().y_is_odd())
}

/// Reproduce the semantics of the EVM `ecrecover` precompile: recover the 20-byte address bound
/// to an ECDSA-like tuple `(r, s)` with recovery parity `odd_y`, over the prehashed `message`.
///
/// Returns `None` if `r` or `s` is zero, if no public key can be recovered, or if the recovered
/// address is the zero address.
///
/// This is implemented directly against curve primitives rather than via `k256::ecdsa`'s
/// `VerifyingKey::recover_from_prehash`, which additionally rejects any `s` in the upper half of
/// the group order as a malleability guard. The real precompile (and this crate's Schnorr kernel,
/// which feeds it a derived `s` that has no reason to land in the lower half) carries no such
/// restriction.
#[must_use]
pub fn ecrecover(message: Scalar, odd_y: bool, r: Scalar, s: Scalar) -> Option<[u8; 20]> {
  ecrecover_with_point(message, odd_y, r, s).map(|(_, address)| address)
}

/// As [`ecrecover`], but also returns the recovered curve point alongside its address. The EOTS
/// layer needs the point itself to check the nonce's parity and x-coordinate against the
/// committed public randomness, on top of the address the plain Schnorr kernel checks.
#[must_use]
pub fn ecrecover_with_point(
  message: Scalar,
  odd_y: bool,
  r: Scalar,
  s: Scalar,
) -> Option<(ProjectivePoint, [u8; 20])> {
  if bool::from(r.is_zero()) || bool::from(s.is_zero()) {
    return None;
  }

  let r_bytes: [u8; 32] = r.to_repr().into();
  let r_point: AffinePoint =
    Option::from(AffinePoint::decompress(&r_bytes.into(), subtle::Choice::from(u8::from(odd_y))))?;
  let r_point = ProjectivePoint::from(r_point);

  let r_inv: Scalar = Option::from(r.invert())?;
  let u1 = -(r_inv * message);
  let u2 = r_inv * s;
  let point = (ProjectivePoint::GENERATOR * u1) + (r_point * u2);

  if bool::from(point.is_identity()) {
    return None;
  }

  let address = addr(point);
  if address == [0; 20] {
    None
  } else {
    Some((point, address))
  }
}

/// Conditionally negate a scalar, used to normalize a key/nonce pair to have even y (test-only
/// helper; the EVM-compatible EOTS variant deliberately disables this normalization at runtime,
/// per [`crate::eots`]).
#[must_use]
pub fn conditional_negate(scalar: Scalar, negate: bool) -> Scalar {
  Scalar::conditional_select(&scalar, &-scalar, subtle::Choice::from(u8::from(negate)))
}
