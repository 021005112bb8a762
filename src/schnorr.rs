//! The EVM-compatible Schnorr verification kernel (C2): a public key is `(parity, Px)`, a
//! signature is `(e, s)`, and verification recovers the nonce's address via `ecrecover` rather
//! than reconstructing the nonce point directly.

use group::ff::PrimeField;
use k256::{elliptic_curve::point::AffineCoordinates, ProjectivePoint, Scalar, U256};

use crate::{
  curve::{self, HALF_Q},
  error::SchnorrError,
};

/// The parity of a point's y-coordinate, encoded the way `ecrecover`'s `v` parameter is: `27` for
/// even, `28` for odd.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Parity {
  /// An even y-coordinate; encoded as `27`.
  Even,
  /// An odd y-coordinate; encoded as `28`.
  Odd,
}

impl Parity {
  /// The parity of the given point's y-coordinate.
  #[must_use]
  pub fn of(point: ProjectivePoint) -> Self {
    if curve::is_even_y(point) {
      Parity::Even
    } else {
      Parity::Odd
    }
  }

  /// Decode a wire parity byte, which must be `27` or `28`.
  pub fn from_byte(byte: u8) -> Result<Self, SchnorrError> {
    match byte {
      27 => Ok(Parity::Even),
      28 => Ok(Parity::Odd),
      _ => Err(SchnorrError::InvalidParity),
    }
  }

  /// Encode this parity as its wire byte (`27` or `28`).
  #[must_use]
  pub fn to_byte(self) -> u8 {
    match self {
      Parity::Even => 27,
      Parity::Odd => 28,
    }
  }

  fn is_odd(self) -> bool {
    matches!(self, Parity::Odd)
  }
}

/// A Schnorr public key: a signer's `(parity, Px)` pair. Unlike a generic secp256k1 public key,
/// `Px` is bound under `HALF_Q` rather than the full field — see [`curve::HALF_Q`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PublicKey {
  parity: Parity,
  x: Scalar,
  x_bytes: [u8; 32],
}

impl PublicKey {
  /// Build a public key from its wire parity byte and x-coordinate.
  pub fn from_parts(parity: Parity, x_bytes: [u8; 32]) -> Result<Self, SchnorrError> {
    if U256::from_be_slice(&x_bytes) >= HALF_Q {
      return Err(SchnorrError::InvalidPublicKey);
    }
    let x = Option::from(Scalar::from_repr(x_bytes.into())).ok_or(SchnorrError::InvalidPublicKey)?;
    Ok(Self { parity, x, x_bytes })
  }

  /// Build a public key from a curve point, deriving its parity and x-coordinate.
  pub fn from_point(point: ProjectivePoint) -> Result<Self, SchnorrError> {
    let x_bytes: [u8; 32] = point.to_affine().x().into();
    Self::from_parts(Parity::of(point), x_bytes)
  }

  /// This key's parity.
  #[must_use]
  pub fn parity(&self) -> Parity {
    self.parity
  }

  /// This key's x-coordinate, as a scalar.
  #[must_use]
  pub fn x_scalar(&self) -> Scalar {
    self.x
  }

  /// This key's x-coordinate, as its canonical 32-byte big-endian encoding.
  #[must_use]
  pub fn x_bytes(&self) -> [u8; 32] {
    self.x_bytes
  }
}

/// A Schnorr signature: the `(e, s)` pair produced by [`sign`] and checked by [`verify`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Signature {
  e: Scalar,
  s: Scalar,
}

impl Signature {
  /// Build a signature from its wire `e` and `s` values. `e` is reduced mod `Q` (any 32-byte
  /// value is accepted, matching the challenge's own construction); `s` must already be a
  /// canonical scalar, or [`SchnorrError::SignatureOverflow`] is returned.
  pub fn from_parts(e_bytes: [u8; 32], s_bytes: [u8; 32]) -> Result<Self, SchnorrError> {
    let e = curve::hash_to_scalar_bytes(e_bytes);
    let s = Option::from(Scalar::from_repr(s_bytes.into())).ok_or(SchnorrError::SignatureOverflow)?;
    Ok(Self { e, s })
  }

  pub(crate) fn from_scalars(e: Scalar, s: Scalar) -> Self {
    Self { e, s }
  }

  /// The challenge scalar.
  #[must_use]
  pub fn e(&self) -> Scalar {
    self.e
  }

  /// The response scalar.
  #[must_use]
  pub fn s(&self) -> Scalar {
    self.s
  }

  /// This signature's `e` value, as its canonical 32-byte big-endian encoding.
  #[must_use]
  pub fn e_bytes(&self) -> [u8; 32] {
    self.e.to_repr().into()
  }

  /// This signature's `s` value, as its canonical 32-byte big-endian encoding.
  #[must_use]
  pub fn s_bytes(&self) -> [u8; 32] {
    self.s.to_repr().into()
  }
}

/// The challenge hash `e = Keccak256(addr(R) || parity(P) || Px || m) mod Q`.
#[must_use]
pub fn challenge(nonce_point: ProjectivePoint, public_key: &PublicKey, message: &[u8]) -> Scalar {
  let mut preimage = Vec::with_capacity(20 + 1 + 32 + message.len());
  preimage.extend_from_slice(&curve::addr(nonce_point));
  preimage.push(public_key.parity().to_byte());
  preimage.extend_from_slice(&public_key.x_bytes());
  preimage.extend_from_slice(message);
  curve::hash_to_scalar(preimage)
}

/// The outcome of a full verification pass: whether the recomputed challenge matched, plus the
/// nonce point `ecrecover` recovered along the way. The EOTS layer needs the latter to enforce
/// its own extra consistency checks (see [`crate::eots`]); the plain Schnorr kernel only exposes
/// the boolean via [`verify`].
pub(crate) struct VerifyOutcome {
  pub(crate) valid: bool,
  pub(crate) nonce_point: ProjectivePoint,
}

pub(crate) fn verify_detailed(
  public_key: &PublicKey,
  message: &[u8],
  signature: &Signature,
) -> Result<VerifyOutcome, SchnorrError> {
  let px = public_key.x_scalar();
  let sp = -(signature.s() * px);
  let ep = -(signature.e() * px);

  if bool::from(subtle::ConstantTimeEq::ct_eq(&sp, &Scalar::ZERO)) {
    return Err(SchnorrError::EcRecoverInputZero);
  }

  let (nonce_point, address) =
    curve::ecrecover_with_point(sp, public_key.parity().is_odd(), px, ep)
      .ok_or(SchnorrError::EcRecoverOutputZero)?;

  let mut preimage = Vec::with_capacity(20 + 1 + 32 + message.len());
  preimage.extend_from_slice(&address);
  preimage.push(public_key.parity().to_byte());
  preimage.extend_from_slice(&public_key.x_bytes());
  preimage.extend_from_slice(message);
  let recomputed_e = curve::hash_to_scalar(preimage);

  Ok(VerifyOutcome { valid: recomputed_e == signature.e(), nonce_point })
}

/// Verify a Schnorr signature per §4.2: recover the nonce's address via `ecrecover` and compare
/// the recomputed challenge against `signature.e()`.
pub fn verify(
  public_key: &PublicKey,
  message: &[u8],
  signature: &Signature,
) -> Result<bool, SchnorrError> {
  verify_detailed(public_key, message, signature).map(|outcome| outcome.valid)
}

/// Sign `message` with private key `d` and nonce `k`, for test/reference use only.
///
/// Normalizes `d` and `k` by negation so that `P = d·G` and `R = k·G` both have even y, per
/// §4.2. The EOTS signing path (§4.3) deliberately skips this normalization; see
/// [`crate::eots::sign`].
pub fn sign(mut d: Scalar, mut k: Scalar, message: &[u8]) -> Result<(PublicKey, Signature), SchnorrError> {
  let mut p_point = ProjectivePoint::GENERATOR * d;
  if !curve::is_even_y(p_point) {
    d = -d;
    p_point = -p_point;
  }
  let mut r_point = ProjectivePoint::GENERATOR * k;
  if !curve::is_even_y(r_point) {
    k = -k;
    r_point = -r_point;
  }

  let public_key = PublicKey::from_point(p_point)?;
  let e = challenge(r_point, &public_key, message);
  let s = k + (e * d);
  Ok((public_key, Signature::from_scalars(e, s)))
}

/// Pack a `(parity, Px, m, e, s)` proof-of-possession/signature tuple into its compact wire
/// encoding: `parity(1) || Px(32) || m(32) || e(32) || s(32)`, 129 bytes total.
///
/// This implementation adopts a compact, non-word-aligned wire form rather than an ABI tuple's
/// 160-byte, word-padded encoding — there is no ABI encoder to enforce word alignment in a
/// non-EVM host. See `DESIGN.md` for the rationale.
pub const PACKED_LEN: usize = 1 + 32 + 32 + 32 + 32;

/// Pack `(parity, Px, m, e, s)` into [`PACKED_LEN`] bytes.
#[must_use]
pub fn pack(parity: Parity, px: [u8; 32], m: [u8; 32], e: [u8; 32], s: [u8; 32]) -> Vec<u8> {
  let mut out = Vec::with_capacity(PACKED_LEN);
  out.push(parity.to_byte());
  out.extend_from_slice(&px);
  out.extend_from_slice(&m);
  out.extend_from_slice(&e);
  out.extend_from_slice(&s);
  out
}

/// The decoded `(parity, Px, m, e, s)` tuple [`unpack`] returns.
pub type UnpackedParts = (u8, [u8; 32], [u8; 32], [u8; 32], [u8; 32]);

/// Unpack a `(parity, Px, m, e, s)` tuple from its [`PACKED_LEN`]-byte wire encoding.
///
/// Rejects any length other than [`PACKED_LEN`], reporting the actual length supplied as
/// `usize` (the source contract's `uint8` truncation bug is deliberately not reproduced).
/// `parity` is returned as its raw wire byte; callers resolve it with [`Parity::from_byte`],
/// which reports an invalid parity as a [`SchnorrError`] rather than a [`crate::error::CodecError`].
pub fn unpack(data: &[u8]) -> Result<UnpackedParts, crate::error::CodecError> {
  if data.len() != PACKED_LEN {
    return Err(crate::error::CodecError::InvalidSignatureLength {
      expected: PACKED_LEN,
      actual: data.len(),
    });
  }

  let parity = data[0];
  let px: [u8; 32] = data[1 .. 33].try_into().unwrap();
  let m: [u8; 32] = data[33 .. 65].try_into().unwrap();
  let e: [u8; 32] = data[65 .. 97].try_into().unwrap();
  let s: [u8; 32] = data[97 .. 129].try_into().unwrap();

  Ok((parity, px, m, e, s))
}
