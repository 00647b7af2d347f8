use log::warn;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

mod envelope;
mod error;

#[cfg(test)]
mod tests;

pub use self::envelope::Envelope;
pub use self::error::{EncoderError, EncoderResult};
use crate::kdf::{scrypt, ScryptParams};

pub const SALT_LENGTH: usize = 32;
pub const DERIVED_KEY_LENGTH: usize = 32;

/// Encodes and verifies scrypt password hashes.
///
/// New hashes are emitted in the version 2 envelope format with the
/// configured cost parameters and a fresh 32-byte salt from the injected
/// random source. Verification accepts all three envelope versions.
///
/// The random source is the only shared state; with the default `OsRng` an
/// encoder may be used from multiple threads by cloning it per thread.
pub struct ScryptEncoder<T = OsRng> {
  params: ScryptParams,
  rng: T,
}

impl ScryptEncoder<OsRng> {
  pub fn new(params: ScryptParams) -> ScryptEncoder<OsRng> {
    ScryptEncoder { params, rng: OsRng }
  }
}

impl Default for ScryptEncoder<OsRng> {
  fn default() -> Self {
    ScryptEncoder::new(ScryptParams::default())
  }
}

impl<T> ScryptEncoder<T>
where
  T: RngCore + CryptoRng,
{
  /// Create an encoder with an explicit salt source.
  pub fn with_rng(params: ScryptParams, rng: T) -> ScryptEncoder<T> {
    ScryptEncoder { params, rng }
  }

  pub fn params(&self) -> &ScryptParams {
    &self.params
  }

  /// Hash `password` into a self-describing version 2 envelope.
  pub fn encode(&mut self, password: &str) -> EncoderResult<String> {
    if password.is_empty() {
      return Err(EncoderError::InvalidArgument(
        "password must not be empty".to_string(),
      ));
    }

    let mut salt = [0u8; SALT_LENGTH];
    self
      .rng
      .try_fill_bytes(&mut salt)
      .map_err(|error| EncoderError::InvalidArgument(format!("salt source failed: {}", error)))?;
    if salt.iter().all(|&b| b == 0) {
      return Err(EncoderError::InvalidArgument(
        "salt source returned zero bytes".to_string(),
      ));
    }

    let mut derived_key = [0u8; DERIVED_KEY_LENGTH];
    scrypt(password.as_bytes(), &salt, &self.params, &mut derived_key)?;

    let mut envelope = Envelope::V2 {
      n: self.params.n(),
      r: self.params.r(),
      p: self.params.p(),
      salt: salt.to_vec(),
      derived_key: derived_key.to_vec(),
    };
    let hash = envelope.format();

    envelope.zeroize();
    derived_key.zeroize();

    Ok(hash)
  }

  /// Check `password` against a stored hash.
  ///
  /// The stored envelope's own version, parameters and salt are used to
  /// re-derive a candidate envelope, and the two strings are compared in
  /// constant time. Structural or parameter problems in the stored hash are
  /// reported as errors rather than `false`, so callers can tell a wrong
  /// password from a corrupt hash.
  pub fn compare(&self, password: &str, hash: &str) -> EncoderResult<bool> {
    if password.is_empty() {
      return Err(EncoderError::InvalidArgument(
        "password must not be empty".to_string(),
      ));
    }
    if hash.is_empty() {
      return Err(EncoderError::InvalidArgument(
        "hash must not be empty".to_string(),
      ));
    }

    let parsed = Envelope::parse(hash)?;
    if parsed.version() < 2 {
      warn!("Accepting deprecated version {} hash", parsed.version());
    }
    // Guard runs on the parsed parameters before anything is allocated.
    let params = parsed.params()?;

    let mut derived_key = [0u8; DERIVED_KEY_LENGTH];
    scrypt(password.as_bytes(), parsed.salt(), &params, &mut derived_key)?;

    let mut candidate = parsed.with_derived_key(derived_key.to_vec());
    derived_key.zeroize();

    let mut rendered = candidate.format();
    candidate.zeroize();

    let matches = constant_time_eq(rendered.as_bytes(), hash.as_bytes());
    rendered.zeroize();

    Ok(matches)
  }

  /// Structural check whether `hash` is a well-formed envelope.
  ///
  /// Never fails; malformed input simply yields `false`.
  pub fn is_valid(&self, hash: &str) -> bool {
    Envelope::parse(hash).is_ok()
  }
}

// Equal lengths are compared in full, no early exit. The length check itself
// may leak, envelope lengths are not secret.
#[inline(never)]
fn constant_time_eq(b1: &[u8], b2: &[u8]) -> bool {
  if b1.len() != b2.len() {
    return false;
  }
  b1.iter()
    .zip(b2.iter())
    .fold(0u8, |sum, (x, y)| sum | (x ^ y))
    .eq(&0)
}
