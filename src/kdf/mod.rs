use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

mod error;
mod pbkdf2;
mod romix;
mod salsa;


pub use self::error::{KdfError, KdfResult};
pub use self::pbkdf2::pbkdf2_hmac_sha256;

pub const DEFAULT_COST: u64 = 16384;
pub const DEFAULT_BLOCK_SIZE: u32 = 8;
pub const DEFAULT_PARALLELIZATION: u32 = 1;

/// The scrypt cost parameters (N, r, p).
///
/// Construction validates all bounds, so a `ScryptParams` in hand is safe to
/// derive with: none of the internal buffer sizes can overflow and the
/// memory-hard table stays below 2^31 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
  n: u64,
  r: u32,
  p: u32,
}

impl ScryptParams {
  /// Create validated parameters.
  ///
  /// * `n` - CPU/memory cost, a power of two >= 2
  /// * `r` - block size factor (a scrypt block is 128·r bytes)
  /// * `p` - parallelization factor
  pub fn new(n: u64, r: u32, p: u32) -> KdfResult<ScryptParams> {
    if n < 2 || n & (n - 1) != 0 {
      return Err(KdfError::InvalidParameter(
        "N must be a power of two and at least 2".to_string(),
      ));
    }
    Self::check_bounds(n, r, p)?;

    Ok(ScryptParams { n, r, p })
  }

  /// Create validated parameters from the exponent form `N = 2^e`.
  ///
  /// This is the parameter encoding of version 0 hashes. The power-of-two
  /// requirement is implied; the overflow bounds still apply.
  pub fn from_exponent(e: u32, r: u32, p: u32) -> KdfResult<ScryptParams> {
    if e < 1 || e > 63 {
      return Err(KdfError::InvalidParameter(format!(
        "N exponent {} out of range",
        e
      )));
    }
    let n = 1u64 << e;
    Self::check_bounds(n, r, p)?;

    Ok(ScryptParams { n, r, p })
  }

  pub fn n(&self) -> u64 {
    self.n
  }

  pub fn r(&self) -> u32 {
    self.r
  }

  pub fn p(&self) -> u32 {
    self.p
  }

  // All bounds are checked before anything is allocated, so a hostile set of
  // parameters cannot trigger a huge allocation or an overflowing size
  // computation further down.
  fn check_bounds(n: u64, r: u32, p: u32) -> KdfResult<()> {
    const INT32_MAX: u64 = i32::MAX as u64;

    if r < 1 || p < 1 {
      return Err(KdfError::InvalidParameter(
        "r and p must be at least 1".to_string(),
      ));
    }
    if (r as u64) * (p as u64) >= 1 << 30 {
      return Err(KdfError::InvalidParameter(
        "r * p must be less than 2^30".to_string(),
      ));
    }
    if r as u64 > INT32_MAX / (128 * p as u64) {
      return Err(KdfError::InvalidParameter(
        "r too large for parallelization factor p".to_string(),
      ));
    }
    if r as u64 > INT32_MAX / 256 {
      return Err(KdfError::InvalidParameter("r too large".to_string()));
    }
    if n > INT32_MAX / (128 * r as u64) {
      return Err(KdfError::InvalidParameter(
        "N too large for block size factor r".to_string(),
      ));
    }

    Ok(())
  }
}

impl Default for ScryptParams {
  fn default() -> Self {
    ScryptParams {
      n: DEFAULT_COST,
      r: DEFAULT_BLOCK_SIZE,
      p: DEFAULT_PARALLELIZATION,
    }
  }
}

/// The scrypt key derivation function.
///
/// * `password` - the password bytes
/// * `salt` - the salt bytes
/// * `params` - validated cost parameters
/// * `output` - receives the derived key, any length in `1..=(2^32 - 1) * 32`
///
/// All transient buffers are zeroed before release, they contain
/// password-derived material.
pub fn scrypt(password: &[u8], salt: &[u8], params: &ScryptParams, output: &mut [u8]) -> KdfResult<()> {
  if output.is_empty() || output.len() as u64 > 0xffff_ffff * 32 {
    return Err(KdfError::InvalidParameter(
      "invalid derived key length".to_string(),
    ));
  }

  // The checks in the ScryptParams constructors guarantee that none of these
  // multiplications overflow.
  let n = params.n as usize;
  let r128 = params.r as usize * 128;
  let pr128 = params.p as usize * r128;
  let nr128 = n * r128;

  let mut b = alloc_buffer(pr128)?;
  pbkdf2_hmac_sha256(password, salt, 1, &mut b);

  let mut v = alloc_buffer(nr128)?;
  let mut y = alloc_buffer(r128)?;

  for chunk in b.chunks_mut(r128) {
    romix::ro_mix(chunk, &mut v, &mut y, n);
  }

  pbkdf2_hmac_sha256(password, &b, 1, output);

  b.zeroize();
  v.zeroize();
  y.zeroize();

  Ok(())
}

fn alloc_buffer(len: usize) -> KdfResult<Vec<u8>> {
  let mut buffer = Vec::new();

  buffer
    .try_reserve_exact(len)
    .map_err(|_| KdfError::OutOfMemory(len))?;
  buffer.resize(len, 0);

  Ok(buffer)
}
