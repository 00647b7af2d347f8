use data_encoding::BASE64;
use zeroize::Zeroize;

use super::error::{EncoderError, EncoderResult};
use crate::kdf::ScryptParams;

/// A parsed password hash envelope.
///
/// The text form is `$`-separated with a leading empty field. Version 2 is
/// the current format and the only one that is emitted; versions 0 and 1 pack
/// the parameters into a single hex field and are accepted for verification
/// of existing hashes only. Version 0 stores the cost as the exponent `e`
/// with `N = 2^e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
  V0 {
    n_exp: u32,
    r: u32,
    p: u32,
    salt: Vec<u8>,
    derived_key: Vec<u8>,
  },
  V1 {
    n: u64,
    r: u32,
    p: u32,
    salt: Vec<u8>,
    derived_key: Vec<u8>,
  },
  V2 {
    n: u64,
    r: u32,
    p: u32,
    salt: Vec<u8>,
    derived_key: Vec<u8>,
  },
}

impl Envelope {
  /// Parse any of the three envelope formats.
  ///
  /// This is a structural check only: fields are split, decoded and
  /// range-checked for representation, but the cost parameters are not
  /// validated here. `params` applies the full guard.
  pub fn parse(hash: &str) -> EncoderResult<Envelope> {
    let fields: Vec<&str> = hash.split('$').collect();

    if fields.len() < 2 || !fields[0].is_empty() {
      return Err(EncoderError::InvalidEnvelope(
        "missing leading $ separator".to_string(),
      ));
    }
    let version = fields[1];
    if version.len() != 2 || !version.starts_with('s') {
      return Err(EncoderError::InvalidEnvelope(format!(
        "unrecognized version field: {}",
        version
      )));
    }

    match (&version[1..], fields.len()) {
      ("2", 7) => {
        let n = fields[2].parse::<u64>()?;
        let r = fields[3].parse::<u32>()?;
        let p = fields[4].parse::<u32>()?;
        let salt = BASE64.decode(fields[5].as_bytes())?;
        let derived_key = BASE64.decode(fields[6].as_bytes())?;

        Ok(Envelope::V2 {
          n,
          r,
          p,
          salt,
          derived_key,
        })
      }
      ("0", 5) | ("1", 5) => {
        let packed = u64::from_str_radix(fields[2], 16)?;
        if packed > u32::MAX as u64 {
          return Err(EncoderError::InvalidEnvelope(
            "packed parameter field out of range".to_string(),
          ));
        }
        let n_field = (packed >> 16) as u32;
        let r = (packed >> 8) as u32 & 0xff;
        let p = packed as u32 & 0xff;
        let salt = BASE64.decode(fields[3].as_bytes())?;
        let derived_key = BASE64.decode(fields[4].as_bytes())?;

        if version == "s0" {
          Ok(Envelope::V0 {
            n_exp: n_field,
            r,
            p,
            salt,
            derived_key,
          })
        } else {
          Ok(Envelope::V1 {
            n: n_field as u64,
            r,
            p,
            salt,
            derived_key,
          })
        }
      }
      _ => Err(EncoderError::InvalidEnvelope(
        "wrong number of fields".to_string(),
      )),
    }
  }

  /// Render the envelope in its version's text format.
  ///
  /// Parsing and re-formatting an envelope reproduces the input
  /// byte-for-byte.
  pub fn format(&self) -> String {
    match self {
      Envelope::V2 {
        n,
        r,
        p,
        salt,
        derived_key,
      } => format!(
        "$s2${}${}${}${}${}",
        n,
        r,
        p,
        BASE64.encode(salt),
        BASE64.encode(derived_key)
      ),
      Envelope::V1 {
        n,
        r,
        p,
        salt,
        derived_key,
      } => format!(
        "$s1${:x}${}${}",
        (*n << 16) | ((*r as u64) << 8) | *p as u64,
        BASE64.encode(salt),
        BASE64.encode(derived_key)
      ),
      Envelope::V0 {
        n_exp,
        r,
        p,
        salt,
        derived_key,
      } => format!(
        "$s0${:x}${}${}",
        ((*n_exp as u64) << 16) | ((*r as u64) << 8) | *p as u64,
        BASE64.encode(salt),
        BASE64.encode(derived_key)
      ),
    }
  }

  /// Validated cost parameters of this envelope.
  ///
  /// Runs the full parameter guard, so calling this before deriving ensures
  /// a hostile envelope cannot request an oversized allocation.
  pub fn params(&self) -> EncoderResult<ScryptParams> {
    let params = match self {
      Envelope::V0 { n_exp, r, p, .. } => ScryptParams::from_exponent(*n_exp, *r, *p),
      Envelope::V1 { n, r, p, .. } | Envelope::V2 { n, r, p, .. } => ScryptParams::new(*n, *r, *p),
    }?;

    Ok(params)
  }

  pub fn salt(&self) -> &[u8] {
    match self {
      Envelope::V0 { salt, .. } | Envelope::V1 { salt, .. } | Envelope::V2 { salt, .. } => salt,
    }
  }

  pub fn version(&self) -> u8 {
    match self {
      Envelope::V0 { .. } => 0,
      Envelope::V1 { .. } => 1,
      Envelope::V2 { .. } => 2,
    }
  }

  /// Copy of this envelope with the derived key replaced, used to re-emit a
  /// candidate hash in the stored hash's own version during verification.
  pub fn with_derived_key(&self, derived_key: Vec<u8>) -> Envelope {
    match self {
      Envelope::V0 {
        n_exp, r, p, salt, ..
      } => Envelope::V0 {
        n_exp: *n_exp,
        r: *r,
        p: *p,
        salt: salt.clone(),
        derived_key,
      },
      Envelope::V1 { n, r, p, salt, .. } => Envelope::V1 {
        n: *n,
        r: *r,
        p: *p,
        salt: salt.clone(),
        derived_key,
      },
      Envelope::V2 { n, r, p, salt, .. } => Envelope::V2 {
        n: *n,
        r: *r,
        p: *p,
        salt: salt.clone(),
        derived_key,
      },
    }
  }
}

impl Zeroize for Envelope {
  fn zeroize(&mut self) {
    match self {
      Envelope::V0 {
        salt, derived_key, ..
      }
      | Envelope::V1 {
        salt, derived_key, ..
      }
      | Envelope::V2 {
        salt, derived_key, ..
      } => {
        salt.zeroize();
        derived_key.zeroize();
      }
    }
  }
}
