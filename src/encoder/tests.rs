use quickcheck::{quickcheck, TestResult};
use rand::{thread_rng, CryptoRng, RngCore};
use spectral::prelude::*;

use super::envelope::Envelope;
use super::{constant_time_eq, EncoderError, ScryptEncoder};
use crate::kdf::{scrypt, ScryptParams};

fn cheap_encoder() -> ScryptEncoder<rand::rngs::ThreadRng> {
  ScryptEncoder::with_rng(ScryptParams::new(16, 1, 1).unwrap(), thread_rng())
}

#[test]
fn test_encode_compare_roundtrip() {
  let mut encoder = cheap_encoder();

  let hash = encoder.encode("MyPassword").unwrap();

  assert_that(&hash.as_str()).starts_with("$s2$16$1$1$");
  assert_that(&encoder.is_valid(&hash)).is_true();
  assert_that(&encoder.compare("MyPassword", &hash).unwrap()).is_true();
  assert_that(&encoder.compare("OtherPassword", &hash).unwrap()).is_false();
}

#[test]
fn test_encode_with_default_params() {
  let mut encoder = ScryptEncoder::default();

  let hash = encoder.encode("x").unwrap();

  assert_that(&hash.as_str()).starts_with("$s2$16384$8$1$");
  assert_that(&encoder.is_valid(&hash)).is_true();
  assert_that(&encoder.compare("x", &hash).unwrap()).is_true();
}

#[test]
fn test_compare_v1_backwards_compatibility() {
  let encoder = ScryptEncoder::default();
  let hash = "$s1$40000801$5ScyYcGbFmSF5P+A64cThg+c6rFtsfyxDHkWWCt97xI=$U+7EMhBXHjNHudmn/sgvX4VZ6ddoSKLkL0nDOSKYLaQ=";

  assert_that(&encoder.is_valid(hash)).is_true();
  assert_that(&encoder.compare("MyPassword", hash).unwrap()).is_true();
  assert_that(&encoder.compare("MyPassword2", hash).unwrap()).is_false();
}

#[test]
fn test_compare_v0_envelope() {
  // A freshly derived version 0 envelope verifies end-to-end: exponent 4
  // decodes to N = 16.
  let params = ScryptParams::from_exponent(4, 1, 1).unwrap();
  let salt = b"some fixed salt.";
  let mut derived_key = [0u8; 32];
  scrypt(b"MyPassword", salt, &params, &mut derived_key).unwrap();

  let hash = Envelope::V0 {
    n_exp: 4,
    r: 1,
    p: 1,
    salt: salt.to_vec(),
    derived_key: derived_key.to_vec(),
  }
  .format();
  let encoder = ScryptEncoder::default();

  assert_that(&hash.as_str()).starts_with("$s0$40101$");
  assert_that(&encoder.is_valid(&hash)).is_true();
  assert_that(&encoder.compare("MyPassword", &hash).unwrap()).is_true();
  assert_that(&encoder.compare("OtherPassword", &hash).unwrap()).is_false();
}

#[test]
fn test_compare_v1_envelope() {
  let params = ScryptParams::new(16, 1, 1).unwrap();
  let salt = b"some fixed salt.";
  let mut derived_key = [0u8; 32];
  scrypt(b"MyPassword", salt, &params, &mut derived_key).unwrap();

  let hash = Envelope::V1 {
    n: 16,
    r: 1,
    p: 1,
    salt: salt.to_vec(),
    derived_key: derived_key.to_vec(),
  }
  .format();
  let encoder = ScryptEncoder::default();

  assert_that(&hash.as_str()).starts_with("$s1$100101$");
  assert_that(&encoder.compare("MyPassword", &hash).unwrap()).is_true();
}

#[test]
fn test_envelope_parse_format_idempotence() {
  let hashes = vec![
    "$s1$40000801$5ScyYcGbFmSF5P+A64cThg+c6rFtsfyxDHkWWCt97xI=$U+7EMhBXHjNHudmn/sgvX4VZ6ddoSKLkL0nDOSKYLaQ=",
    "$s0$e0801$5ScyYcGbFmSF5P+A64cThg+c6rFtsfyxDHkWWCt97xI=$U+7EMhBXHjNHudmn/sgvX4VZ6ddoSKLkL0nDOSKYLaQ=",
    "$s2$16384$8$1$5ScyYcGbFmSF5P+A64cThg+c6rFtsfyxDHkWWCt97xI=$U+7EMhBXHjNHudmn/sgvX4VZ6ddoSKLkL0nDOSKYLaQ=",
  ];

  for hash in hashes {
    let envelope = Envelope::parse(hash).unwrap();

    assert_that(&envelope.format().as_str()).is_equal_to(hash);
  }
}

#[test]
fn test_envelope_versions() {
  let v0 = Envelope::parse("$s0$e0801$AAAA$AAAA").unwrap();
  let v1 = Envelope::parse("$s1$40000801$AAAA$AAAA").unwrap();
  let v2 = Envelope::parse("$s2$16384$8$1$AAAA$AAAA").unwrap();

  assert_that(&v0.version()).is_equal_to(0);
  assert_that(&v1.version()).is_equal_to(1);
  assert_that(&v2.version()).is_equal_to(2);

  // v0 carries the exponent, v1/v2 carry N itself.
  assert_that(&v0.params().unwrap().n()).is_equal_to(16384);
  assert_that(&v1.params().unwrap().n()).is_equal_to(16384);
  assert_that(&v2.params().unwrap().n()).is_equal_to(16384);
}

#[test]
fn test_is_valid_rejects_malformed() {
  let encoder = ScryptEncoder::default();

  assert_that(&encoder.is_valid("$e1$adasdasd$asdasdsd")).is_false();
  assert_that(&encoder.is_valid("")).is_false();
  assert_that(&encoder.is_valid("no separators at all")).is_false();
  assert_that(&encoder.is_valid("$s3$16384$8$1$AAAA$AAAA")).is_false();
  assert_that(&encoder.is_valid("$sX$16384$8$1$AAAA$AAAA")).is_false();
  // Wrong field count for the version.
  assert_that(&encoder.is_valid("$s2$16384$8$AAAA$AAAA")).is_false();
  assert_that(&encoder.is_valid("$s1$40000801$8$AAAA$AAAA")).is_false();
  // Undecodable fields.
  assert_that(&encoder.is_valid("$s2$sixteen$8$1$AAAA$AAAA")).is_false();
  assert_that(&encoder.is_valid("$s1$xyz$AAAA$AAAA")).is_false();
  assert_that(&encoder.is_valid("$s2$16384$8$1$n*t-b64$AAAA")).is_false();
  // Packed field does not fit into 32 bits.
  assert_that(&encoder.is_valid("$s1$fffffffff$AAAA$AAAA")).is_false();
}

// A salt source that "succeeds" without producing any randomness.
struct ZeroFillRng;

impl RngCore for ZeroFillRng {
  fn next_u32(&mut self) -> u32 {
    0
  }

  fn next_u64(&mut self) -> u64 {
    0
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    dest.fill(0)
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
    dest.fill(0);
    Ok(())
  }
}

impl CryptoRng for ZeroFillRng {}

#[test]
fn test_encode_rejects_zero_salt_source() {
  let mut encoder = ScryptEncoder::with_rng(ScryptParams::new(16, 1, 1).unwrap(), ZeroFillRng);

  let result = encoder.encode("MyPassword");

  assert!(matches!(result, Err(EncoderError::InvalidArgument(_))));
}

#[test]
fn test_encode_rejects_empty_password() {
  let mut encoder = cheap_encoder();

  let result = encoder.encode("");

  assert!(matches!(result, Err(EncoderError::InvalidArgument(_))));
}

#[test]
fn test_compare_rejects_empty_arguments() {
  let encoder = cheap_encoder();

  assert!(matches!(
    encoder.compare("", "$s2$16$1$1$AAAA$AAAA"),
    Err(EncoderError::InvalidArgument(_))
  ));
  assert!(matches!(
    encoder.compare("MyPassword", ""),
    Err(EncoderError::InvalidArgument(_))
  ));
}

#[test]
fn test_compare_distinguishes_corrupt_hash_from_wrong_password() {
  let encoder = ScryptEncoder::default();

  // Structurally broken envelope.
  assert!(matches!(
    encoder.compare("MyPassword", "$s2$16384$8$AAAA$AAAA"),
    Err(EncoderError::InvalidEnvelope(_))
  ));
  // Well-formed envelope with parameters failing the guard: rejected before
  // anything is allocated.
  assert!(matches!(
    encoder.compare("MyPassword", "$s2$1000$8$1$AAAA$AAAA"),
    Err(EncoderError::InvalidParameter(_))
  ));
  assert!(matches!(
    encoder.compare("MyPassword", "$s2$1099511627776$8$1$AAAA$AAAA"),
    Err(EncoderError::InvalidParameter(_))
  ));
  assert!(matches!(
    encoder.compare("MyPassword", "$s2$16384$0$1$AAAA$AAAA"),
    Err(EncoderError::InvalidParameter(_))
  ));
}

#[test]
#[cfg_attr(debug_assertions, ignore)]
fn test_roundtrip_for_all_small_powers_of_two() {
  for k in 1..=15 {
    let mut encoder = ScryptEncoder::with_rng(ScryptParams::new(1 << k, 8, 1).unwrap(), thread_rng());

    let hash = encoder.encode("MyPassword").unwrap();

    assert_that(&encoder.compare("MyPassword", &hash).unwrap()).is_true();
  }
}

#[test]
fn test_quickcheck_roundtrip() {
  fn check_roundtrip(password: String) -> TestResult {
    if password.is_empty() {
      return TestResult::discard();
    }
    let mut encoder = cheap_encoder();
    let hash = encoder.encode(&password).unwrap();

    TestResult::from_bool(encoder.compare(&password, &hash).unwrap())
  }

  quickcheck(check_roundtrip as fn(String) -> TestResult);
}

#[test]
fn test_constant_time_eq() {
  assert_that(&constant_time_eq(b"", b"")).is_true();
  assert_that(&constant_time_eq(b"$s2$abc", b"$s2$abc")).is_true();
  assert_that(&constant_time_eq(b"$s2$abc", b"$s2$abd")).is_false();
  assert_that(&constant_time_eq(b"$s2$abc", b"$s2$ab")).is_false();
  assert_that(&constant_time_eq(b"\x00bc", b"abc")).is_false();
}
