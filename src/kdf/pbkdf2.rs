use hmac::{Hmac, Mac};
use sha2::Sha256;

const HASH_LEN: usize = 32;

/// PBKDF2 with HMAC-SHA256 as pseudo-random function (RFC 2898).
///
/// The HMAC key state is initialized once from `password` and cloned for
/// every block, so the scrypt driver's `iterations = 1` case costs a single
/// HMAC per 32 bytes of output.
pub fn pbkdf2_hmac_sha256(password: &[u8], salt: &[u8], iterations: u32, output: &mut [u8]) {
  debug_assert!(iterations > 0);
  debug_assert!(!output.is_empty());
  debug_assert!(output.len() / HASH_LEN <= 0xffff_ffff);

  let prf = Hmac::<Sha256>::new_from_slice(password).unwrap();

  for (i, chunk) in output.chunks_mut(HASH_LEN).enumerate() {
    let mut mac = prf.clone();
    mac.update(salt);
    mac.update(&(i as u32 + 1).to_be_bytes());
    let mut u = mac.finalize().into_bytes();

    // T_i = U_1 XOR ... XOR U_c; the final block may be truncated.
    chunk.copy_from_slice(&u[..chunk.len()]);

    for _ in 1..iterations {
      let mut mac = prf.clone();
      mac.update(&u);
      u = mac.finalize().into_bytes();
      for (out, u_i) in chunk.iter_mut().zip(u.iter()) {
        *out ^= u_i;
      }
    }
  }
}
