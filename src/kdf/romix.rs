use byteorder::{ByteOrder, LittleEndian};

use super::salsa::salsa20_8;

fn xor(x: &[u8], y: &[u8], output: &mut [u8]) {
  for ((out, &x_i), &y_i) in output.iter_mut().zip(x.iter()).zip(y.iter()) {
    *out = x_i ^ y_i;
  }
}

/// The scrypt BlockMix operation.
///
/// `input` and `output` must have the same length, a multiple of 128. The
/// 64-byte sub-blocks of the result are interleaved: even-indexed Salsa
/// outputs fill the first half, odd-indexed ones the second.
pub fn block_mix(input: &[u8], output: &mut [u8]) {
  debug_assert_eq!(input.len(), output.len());
  debug_assert_eq!(input.len() % 128, 0);

  let mut x = [0u8; 64];
  x.copy_from_slice(&input[input.len() - 64..]);

  let mut t = [0u8; 64];

  for (i, chunk) in input.chunks(64).enumerate() {
    xor(&x, chunk, &mut t);
    salsa20_8(&t, &mut x);
    let pos = if i % 2 == 0 {
      (i / 2) * 64
    } else {
      (i / 2) * 64 + input.len() / 2
    };
    output[pos..pos + 64].copy_from_slice(&x);
  }
}

/// The scrypt ROMix operation, in place on `b`.
///
/// `b` is one 128·r-byte block, `v` the 128·r·n table, `y` a 128·r-byte
/// scratch block. `n` must be a power of two; the caller has validated this.
pub fn ro_mix(b: &mut [u8], v: &mut [u8], y: &mut [u8], n: usize) {
  // Reads the first two little-endian 32-bit words of the last 64-byte
  // sub-block as a 64-bit integer. n is a power of two, so the modulo
  // reduction is a mask.
  fn integerify(x: &[u8], n: usize) -> usize {
    let j = LittleEndian::read_u64(&x[x.len() - 64..x.len() - 56]);
    (j & (n as u64 - 1)) as usize
  }

  let len = b.len();

  for chunk in v.chunks_mut(len) {
    chunk.copy_from_slice(b);
    block_mix(chunk, b);
  }

  for _ in 0..n {
    let j = integerify(b, n);
    xor(b, &v[j * len..(j + 1) * len], y);
    block_mix(y, b);
  }
}
