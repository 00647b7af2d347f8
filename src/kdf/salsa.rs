use byteorder::{ByteOrder, LittleEndian};

/// The Salsa20/8 core function.
///
/// Treats `input` as sixteen little-endian 32-bit words, runs 4 double-rounds
/// and adds the result back onto the input words. `input` and `output` must
/// both be 64 bytes long.
pub fn salsa20_8(input: &[u8], output: &mut [u8]) {
  debug_assert_eq!(input.len(), 64);
  debug_assert_eq!(output.len(), 64);

  let mut x = [0u32; 16];
  LittleEndian::read_u32_into(input, &mut x);

  macro_rules! run_round (
    ($($set_idx:expr, $idx_a:expr, $idx_b:expr, $rot:expr);*) => { {
      $( x[$set_idx] ^= x[$idx_a].wrapping_add(x[$idx_b]).rotate_left($rot); )*
    } }
  );

  // 4 double-rounds: column rounds followed by row rounds.
  for _ in 0..4 {
    run_round!(
      0x4, 0x0, 0xc, 7;
      0x8, 0x4, 0x0, 9;
      0xc, 0x8, 0x4, 13;
      0x0, 0xc, 0x8, 18;
      0x9, 0x5, 0x1, 7;
      0xd, 0x9, 0x5, 9;
      0x1, 0xd, 0x9, 13;
      0x5, 0x1, 0xd, 18;
      0xe, 0xa, 0x6, 7;
      0x2, 0xe, 0xa, 9;
      0x6, 0x2, 0xe, 13;
      0xa, 0x6, 0x2, 18;
      0x3, 0xf, 0xb, 7;
      0x7, 0x3, 0xf, 9;
      0xb, 0x7, 0x3, 13;
      0xf, 0xb, 0x7, 18;
      0x1, 0x0, 0x3, 7;
      0x2, 0x1, 0x0, 9;
      0x3, 0x2, 0x1, 13;
      0x0, 0x3, 0x2, 18;
      0x6, 0x5, 0x4, 7;
      0x7, 0x6, 0x5, 9;
      0x4, 0x7, 0x6, 13;
      0x5, 0x4, 0x7, 18;
      0xb, 0xa, 0x9, 7;
      0x8, 0xb, 0xa, 9;
      0x9, 0x8, 0xb, 13;
      0xa, 0x9, 0x8, 18;
      0xc, 0xf, 0xe, 7;
      0xd, 0xc, 0xf, 9;
      0xe, 0xd, 0xc, 13;
      0xf, 0xe, 0xd, 18
    )
  }

  for i in 0..16 {
    let feed_forward = x[i].wrapping_add(LittleEndian::read_u32(&input[i * 4..(i + 1) * 4]));
    LittleEndian::write_u32(&mut output[i * 4..(i + 1) * 4], feed_forward);
  }
}
