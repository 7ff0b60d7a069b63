//! Polynomial byte-level encoding (12-bit packing) and message encode/decode.

use crate::{
    compress::{CompressWidth, D1},
    reduce::csubq,
    N, POLYBYTES, Q, SYMBYTES,
};

/// Pack 256 coefficients into 384 bytes, two per three bytes.
///
/// Coefficients must lie in `[0, 2q)`; they are canonicalised first.
pub fn coeffs_to_bytes(r: &mut [u8], a: &[i16; N]) {
    debug_assert!(r.len() >= POLYBYTES);
    debug_assert!(a.iter().all(|c| (0..2 * Q).contains(c)));
    for (out, pair) in r.chunks_exact_mut(3).zip(a.chunks_exact(2)) {
        let t0 = csubq(pair[0]) as u16;
        let t1 = csubq(pair[1]) as u16;
        out[0] = t0 as u8;
        out[1] = ((t0 >> 8) | (t1 << 4)) as u8;
        out[2] = (t1 >> 4) as u8;
    }
}

/// Unpack 384 bytes into 256 twelve-bit coefficients. Values are not
/// checked against q.
pub fn bytes_to_coeffs(r: &mut [i16; N], a: &[u8]) {
    debug_assert!(a.len() >= POLYBYTES);
    for (pair, b) in r.chunks_exact_mut(2).zip(a.chunks_exact(3)) {
        pair[0] = ((b[0] as u16) | (((b[1] as u16) & 0x0F) << 8)) as i16;
        pair[1] = (((b[1] as u16) >> 4) | ((b[2] as u16) << 4)) as i16;
    }
}

pub fn coeffs_to_message(msg: &mut [u8; SYMBYTES], a: &[i16; N]) {
    D1::compress_poly(msg, a);
}

pub fn message_to_coeffs(r: &mut [i16; N], msg: &[u8; SYMBYTES]) {
    D1::decompress_poly(r, msg);
}
