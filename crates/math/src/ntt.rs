//! Number-Theoretic Transform and base multiplication in `Z_q[X]/(X^2 - zeta)`.
//!
//! - [`forward_ntt`]: forward NTT, standard order -> bit-reversed order.
//! - [`inverse_ntt`]: inverse NTT, output scaled into the Montgomery domain.
//! - [`basemul`]: degree-1 multiplication in the NTT domain.
//!
//! The transforms themselves live in the backends; this module owns the
//! twiddle tables both backends consume.

use crate::{backend, reduce::montgomery_reduce, N};

const Q64: i64 = crate::Q as i64;

const fn pow_mod(mut base: i64, mut exp: i64, modulus: i64) -> i64 {
    let mut result: i64 = 1;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % modulus;
        }
        exp >>= 1;
        base = base * base % modulus;
    }
    result
}

const fn bitrev7(x: usize) -> usize {
    ((x >> 6) & 1)
        | (((x >> 5) & 1) << 1)
        | (((x >> 4) & 1) << 2)
        | (((x >> 3) & 1) << 3)
        | (((x >> 2) & 1) << 4)
        | (((x >> 1) & 1) << 5)
        | ((x & 1) << 6)
}

/// Forward twiddle factors in Montgomery form, from primitive 256th root
/// ζ = 17, bit-reversed indexing.
///
/// `ZETAS[i] = ζ^{BitRev₇(i)} · 2¹⁶  (mod q)`, canonical in `[0, q)`.
/// Entries `64..128` double as the base-multiplication roots.
pub const ZETAS: [i16; 128] = {
    const ZETA: i64 = 17;
    const MONT: i64 = 1 << 16;

    let mut zetas = [0i16; 128];
    let mut i = 0;
    while i < 128 {
        zetas[i] = (pow_mod(ZETA, bitrev7(i) as i64, Q64) * MONT % Q64) as i16;
        i += 1;
    }
    zetas
};

/// Inverse twiddle factors, consumed in ascending order by the inverse NTT.
///
/// `ZETAS_INV[i] = -ZETAS[127 - i] (mod q)` for `i < 127`. The last entry is
/// the final scaling constant `2³² · 128⁻¹ (mod q)`, which both undoes the
/// transform's factor of 128 and leaves the result in the Montgomery domain.
pub const ZETAS_INV: [i16; 128] = {
    let mut zetas = [0i16; 128];
    let mut i = 0;
    while i < 127 {
        zetas[i] = (Q64 - ZETAS[127 - i] as i64) as i16;
        i += 1;
    }
    zetas[127] = (pow_mod(2, 32, Q64) * pow_mod(128, Q64 - 2, Q64) % Q64) as i16;
    zetas
};

/// Forward NTT (in-place). Standard order in, bit-reversed order out.
///
/// Output coefficients are Barrett-reduced into `[0, q]`.
#[inline]
pub fn forward_ntt(r: &mut [i16; N]) {
    backend::dispatch!(ntt(r));
}

/// Inverse NTT (in-place). Bit-reversed in, standard order out, each
/// coefficient scaled by the Montgomery factor `R = 2^{16}`.
#[inline]
pub fn inverse_ntt(r: &mut [i16; N]) {
    backend::dispatch!(inverse_ntt(r));
}

/// Multiply `a0 + a1·X` by `b0 + b1·X` modulo `X² - zeta`.
///
/// `r0 = MontRed(MontRed(a1·b1)·zeta + a0·b0)`, `r1 = MontRed(a0·b1 + a1·b0)`.
#[inline]
#[must_use]
pub const fn basemul(a0: i16, a1: i16, b0: i16, b1: i16, zeta: i16) -> (i16, i16) {
    let hi = montgomery_reduce((a1 as i32) * (b1 as i32));
    let r0 = montgomery_reduce((hi as i32) * (zeta as i32) + (a0 as i32) * (b0 as i32));
    let r1 = montgomery_reduce((a0 as i32) * (b1 as i32) + (a1 as i32) * (b0 as i32));
    (r0, r1)
}
