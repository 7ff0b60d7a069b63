//! Montgomery and Barrett modular reduction for the Kyber field (q = 3329).

use crate::Q;

/// q^{-1} mod 2^{16} (Montgomery inverse).
pub const QINV: i16 = -3327;

/// 2^{16} mod q (Montgomery radix residue), centred.
pub const MONT: i16 = -1044;

/// 2^{32} mod q. `fqmul(a, R2)` moves `a` into the Montgomery domain.
pub const R2: i16 = 1353;

/// Barrett multiplier `round(2^{26} / q)`.
const V: i32 = ((1i32 << 26) + (Q as i32) / 2) / (Q as i32); // 20159

/// Montgomery reduction: computes `a * R^{-1} mod q` where R = 2^{16}.
///
/// Input: `a in {-q*2^{15}, ..., q*2^{15} - 1}`. Output: `r in {-q+1, ...,
/// q-1}` with `r \equiv a*R^{-1} (mod q)`. The 16x16 product must truncate to
/// 16 bits before the wide multiply by q.
#[inline]
#[must_use]
pub const fn montgomery_reduce(a: i32) -> i16 {
    let t = (a as i16).wrapping_mul(QINV);
    ((a - (t as i32) * (Q as i32)) >> 16) as i16
}

/// Barrett reduction without a rounding offset.
///
/// For every `i16` input the result lies in `[0, q]` and is congruent to `a`;
/// `q` itself is reachable, so callers wanting a canonical value follow up
/// with [`csubq`].
#[inline]
#[must_use]
pub const fn barrett_reduce(a: i16) -> i16 {
    let t = ((V * (a as i32)) >> 26) as i16;
    a.wrapping_sub(t.wrapping_mul(Q))
}

/// Field multiplication followed by Montgomery reduction: `a*b*R^{-1} mod q`.
#[inline]
#[must_use]
pub const fn fqmul(a: i16, b: i16) -> i16 {
    montgomery_reduce((a as i32) * (b as i32))
}

/// Conditional subtract q: maps `[0, 2q)` onto `[0, q)` without branching.
///
/// Computes `t = a - q` and adds `q` back when the sign bit of `t` is set.
#[inline]
#[must_use]
pub const fn csubq(a: i16) -> i16 {
    let t = a.wrapping_sub(Q);
    t.wrapping_add((t >> 15) & Q)
}
