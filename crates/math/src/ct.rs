//! Constant-time comparison and conditional move. No secret-dependent
//! branching.

/// OR together the XOR of every pair. Always consumes the whole iterator.
#[inline]
fn accumulate_diff(pairs: impl Iterator<Item = (u8, u8)>) -> u8 {
    let mut diff: u8 = 0;
    for (x, y) in pairs {
        diff |= x ^ y;
    }
    // Fence: prevent the optimiser from short-circuiting the loop.
    let diff = core::hint::black_box(diff) as u16;
    // Map 0 -> 0, nonzero -> 1 without branching.
    (diff.wrapping_neg() >> 15) as u8
}

/// Constant-time byte-slice comparison. Returns 0 if `a == b`, 1 otherwise.
///
/// # Panics
///
/// If the lengths differ. Lengths are public, so this leaks nothing.
#[inline]
#[must_use]
pub fn ct_compare(a: &[u8], b: &[u8]) -> u8 {
    assert_eq!(a.len(), b.len(), "ct_compare: length mismatch");
    accumulate_diff(a.iter().copied().zip(b.iter().copied()))
}

/// Constant-time conditional copy. If `condition == 1` overwrites `dst` with
/// `src`; if 0, `dst` is unchanged.
///
/// # Panics
///
/// If the lengths differ.
#[inline]
pub fn ct_cmov(dst: &mut [u8], src: &[u8], condition: u8) {
    assert_eq!(dst.len(), src.len(), "ct_cmov: length mismatch");
    debug_assert!(condition <= 1, "ct_cmov: condition must be 0 or 1");

    // Fence the condition so the mask isn't optimised into a branch.
    let mask = core::hint::black_box(condition).wrapping_neg(); // 0x00 or 0xFF

    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d ^= mask & (*d ^ s);
    }
}
