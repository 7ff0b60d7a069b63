use super::{PolyOps, ETA2_BYTES, ETA3_BYTES};
use crate::{
    ntt::{self, ZETAS, ZETAS_INV},
    reduce::{barrett_reduce, csubq, fqmul, R2},
    N, Q,
};

/// Loop-form reference kernels.
///
/// Written for clarity: one butterfly per iteration, 32-bit loads in the
/// binomial samplers, and the narrowest fixed-point constant that is exact
/// for each compression width.
pub struct Portable;

/// `round(2^26 / q)`; exact floor division by q for numerators below
/// `3329 << 5 + q/2` in `u32`.
const DIV_Q_26: u32 = 20159;

/// `ceil(2^40 / q)`; exact floor division by q for numerators below 2^23.
const DIV_Q_40: u64 = (1u64 << 40).div_ceil(Q as u64);

impl PolyOps for Portable {
    fn ntt(r: &mut [i16; N]) {
        let mut k = 1;
        let mut len = N / 2;
        while len >= 2 {
            for start in (0..N).step_by(2 * len) {
                let zeta = ZETAS[k];
                k += 1;
                for j in start..start + len {
                    let t = fqmul(zeta, r[j + len]);
                    r[j + len] = r[j].wrapping_sub(t);
                    r[j] = r[j].wrapping_add(t);
                }
            }
            len >>= 1;
        }
        Self::reduce(r);
    }

    fn inverse_ntt(r: &mut [i16; N]) {
        let mut k = 0;
        let mut len = 2;
        while len <= N / 2 {
            // Sums grow by one bit per layer; two Barrett layers keep them in i16.
            let reduce = matches!(len, 8 | 64);
            for start in (0..N).step_by(2 * len) {
                let zeta = ZETAS_INV[k];
                k += 1;
                for j in start..start + len {
                    let (lo, hi) = (r[j], r[j + len]);
                    let sum = lo.wrapping_add(hi);
                    r[j] = if reduce { barrett_reduce(sum) } else { sum };
                    r[j + len] = fqmul(zeta, lo.wrapping_sub(hi));
                }
            }
            len <<= 1;
        }
        let f = ZETAS_INV[127];
        for c in r.iter_mut() {
            *c = fqmul(f, *c);
        }
    }

    fn reduce(r: &mut [i16; N]) {
        for c in r.iter_mut() {
            *c = barrett_reduce(*c);
        }
    }

    fn to_mont(r: &mut [i16; N]) {
        for c in r.iter_mut() {
            *c = fqmul(*c, R2);
        }
    }

    fn csubq(r: &mut [i16; N]) {
        for c in r.iter_mut() {
            *c = csubq(*c);
        }
    }

    fn add(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
        for i in 0..N {
            r[i] = a[i].wrapping_add(b[i]);
        }
    }

    fn add_assign(r: &mut [i16; N], b: &[i16; N]) {
        for i in 0..N {
            r[i] = r[i].wrapping_add(b[i]);
        }
    }

    fn sub(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
        for i in 0..N {
            r[i] = a[i].wrapping_sub(b[i]);
        }
    }

    fn basemul(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
        for i in 0..N / 4 {
            let zeta = ZETAS[64 + i];
            let j = 4 * i;
            (r[j], r[j + 1]) = ntt::basemul(a[j], a[j + 1], b[j], b[j + 1], zeta);
            (r[j + 2], r[j + 3]) = ntt::basemul(a[j + 2], a[j + 3], b[j + 2], b[j + 3], -zeta);
        }
    }

    fn basemul_acc(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
        let mut t = [0i16; N];
        Self::basemul(&mut t, a, b);
        Self::add_assign(r, &t);
    }

    fn compress(r: &mut [u16; N], a: &[i16; N], d: u32) {
        let mask = (1u32 << d) - 1;
        for (out, &c) in r.iter_mut().zip(a.iter()) {
            let x = csubq(c) as u32;
            let num = (x << d) + (Q as u32) / 2;
            let quot = if d <= 5 {
                (num * DIV_Q_26) >> 26
            } else {
                ((num as u64 * DIV_Q_40) >> 40) as u32
            };
            *out = (quot & mask) as u16;
        }
    }

    fn decompress(r: &mut [i16; N], a: &[u16; N], d: u32) {
        for (out, &y) in r.iter_mut().zip(a.iter()) {
            *out = (((y as u32) * (Q as u32) + (1u32 << (d - 1))) >> d) as i16;
        }
    }

    fn cbd_eta2(r: &mut [i16; N], buf: &[u8; ETA2_BYTES]) {
        for (i, word) in buf.chunks_exact(4).enumerate() {
            let t = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
            let d = (t & 0x5555_5555) + ((t >> 1) & 0x5555_5555);
            for j in 0..8 {
                let a = ((d >> (4 * j)) & 3) as i16;
                let b = ((d >> (4 * j + 2)) & 3) as i16;
                r[8 * i + j] = a - b;
            }
        }
    }

    fn cbd_eta3(r: &mut [i16; N], buf: &[u8; ETA3_BYTES]) {
        for (i, word) in buf.chunks_exact(3).enumerate() {
            let t = u32::from_le_bytes([word[0], word[1], word[2], 0]);
            let d = (t & 0x0024_9249) + ((t >> 1) & 0x0024_9249) + ((t >> 2) & 0x0024_9249);
            for j in 0..4 {
                let a = ((d >> (6 * j)) & 7) as i16;
                let b = ((d >> (6 * j + 3)) & 7) as i16;
                r[4 * i + j] = a - b;
            }
        }
    }
}
