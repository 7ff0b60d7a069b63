use super::{PolyOps, ETA2_BYTES, ETA3_BYTES};
use crate::{
    ntt::{self, ZETAS, ZETAS_INV},
    reduce::{barrett_reduce, csubq, fqmul, R2},
    N, Q,
};

/// Coefficients per chunk: 16 x i16 fills one 256-bit register.
const LANES: usize = 16;

/// Chunked kernels.
///
/// Element-wise passes walk `LANES`-wide chunks so every inner loop has a
/// fixed trip count. The NTT runs its wide layers as chunk-wise butterflies
/// and finishes the three narrow layers (`len` 8, 4, 2) inside each chunk
/// while it is still hot; the inverse transform mirrors this and folds the
/// final scaling into its last layer. CBD loads 64 bits at a time and
/// compression uses one 2^40 reciprocal for every width.
pub struct Lanes;

/// `ceil(2^40 / q)`. Exact for all numerators < 2^23 (max compress numerator
/// is ~2^22.7).
const DIV_Q_40: u64 = (1u64 << 40).div_ceil(Q as u64);

/// `t = MontRed(ζ·hi); hi = lo − t; lo = lo + t` over equal-length halves.
#[inline(always)]
fn butterfly_forward(lo: &mut [i16], hi: &mut [i16], zeta: i16) {
    for (lo, hi) in lo.chunks_exact_mut(LANES).zip(hi.chunks_exact_mut(LANES)) {
        for i in 0..LANES {
            let t = fqmul(zeta, hi[i]);
            hi[i] = lo[i].wrapping_sub(t);
            lo[i] = lo[i].wrapping_add(t);
        }
    }
}

/// `lo = lo + hi; hi = MontRed(ζ·(lo − hi))`, optionally Barrett-reducing `lo`.
#[inline(always)]
fn butterfly_inverse(lo: &mut [i16], hi: &mut [i16], zeta: i16, reduce: bool) {
    for (lo, hi) in lo.chunks_exact_mut(LANES).zip(hi.chunks_exact_mut(LANES)) {
        for i in 0..LANES {
            let (a, b) = (lo[i], hi[i]);
            let sum = a.wrapping_add(b);
            lo[i] = if reduce { barrett_reduce(sum) } else { sum };
            hi[i] = fqmul(zeta, a.wrapping_sub(b));
        }
    }
}

/// Forward layers with `len < LANES` applied to chunk `c` of the polynomial.
#[inline(always)]
fn ntt_narrow_layers(chunk: &mut [i16], c: usize) {
    let mut len = LANES / 2;
    // Zeta index of this chunk's first group in the `len` layer.
    let mut k = N / (2 * len) + c;
    let mut groups = 1;
    while len >= 2 {
        for g in 0..groups {
            let zeta = ZETAS[k + g];
            let start = 2 * len * g;
            for j in start..start + len {
                let t = fqmul(zeta, chunk[j + len]);
                chunk[j + len] = chunk[j].wrapping_sub(t);
                chunk[j] = chunk[j].wrapping_add(t);
            }
        }
        len >>= 1;
        groups <<= 1;
        k = N / (2 * len) + c * groups;
    }
}

/// Inverse layers with `len < LANES` applied to chunk `c` of the polynomial.
#[inline(always)]
fn inverse_narrow_layers(chunk: &mut [i16], c: usize) {
    // Layer `len` starts at ZETAS_INV[offset] and spends N / (2 len) entries.
    let mut offset = 0;
    let mut len = 2;
    let mut groups = LANES / 4;
    while len < LANES {
        let reduce = len == 8;
        let k = offset + c * groups;
        for g in 0..groups {
            let zeta = ZETAS_INV[k + g];
            let start = 2 * len * g;
            for j in start..start + len {
                let (a, b) = (chunk[j], chunk[j + len]);
                let sum = a.wrapping_add(b);
                chunk[j] = if reduce { barrett_reduce(sum) } else { sum };
                chunk[j + len] = fqmul(zeta, a.wrapping_sub(b));
            }
        }
        offset += N / (2 * len);
        len <<= 1;
        groups >>= 1;
    }
}

impl PolyOps for Lanes {
    fn ntt(r: &mut [i16; N]) {
        // Top layer: a single twiddle spans the whole polynomial.
        let (lo, hi) = r.split_at_mut(N / 2);
        butterfly_forward(lo, hi, ZETAS[1]);

        let mut k = 2;
        let mut len = N / 4;
        while len >= LANES {
            for block in r.chunks_exact_mut(2 * len) {
                let (lo, hi) = block.split_at_mut(len);
                butterfly_forward(lo, hi, ZETAS[k]);
                k += 1;
            }
            len >>= 1;
        }

        for (c, chunk) in r.chunks_exact_mut(LANES).enumerate() {
            ntt_narrow_layers(chunk, c);
            for x in chunk.iter_mut() {
                *x = barrett_reduce(*x);
            }
        }
    }

    fn inverse_ntt(r: &mut [i16; N]) {
        for (c, chunk) in r.chunks_exact_mut(LANES).enumerate() {
            inverse_narrow_layers(chunk, c);
        }

        // len = 16 and 32 use entries 112..124, len = 64 uses 124 and 125.
        let mut k = N / 2 - N / LANES;
        let mut len = LANES;
        while len < N / 2 {
            let reduce = len == 64;
            for block in r.chunks_exact_mut(2 * len) {
                let (lo, hi) = block.split_at_mut(len);
                butterfly_inverse(lo, hi, ZETAS_INV[k], reduce);
                k += 1;
            }
            len <<= 1;
        }

        // Last layer with the 2^32/128 scaling folded in.
        let (zeta, f) = (ZETAS_INV[126], ZETAS_INV[127]);
        let (lo, hi) = r.split_at_mut(N / 2);
        for (lo, hi) in lo.chunks_exact_mut(LANES).zip(hi.chunks_exact_mut(LANES)) {
            for i in 0..LANES {
                let (a, b) = (lo[i], hi[i]);
                lo[i] = fqmul(f, a.wrapping_add(b));
                hi[i] = fqmul(f, fqmul(zeta, a.wrapping_sub(b)));
            }
        }
    }

    fn reduce(r: &mut [i16; N]) {
        for chunk in r.chunks_exact_mut(LANES) {
            for x in chunk.iter_mut() {
                *x = barrett_reduce(*x);
            }
        }
    }

    fn to_mont(r: &mut [i16; N]) {
        for chunk in r.chunks_exact_mut(LANES) {
            for x in chunk.iter_mut() {
                *x = fqmul(*x, R2);
            }
        }
    }

    fn csubq(r: &mut [i16; N]) {
        for chunk in r.chunks_exact_mut(LANES) {
            for x in chunk.iter_mut() {
                *x = csubq(*x);
            }
        }
    }

    fn add(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
        for ((r, a), b) in r
            .chunks_exact_mut(LANES)
            .zip(a.chunks_exact(LANES))
            .zip(b.chunks_exact(LANES))
        {
            for i in 0..LANES {
                r[i] = a[i].wrapping_add(b[i]);
            }
        }
    }

    fn add_assign(r: &mut [i16; N], b: &[i16; N]) {
        for (r, b) in r.chunks_exact_mut(LANES).zip(b.chunks_exact(LANES)) {
            for i in 0..LANES {
                r[i] = r[i].wrapping_add(b[i]);
            }
        }
    }

    fn sub(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
        for ((r, a), b) in r
            .chunks_exact_mut(LANES)
            .zip(a.chunks_exact(LANES))
            .zip(b.chunks_exact(LANES))
        {
            for i in 0..LANES {
                r[i] = a[i].wrapping_sub(b[i]);
            }
        }
    }

    fn basemul(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
        // Each chunk holds four ±zeta pairs.
        for (c, ((r, a), b)) in r
            .chunks_exact_mut(LANES)
            .zip(a.chunks_exact(LANES))
            .zip(b.chunks_exact(LANES))
            .enumerate()
        {
            for p in 0..LANES / 4 {
                let zeta = ZETAS[64 + c * LANES / 4 + p];
                let j = 4 * p;
                (r[j], r[j + 1]) = ntt::basemul(a[j], a[j + 1], b[j], b[j + 1], zeta);
                (r[j + 2], r[j + 3]) =
                    ntt::basemul(a[j + 2], a[j + 3], b[j + 2], b[j + 3], -zeta);
            }
        }
    }

    fn basemul_acc(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]) {
        for (c, ((r, a), b)) in r
            .chunks_exact_mut(LANES)
            .zip(a.chunks_exact(LANES))
            .zip(b.chunks_exact(LANES))
            .enumerate()
        {
            for p in 0..LANES / 4 {
                let zeta = ZETAS[64 + c * LANES / 4 + p];
                let j = 4 * p;
                let (r0, r1) = ntt::basemul(a[j], a[j + 1], b[j], b[j + 1], zeta);
                let (r2, r3) = ntt::basemul(a[j + 2], a[j + 3], b[j + 2], b[j + 3], -zeta);
                r[j] = r[j].wrapping_add(r0);
                r[j + 1] = r[j + 1].wrapping_add(r1);
                r[j + 2] = r[j + 2].wrapping_add(r2);
                r[j + 3] = r[j + 3].wrapping_add(r3);
            }
        }
    }

    fn compress(r: &mut [u16; N], a: &[i16; N], d: u32) {
        let mask = (1u64 << d) - 1;
        for (out, chunk) in r.chunks_exact_mut(LANES).zip(a.chunks_exact(LANES)) {
            for i in 0..LANES {
                let num = ((csubq(chunk[i]) as u64) << d) + (Q as u64) / 2;
                out[i] = (((num * DIV_Q_40) >> 40) & mask) as u16;
            }
        }
    }

    fn decompress(r: &mut [i16; N], a: &[u16; N], d: u32) {
        let half = 1u32 << (d - 1);
        for (out, chunk) in r.chunks_exact_mut(LANES).zip(a.chunks_exact(LANES)) {
            for i in 0..LANES {
                out[i] = (((chunk[i] as u32) * (Q as u32) + half) >> d) as i16;
            }
        }
    }

    fn cbd_eta2(r: &mut [i16; N], buf: &[u8; ETA2_BYTES]) {
        const M: u64 = 0x5555_5555_5555_5555;
        for (out, word) in r.chunks_exact_mut(LANES).zip(buf.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(word);
            let t = u64::from_le_bytes(bytes);
            let d = (t & M) + ((t >> 1) & M);
            for (j, x) in out.iter_mut().enumerate() {
                let a = ((d >> (4 * j)) & 3) as i16;
                let b = ((d >> (4 * j + 2)) & 3) as i16;
                *x = a - b;
            }
        }
    }

    fn cbd_eta3(r: &mut [i16; N], buf: &[u8; ETA3_BYTES]) {
        const M: u64 = 0x0000_2492_4924_9249;
        for (out, word) in r.chunks_exact_mut(8).zip(buf.chunks_exact(6)) {
            let mut bytes = [0u8; 8];
            bytes[..6].copy_from_slice(word);
            let t = u64::from_le_bytes(bytes);
            let d = (t & M) + ((t >> 1) & M) + ((t >> 2) & M);
            for (j, x) in out.iter_mut().enumerate() {
                let a = ((d >> (6 * j)) & 7) as i16;
                let b = ((d >> (6 * j + 3)) & 7) as i16;
                *x = a - b;
            }
        }
    }
}
