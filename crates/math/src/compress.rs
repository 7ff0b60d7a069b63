//! Sealed compression-width traits and compress/decompress operations.
//!
//! Each compression width (D=1,4,5,10,11) is a zero-sized marker type
//! implementing [`CompressWidth`], so the width is fixed at compile time and
//! the bit-packing layout is chosen without runtime branching. Values are
//! packed least-significant-bit first and may straddle byte boundaries.

use crate::{backend, N, Q, SYMBYTES};

mod sealed {
    pub trait Sealed {}
}

pub trait CompressWidthParams: sealed::Sealed {
    /// Bits per compressed coefficient.
    const D: u32;
    /// Packed bytes per polynomial, `N * D / 8`.
    const POLY_BYTES: usize;
}

pub trait CompressWidth: CompressWidthParams {
    /// Compress `coeffs` (each in `[0, 2q)`) and pack into `r[..POLY_BYTES]`.
    fn compress_poly(r: &mut [u8], coeffs: &[i16; N]);
    /// Unpack `a[..POLY_BYTES]` and decompress into `coeffs`.
    fn decompress_poly(coeffs: &mut [i16; N], a: &[u8]);
}

macro_rules! compress_width {
    ($($name:ident: $d:expr, $poly_bytes:expr),*) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name;
            impl sealed::Sealed for $name {}
            impl CompressWidthParams for $name {
                const D: u32 = $d;
                const POLY_BYTES: usize = $poly_bytes;
            }
        )*
    };
}

compress_width!(
    D1: 1, SYMBYTES,
    D4: 4, 128,
    D5: 5, 160,
    D10: 10, 320,
    D11: 11, 352
);

const _: () = {
    assert!(D1::POLY_BYTES == N * D1::D as usize / 8);
    assert!(D4::POLY_BYTES == N * D4::D as usize / 8);
    assert!(D5::POLY_BYTES == N * D5::D as usize / 8);
    assert!(D10::POLY_BYTES == N * D10::D as usize / 8);
    assert!(D11::POLY_BYTES == N * D11::D as usize / 8);
};

/// Compress every coefficient to `D` bits through the active backend.
#[inline]
fn compress_coeffs<D: CompressWidthParams>(a: &[i16; N]) -> [u16; N] {
    debug_assert!(
        a.iter().all(|c| (0..2 * Q).contains(c)),
        "compress input outside [0, 2q)"
    );
    let mut t = [0u16; N];
    backend::dispatch!(compress(&mut t, a, D::D));
    t
}

#[inline]
fn decompress_coeffs<D: CompressWidthParams>(r: &mut [i16; N], t: &[u16; N]) {
    backend::dispatch!(decompress(r, t, D::D));
}

impl CompressWidth for D1 {
    /// `to_msg`: one bit per coefficient, set when the coefficient is closer
    /// to `q/2` than to 0.
    fn compress_poly(r: &mut [u8], a: &[i16; N]) {
        debug_assert!(r.len() >= Self::POLY_BYTES);
        let t = compress_coeffs::<Self>(a);
        for (byte, chunk) in r.iter_mut().zip(t.chunks_exact(8)) {
            let mut b = 0u8;
            for (j, &c) in chunk.iter().enumerate() {
                b |= (c as u8) << j;
            }
            *byte = b;
        }
    }

    /// `from_msg`: bit 0 maps to 0, bit 1 to `(q+1)/2`, via a sign mask.
    fn decompress_poly(r: &mut [i16; N], msg: &[u8]) {
        debug_assert!(msg.len() >= Self::POLY_BYTES);
        for (chunk, &byte) in r.chunks_exact_mut(8).zip(msg) {
            for (j, c) in chunk.iter_mut().enumerate() {
                let mask = 0i16.wrapping_sub(((byte >> j) & 1) as i16);
                *c = mask & ((Q + 1) / 2);
            }
        }
    }
}

impl CompressWidth for D4 {
    fn compress_poly(r: &mut [u8], a: &[i16; N]) {
        debug_assert!(r.len() >= Self::POLY_BYTES);
        let t = compress_coeffs::<Self>(a);
        for (byte, pair) in r.iter_mut().zip(t.chunks_exact(2)) {
            *byte = (pair[0] as u8) | ((pair[1] as u8) << 4);
        }
    }

    fn decompress_poly(r: &mut [i16; N], a: &[u8]) {
        debug_assert!(a.len() >= Self::POLY_BYTES);
        let mut t = [0u16; N];
        for (pair, &byte) in t.chunks_exact_mut(2).zip(a) {
            pair[0] = (byte & 0x0F) as u16;
            pair[1] = (byte >> 4) as u16;
        }
        decompress_coeffs::<Self>(r, &t);
    }
}

impl CompressWidth for D5 {
    fn compress_poly(r: &mut [u8], a: &[i16; N]) {
        debug_assert!(r.len() >= Self::POLY_BYTES);
        let t = compress_coeffs::<Self>(a);
        for (o, s) in r.chunks_exact_mut(5).zip(t.chunks_exact(8)) {
            let s: [u8; 8] = core::array::from_fn(|i| s[i] as u8);
            o[0] = s[0] | (s[1] << 5);
            o[1] = (s[1] >> 3) | (s[2] << 2) | (s[3] << 7);
            o[2] = (s[3] >> 1) | (s[4] << 4);
            o[3] = (s[4] >> 4) | (s[5] << 1) | (s[6] << 6);
            o[4] = (s[6] >> 2) | (s[7] << 3);
        }
    }

    fn decompress_poly(r: &mut [i16; N], a: &[u8]) {
        debug_assert!(a.len() >= Self::POLY_BYTES);
        let mut t = [0u16; N];
        for (o, b) in t.chunks_exact_mut(8).zip(a.chunks_exact(5)) {
            let v = [
                b[0] & 0x1F,
                (b[0] >> 5) | ((b[1] & 0x03) << 3),
                (b[1] >> 2) & 0x1F,
                (b[1] >> 7) | ((b[2] & 0x0F) << 1),
                (b[2] >> 4) | ((b[3] & 0x01) << 4),
                (b[3] >> 1) & 0x1F,
                (b[3] >> 6) | ((b[4] & 0x07) << 2),
                b[4] >> 3,
            ];
            for (o, v) in o.iter_mut().zip(v) {
                *o = v as u16;
            }
        }
        decompress_coeffs::<Self>(r, &t);
    }
}

impl CompressWidth for D10 {
    fn compress_poly(r: &mut [u8], a: &[i16; N]) {
        debug_assert!(r.len() >= Self::POLY_BYTES);
        let t = compress_coeffs::<Self>(a);
        for (o, s) in r.chunks_exact_mut(5).zip(t.chunks_exact(4)) {
            o[0] = s[0] as u8;
            o[1] = ((s[0] >> 8) | (s[1] << 2)) as u8;
            o[2] = ((s[1] >> 6) | (s[2] << 4)) as u8;
            o[3] = ((s[2] >> 4) | (s[3] << 6)) as u8;
            o[4] = (s[3] >> 2) as u8;
        }
    }

    fn decompress_poly(r: &mut [i16; N], a: &[u8]) {
        debug_assert!(a.len() >= Self::POLY_BYTES);
        let mut t = [0u16; N];
        for (o, b) in t.chunks_exact_mut(4).zip(a.chunks_exact(5)) {
            let b: [u16; 5] = core::array::from_fn(|i| b[i] as u16);
            o[0] = b[0] | ((b[1] & 0x03) << 8);
            o[1] = (b[1] >> 2) | ((b[2] & 0x0F) << 6);
            o[2] = (b[2] >> 4) | ((b[3] & 0x3F) << 4);
            o[3] = (b[3] >> 6) | (b[4] << 2);
        }
        decompress_coeffs::<Self>(r, &t);
    }
}

impl CompressWidth for D11 {
    fn compress_poly(r: &mut [u8], a: &[i16; N]) {
        debug_assert!(r.len() >= Self::POLY_BYTES);
        let t = compress_coeffs::<Self>(a);
        for (o, s) in r.chunks_exact_mut(11).zip(t.chunks_exact(8)) {
            o[0] = s[0] as u8;
            o[1] = ((s[0] >> 8) | (s[1] << 3)) as u8;
            o[2] = ((s[1] >> 5) | (s[2] << 6)) as u8;
            o[3] = (s[2] >> 2) as u8;
            o[4] = ((s[2] >> 10) | (s[3] << 1)) as u8;
            o[5] = ((s[3] >> 7) | (s[4] << 4)) as u8;
            o[6] = ((s[4] >> 4) | (s[5] << 7)) as u8;
            o[7] = (s[5] >> 1) as u8;
            o[8] = ((s[5] >> 9) | (s[6] << 2)) as u8;
            o[9] = ((s[6] >> 6) | (s[7] << 5)) as u8;
            o[10] = (s[7] >> 3) as u8;
        }
    }

    fn decompress_poly(r: &mut [i16; N], a: &[u8]) {
        debug_assert!(a.len() >= Self::POLY_BYTES);
        let mut t = [0u16; N];
        for (o, b) in t.chunks_exact_mut(8).zip(a.chunks_exact(11)) {
            let b: [u16; 11] = core::array::from_fn(|i| b[i] as u16);
            o[0] = b[0] | ((b[1] & 0x07) << 8);
            o[1] = (b[1] >> 3) | ((b[2] & 0x3F) << 5);
            o[2] = (b[2] >> 6) | (b[3] << 2) | ((b[4] & 0x01) << 10);
            o[3] = (b[4] >> 1) | ((b[5] & 0x0F) << 7);
            o[4] = (b[5] >> 4) | ((b[6] & 0x7F) << 4);
            o[5] = (b[6] >> 7) | (b[7] << 1) | ((b[8] & 0x03) << 9);
            o[6] = (b[8] >> 2) | ((b[9] & 0x1F) << 6);
            o[7] = (b[9] >> 5) | (b[10] << 3);
        }
        decompress_coeffs::<Self>(r, &t);
    }
}
