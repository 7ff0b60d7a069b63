use core::ops;

use zeroize::Zeroize;

use super::Polynomial;
use crate::{
    backend, encode,
    error::Error,
    ntt,
    sample::{self, Xof},
    N, POLYBYTES, SYMBYTES,
};

/// Polynomial in NTT (bit-reversed) domain.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NttPolynomial(pub(crate) [i16; N]);

impl NttPolynomial {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0i16; N])
    }

    /// Inverse NTT; result is in Montgomery domain.
    #[must_use]
    pub fn ntt_inverse(mut self) -> Polynomial {
        ntt::inverse_ntt(&mut self.0);
        Polynomial(self.0)
    }

    pub fn reduce(&mut self) {
        backend::dispatch!(reduce(&mut self.0));
    }

    pub fn to_mont(&mut self) {
        backend::dispatch!(to_mont(&mut self.0));
    }

    /// Pointwise basemul: 128 degree-1 multiplications in NTT domain.
    #[must_use]
    pub fn basemul(&self, other: &Self) -> Self {
        let mut r = Self::zero();
        backend::dispatch!(basemul(&mut r.0, &self.0, &other.0));
        r
    }

    /// `self += a ∘ b` without reduction.
    pub fn basemul_acc(&mut self, a: &Self, b: &Self) {
        backend::dispatch!(basemul_acc(&mut self.0, &a.0, &b.0));
    }

    /// Uniform matrix entry from `XOF(seed ‖ x ‖ y)` by rejection sampling.
    pub fn uniform<X: Xof + ?Sized>(
        xof: &X,
        seed: &[u8; SYMBYTES],
        x: u8,
        y: u8,
    ) -> Result<Self, Error> {
        sample::uniform_poly(xof, seed, x, y).map(Self)
    }

    /// Serialize to bytes (12-bit packing, 384 bytes). Coefficients must lie
    /// in `[0, 2q)`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; POLYBYTES] {
        let mut r = [0u8; POLYBYTES];
        encode::coeffs_to_bytes(&mut r, &self.0);
        r
    }

    /// Deserialize from bytes (12-bit unpacking).
    #[must_use]
    pub fn from_bytes(a: &[u8; POLYBYTES]) -> Self {
        let mut p = Self::zero();
        encode::bytes_to_coeffs(&mut p.0, a);
        p
    }

    #[must_use]
    pub const fn coeffs(&self) -> &[i16; N] {
        &self.0
    }

    #[must_use]
    pub fn coeffs_mut(&mut self) -> &mut [i16; N] {
        &mut self.0
    }
}

impl From<[i16; N]> for NttPolynomial {
    #[inline]
    fn from(coeffs: [i16; N]) -> Self {
        Self(coeffs)
    }
}

impl Default for NttPolynomial {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl Zeroize for NttPolynomial {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl core::fmt::Debug for NttPolynomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NttPolynomial")
            .field("coeffs[..4]", &&self.0[..4])
            .finish_non_exhaustive()
    }
}

impl<'b> ops::Add<&'b NttPolynomial> for &NttPolynomial {
    type Output = NttPolynomial;
    #[inline]
    fn add(self, rhs: &'b NttPolynomial) -> NttPolynomial {
        let mut r = NttPolynomial::zero();
        backend::dispatch!(add(&mut r.0, &self.0, &rhs.0));
        r
    }
}

impl ops::AddAssign<&Self> for NttPolynomial {
    #[inline]
    fn add_assign(&mut self, rhs: &Self) {
        backend::dispatch!(add_assign(&mut self.0, &rhs.0));
    }
}
