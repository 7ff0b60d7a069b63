use core::ops;

use zeroize::Zeroize;

use super::NttPolynomial;
use crate::{
    backend,
    compress::CompressWidth,
    encode,
    error::{check_len, Error},
    ntt,
    sample::CbdWidth,
    N, SYMBYTES,
};

/// Polynomial in standard (coefficient) form over `R_q = Z_q[X]/(X^{256}+1)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Polynomial(pub(crate) [i16; N]);

impl Polynomial {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0i16; N])
    }

    /// Consuming forward NTT transform.
    #[must_use]
    pub fn ntt(mut self) -> NttPolynomial {
        ntt::forward_ntt(&mut self.0);
        NttPolynomial(self.0)
    }

    /// Barrett-reduce every coefficient into `[0, q]`.
    pub fn reduce(&mut self) {
        backend::dispatch!(reduce(&mut self.0));
    }

    /// Map coefficients in `[0, 2q)` onto canonical `[0, q)`.
    pub fn csubq(&mut self) {
        backend::dispatch!(csubq(&mut self.0));
    }

    /// Compress to `D` bits and pack into `r`, which must hold exactly
    /// `D::POLY_BYTES`. Coefficients must lie in `[0, 2q)`.
    pub fn compress<D: CompressWidth>(&self, r: &mut [u8]) -> Result<(), Error> {
        check_len(D::POLY_BYTES, r.len())?;
        D::compress_poly(r, &self.0);
        Ok(())
    }

    /// Decompress a `D`-bit packed polynomial.
    pub fn decompress<D: CompressWidth>(a: &[u8]) -> Result<Self, Error> {
        check_len(D::POLY_BYTES, a.len())?;
        let mut p = Self::zero();
        D::decompress_poly(&mut p.0, a);
        Ok(p)
    }

    /// Decode a 32-byte message: bit 0 -> 0, bit 1 -> `(q+1)/2`.
    #[must_use]
    pub fn from_message(msg: &[u8; SYMBYTES]) -> Self {
        let mut p = Self::zero();
        encode::message_to_coeffs(&mut p.0, msg);
        p
    }

    /// Encode polynomial to 32-byte message.
    #[must_use]
    pub fn to_message(&self) -> [u8; SYMBYTES] {
        let mut msg = [0u8; SYMBYTES];
        encode::coeffs_to_message(&mut msg, &self.0);
        msg
    }

    /// Sample noise polynomial via the sealed [`CbdWidth`] trait.
    #[must_use]
    pub fn sample_cbd<Eta: CbdWidth>(buf: &Eta::Buf) -> Self {
        let mut p = Self::zero();
        Eta::sample(&mut p.0, buf);
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

impl From<[i16; N]> for Polynomial {
    #[inline]
    fn from(coeffs: [i16; N]) -> Self {
        Self(coeffs)
    }
}

impl Default for Polynomial {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl Zeroize for Polynomial {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl core::fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Polynomial")
            .field("coeffs[..4]", &&self.0[..4])
            .finish_non_exhaustive()
    }
}

impl<'b> ops::Add<&'b Polynomial> for &Polynomial {
    type Output = Polynomial;
    #[inline]
    fn add(self, rhs: &'b Polynomial) -> Polynomial {
        let mut r = Polynomial::zero();
        backend::dispatch!(add(&mut r.0, &self.0, &rhs.0));
        r
    }
}

impl<'b> ops::Sub<&'b Polynomial> for &Polynomial {
    type Output = Polynomial;
    #[inline]
    fn sub(self, rhs: &'b Polynomial) -> Polynomial {
        let mut r = Polynomial::zero();
        backend::dispatch!(sub(&mut r.0, &self.0, &rhs.0));
        r
    }
}

impl ops::AddAssign<&Self> for Polynomial {
    #[inline]
    fn add_assign(&mut self, rhs: &Self) {
        backend::dispatch!(add_assign(&mut self.0, &rhs.0));
    }
}

impl ops::SubAssign<&Self> for Polynomial {
    #[inline]
    fn sub_assign(&mut self, rhs: &Self) {
        let lhs = self.0;
        backend::dispatch!(sub(&mut self.0, &lhs, &rhs.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compress::D4, Q};

    #[test]
    fn add_sub_inverse() {
        let mut a = Polynomial::zero();
        let mut b = Polynomial::zero();
        for i in 0..N {
            a.0[i] = (i as i16) % Q;
            b.0[i] = ((N - i) as i16) % Q;
        }
        let sum = &a + &b;
        let recovered = &sum - &b;
        assert_eq!(a.0, recovered.0);

        let mut c = sum;
        c -= &b;
        assert_eq!(c, a);
        c += &b;
        assert_eq!(c, sum);
    }

    #[test]
    fn msg_roundtrip() {
        let msg: [u8; SYMBYTES] = core::array::from_fn(|i| (i * 37) as u8);
        let p = Polynomial::from_message(&msg);
        assert_eq!(p.to_message(), msg);
    }

    #[test]
    fn compress_checks_buffer_length() {
        let p = Polynomial::zero();
        let mut short = [0u8; 127];
        assert_eq!(
            p.compress::<D4>(&mut short),
            Err(Error::InvalidLength {
                expected: 128,
                actual: 127
            })
        );
        assert!(Polynomial::decompress::<D4>(&[0u8; 129]).is_err());
    }

    #[test]
    fn reduce_then_csubq_is_canonical() {
        let mut p = Polynomial::from(core::array::from_fn(|i| (i as i16 * 120) - 15_000));
        p.reduce();
        p.csubq();
        assert!(p.coeffs().iter().all(|c| (0..Q).contains(c)));
    }

    #[test]
    fn zeroize_clears() {
        let mut p = Polynomial::from([5i16; N]);
        p.zeroize();
        assert_eq!(p, Polynomial::zero());
    }
}
