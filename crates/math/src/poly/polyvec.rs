use core::ops;

use zeroize::Zeroize;

use super::{NttPolynomial, Polynomial};
use crate::{
    compress::CompressWidth,
    error::{check_len, Error},
    sample::Xof,
    POLYBYTES, SYMBYTES,
};

/// A vector of `K` polynomials in standard (coefficient) form.
#[derive(Clone, PartialEq, Eq)]
pub struct Vector<const K: usize> {
    pub(crate) polys: [Polynomial; K],
}

/// A vector of `K` polynomials in NTT domain.
#[derive(Clone, PartialEq, Eq)]
pub struct NttVector<const K: usize> {
    pub(crate) polys: [NttPolynomial; K],
}

impl<const K: usize> Vector<K> {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            polys: [Polynomial::zero(); K],
        }
    }

    #[must_use]
    pub fn ntt(self) -> NttVector<K> {
        let polys = self.polys.map(Polynomial::ntt);
        NttVector { polys }
    }

    pub fn reduce(&mut self) {
        for p in &mut self.polys {
            p.reduce();
        }
    }

    /// Compress every polynomial to `D` bits, concatenated into `r`
    /// (`K * D::POLY_BYTES` bytes).
    pub fn compress<D: CompressWidth>(&self, r: &mut [u8]) -> Result<(), Error> {
        check_len(K * D::POLY_BYTES, r.len())?;
        for (p, out) in self.polys.iter().zip(r.chunks_exact_mut(D::POLY_BYTES)) {
            D::compress_poly(out, &p.0);
        }
        Ok(())
    }

    pub fn decompress<D: CompressWidth>(a: &[u8]) -> Result<Self, Error> {
        check_len(K * D::POLY_BYTES, a.len())?;
        let mut v = Self::zero();
        for (p, chunk) in v.polys.iter_mut().zip(a.chunks_exact(D::POLY_BYTES)) {
            D::decompress_poly(&mut p.0, chunk);
        }
        Ok(v)
    }

    #[must_use]
    pub const fn polys(&self) -> &[Polynomial; K] {
        &self.polys
    }

    #[must_use]
    pub fn polys_mut(&mut self) -> &mut [Polynomial; K] {
        &mut self.polys
    }
}

impl<const K: usize> NttVector<K> {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            polys: [NttPolynomial::zero(); K],
        }
    }

    #[must_use]
    pub fn ntt_inverse(self) -> Vector<K> {
        let polys = self.polys.map(NttPolynomial::ntt_inverse);
        Vector { polys }
    }

    pub fn reduce(&mut self) {
        for p in &mut self.polys {
            p.reduce();
        }
    }

    /// `sum_i(self[i] ∘ other[i])` in NTT domain, unreduced.
    ///
    /// The first product initialises the accumulator, the rest are added.
    /// Sums stay inside `i16` for K <= 4 and feed straight into the inverse
    /// NTT or a Barrett pass.
    #[must_use]
    pub fn pointwise_acc(&self, other: &Self) -> NttPolynomial {
        let mut acc = NttPolynomial::zero();
        for (i, (a, b)) in self.polys.iter().zip(other.polys.iter()).enumerate() {
            if i == 0 {
                acc = a.basemul(b);
            } else {
                acc.basemul_acc(a, b);
            }
        }
        acc
    }

    /// Serialize to `K * 384` bytes (12-bit packing).
    pub fn to_bytes(&self, r: &mut [u8]) -> Result<(), Error> {
        check_len(K * POLYBYTES, r.len())?;
        for (p, out) in self.polys.iter().zip(r.chunks_exact_mut(POLYBYTES)) {
            out.copy_from_slice(&p.to_bytes());
        }
        Ok(())
    }

    pub fn from_bytes(a: &[u8]) -> Result<Self, Error> {
        check_len(K * POLYBYTES, a.len())?;
        let mut v = Self::zero();
        for (p, chunk) in v.polys.iter_mut().zip(a.chunks_exact(POLYBYTES)) {
            crate::encode::bytes_to_coeffs(&mut p.0, chunk);
        }
        Ok(v)
    }

    #[must_use]
    pub const fn polys(&self) -> &[NttPolynomial; K] {
        &self.polys
    }

    #[must_use]
    pub fn polys_mut(&mut self) -> &mut [NttPolynomial; K] {
        &mut self.polys
    }
}

/// K x K matrix of NTT-domain polynomials (public matrix A).
#[derive(Clone, PartialEq, Eq)]
pub struct NttMatrix<const K: usize> {
    pub(crate) rows: [NttVector<K>; K],
}

impl<const K: usize> NttMatrix<K> {
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self {
            rows: core::array::from_fn(|_| NttVector::zero()),
        }
    }

    /// Expand `seed` into `A` (or `Aᵀ` when `transposed`).
    ///
    /// Entry `(i, j)` is sampled from `XOF(seed ‖ j ‖ i)`, or from
    /// `XOF(seed ‖ i ‖ j)` when transposed, so the transposed matrix is the
    /// same set of polynomials with rows and columns swapped.
    pub fn generate<X: Xof + ?Sized>(
        xof: &X,
        seed: &[u8; SYMBYTES],
        transposed: bool,
    ) -> Result<Self, Error> {
        let mut m = Self::zero();
        for (i, row) in m.rows.iter_mut().enumerate() {
            for (j, entry) in row.polys.iter_mut().enumerate() {
                *entry = Self::entry(xof, seed, i as u8, j as u8, transposed)?;
            }
        }
        Ok(m)
    }

    /// A single entry of [`NttMatrix::generate`].
    pub fn entry<X: Xof + ?Sized>(
        xof: &X,
        seed: &[u8; SYMBYTES],
        row: u8,
        col: u8,
        transposed: bool,
    ) -> Result<NttPolynomial, Error> {
        if transposed {
            NttPolynomial::uniform(xof, seed, row, col)
        } else {
            NttPolynomial::uniform(xof, seed, col, row)
        }
    }

    /// `A * v` with Montgomery conversion on each result row.
    #[must_use]
    pub fn mul_vec_tomont(&self, v: &NttVector<K>) -> NttVector<K> {
        let mut result = self.mul_vec(v);
        for p in &mut result.polys {
            p.to_mont();
        }
        result
    }

    /// `A * v`, each row an unreduced [`NttVector::pointwise_acc`].
    #[must_use]
    pub fn mul_vec(&self, v: &NttVector<K>) -> NttVector<K> {
        let mut result = NttVector::zero();
        for (r_poly, a_row) in result.polys.iter_mut().zip(self.rows.iter()) {
            *r_poly = a_row.pointwise_acc(v);
        }
        result
    }

    #[must_use]
    pub const fn rows(&self) -> &[NttVector<K>; K] {
        &self.rows
    }
}

impl<'b, const K: usize> ops::Add<&'b Vector<K>> for &Vector<K> {
    type Output = Vector<K>;
    fn add(self, rhs: &'b Vector<K>) -> Vector<K> {
        let mut r = Vector::zero();
        for ((r, a), b) in r.polys.iter_mut().zip(&self.polys).zip(&rhs.polys) {
            *r = a + b;
        }
        r
    }
}

impl<const K: usize> ops::AddAssign<&Self> for Vector<K> {
    fn add_assign(&mut self, rhs: &Self) {
        for (a, b) in self.polys.iter_mut().zip(&rhs.polys) {
            *a += b;
        }
    }
}

impl<const K: usize> ops::AddAssign<&Self> for NttVector<K> {
    fn add_assign(&mut self, rhs: &Self) {
        for (a, b) in self.polys.iter_mut().zip(&rhs.polys) {
            *a += b;
        }
    }
}

impl<const K: usize> Default for Vector<K> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const K: usize> Default for NttVector<K> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const K: usize> Zeroize for Vector<K> {
    fn zeroize(&mut self) {
        for p in &mut self.polys {
            p.zeroize();
        }
    }
}

impl<const K: usize> Zeroize for NttVector<K> {
    fn zeroize(&mut self) {
        for p in &mut self.polys {
            p.zeroize();
        }
    }
}

impl<const K: usize> core::fmt::Debug for Vector<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.polys.iter()).finish()
    }
}

impl<const K: usize> core::fmt::Debug for NttVector<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.polys.iter()).finish()
    }
}

impl<const K: usize> core::fmt::Debug for NttMatrix<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NttMatrix").field("k", &K).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compress::D10, sample::XofReader, N, Q, XOF_BLOCK_BYTES};

    /// Counter-mode stand-in for SHAKE-128, distinct per `(x, y)`.
    struct CounterXof;

    struct CounterReader {
        state: u32,
    }

    impl XofReader for CounterReader {
        fn squeeze_block(&mut self, block: &mut [u8; XOF_BLOCK_BYTES]) -> Result<(), Error> {
            for b in block.iter_mut() {
                self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                *b = (self.state >> 16) as u8;
            }
            Ok(())
        }
    }

    impl Xof for CounterXof {
        type Reader = CounterReader;

        fn absorb(&self, seed: &[u8; SYMBYTES], x: u8, y: u8) -> Result<CounterReader, Error> {
            let state = seed.iter().fold(0u32, |acc, &b| acc.rotate_left(5) ^ b as u32);
            Ok(CounterReader {
                state: state ^ ((x as u32) << 8) ^ ((y as u32) << 20),
            })
        }
    }

    #[test]
    fn tobytes_frombytes_roundtrip() {
        let mut v = NttVector::<3>::zero();
        for k in 0..3 {
            for i in 0..N {
                v.polys[k].0[i] = ((k * N + i) as i16 * 7) % Q;
            }
        }
        let mut buf = [0u8; 3 * POLYBYTES];
        v.to_bytes(&mut buf).expect("exact length");
        let v2 = NttVector::<3>::from_bytes(&buf).expect("exact length");
        assert_eq!(v, v2);
        assert!(NttVector::<3>::from_bytes(&buf[1..]).is_err());
    }

    #[test]
    fn add_zero_identity() {
        let mut v = Vector::<2>::zero();
        v.polys[0].0[0] = 42;
        v.polys[1].0[255] = 100;
        let zero = Vector::<2>::zero();
        let result = &v + &zero;
        assert_eq!(result, v);
    }

    #[test]
    fn compress_vector_concatenates_polys() {
        let mut v = Vector::<2>::zero();
        v.polys[1].0[0] = Q / 2;
        let mut buf = [0u8; 2 * 320];
        v.compress::<D10>(&mut buf).expect("exact length");
        assert!(buf[..320].iter().all(|&b| b == 0));
        assert!(buf[320..].iter().any(|&b| b != 0));
        let back = Vector::<2>::decompress::<D10>(&buf).expect("exact length");
        assert_eq!(back.polys[0], Polynomial::zero());
        assert!((back.polys[1].0[0] - Q / 2).abs() <= 2);
    }

    #[test]
    fn pointwise_acc_first_entry_initialises() {
        let a = NttVector::<1> {
            polys: [NttPolynomial::from([3i16; N])],
        };
        let b = NttVector::<1> {
            polys: [NttPolynomial::from([5i16; N])],
        };
        assert_eq!(a.pointwise_acc(&b), a.polys[0].basemul(&b.polys[0]));
    }

    #[test]
    fn transposed_matrix_swaps_indices() {
        let seed = [0x42u8; SYMBYTES];
        let a = NttMatrix::<3>::generate(&CounterXof, &seed, false).expect("matrix");
        let at = NttMatrix::<3>::generate(&CounterXof, &seed, true).expect("matrix");
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(a.rows[i].polys[j], at.rows[j].polys[i], "({i}, {j})");
            }
        }
        assert_ne!(a.rows[0].polys[1], a.rows[1].polys[0]);
    }

    #[test]
    fn matrix_entries_are_uniform_range() {
        let seed = [1u8; SYMBYTES];
        let a = NttMatrix::<2>::generate(&CounterXof, &seed, false).expect("matrix");
        for row in a.rows() {
            for p in row.polys() {
                assert!(p.coeffs().iter().all(|c| (0..Q).contains(c)));
            }
        }
    }
}
