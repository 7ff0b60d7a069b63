//! Kyber parameter sets. [`ParameterSet`] trait and marker types
//! [`Kyber512`], [`Kyber768`], [`Kyber1024`].
//!
//! Everything that varies between the sets (rank, noise widths, ciphertext
//! compression widths) is carried as an associated const or type, so the
//! arithmetic kernels are shared and monomorphised per set.

use crate::{
    compress::{CompressWidth, CompressWidthParams, D10, D11, D4, D5},
    sample::{CbdWidth, Eta2, Eta3},
    N, POLYBYTES, SYMBYTES,
};

/// Kyber parameter set implemented by [`Kyber512`], [`Kyber768`],
/// [`Kyber1024`].
pub trait ParameterSet: 'static {
    /// Module rank (k = 2, 3, or 4).
    const K: usize;

    /// CBD width for secrets and key-generation errors.
    type Eta1: CbdWidth;
    /// CBD width for encryption errors.
    type Eta2: CbdWidth;
    /// Compression width for the ciphertext vector `u`.
    type Du: CompressWidth;
    /// Compression width for the ciphertext polynomial `v`.
    type Dv: CompressWidth;

    /// K * POLYBYTES - serialised polynomial vector.
    const POLYVEC_BYTES: usize = Self::K * POLYBYTES;
    /// Compressed bytes for the polynomial vector (K * N * D_U / 8).
    const POLYVEC_COMPRESSED_BYTES: usize;
    /// Compressed bytes for one polynomial (N * D_V / 8).
    const POLY_COMPRESSED_BYTES: usize;
    /// Public key bytes (POLYVEC_BYTES + SYMBYTES).
    const PUBLIC_KEY_BYTES: usize;
    /// Ciphertext bytes.
    const CIPHERTEXT_BYTES: usize;
}

/// Kyber-512 parameter set (k = 2, NIST security level 1).
#[derive(Debug, Clone, Copy)]
pub struct Kyber512;

impl ParameterSet for Kyber512 {
    const K: usize = 2;

    type Eta1 = Eta3;
    type Eta2 = Eta2;
    type Du = D10;
    type Dv = D4;

    const POLYVEC_COMPRESSED_BYTES: usize = 640; // 2 * 256 * 10 / 8
    const POLY_COMPRESSED_BYTES: usize = 128; // 256 * 4 / 8
    const PUBLIC_KEY_BYTES: usize = 800; // 768 + 32
    const CIPHERTEXT_BYTES: usize = 768; // 640 + 128
}

/// Kyber-768 parameter set (k = 3, NIST security level 3).
#[derive(Debug, Clone, Copy)]
pub struct Kyber768;

impl ParameterSet for Kyber768 {
    const K: usize = 3;

    type Eta1 = Eta2;
    type Eta2 = Eta2;
    type Du = D10;
    type Dv = D4;

    const POLYVEC_COMPRESSED_BYTES: usize = 960; // 3 * 256 * 10 / 8
    const POLY_COMPRESSED_BYTES: usize = 128;
    const PUBLIC_KEY_BYTES: usize = 1184; // 1152 + 32
    const CIPHERTEXT_BYTES: usize = 1088; // 960 + 128
}

/// Kyber-1024 parameter set (k = 4, NIST security level 5).
#[derive(Debug, Clone, Copy)]
pub struct Kyber1024;

impl ParameterSet for Kyber1024 {
    const K: usize = 4;

    type Eta1 = Eta2;
    type Eta2 = Eta2;
    type Du = D11;
    type Dv = D5;

    const POLYVEC_COMPRESSED_BYTES: usize = 1408; // 4 * 256 * 11 / 8
    const POLY_COMPRESSED_BYTES: usize = 160; // 256 * 5 / 8
    const PUBLIC_KEY_BYTES: usize = 1568; // 1536 + 32
    const CIPHERTEXT_BYTES: usize = 1568; // 1408 + 160
}

const fn check_params<P: ParameterSet>() {
    assert!(P::POLYVEC_BYTES == P::K * POLYBYTES);
    assert!(P::POLYVEC_COMPRESSED_BYTES == P::K * <P::Du as CompressWidthParams>::POLY_BYTES);
    assert!(P::POLY_COMPRESSED_BYTES == <P::Dv as CompressWidthParams>::POLY_BYTES);
    assert!(P::POLY_COMPRESSED_BYTES == N * <P::Dv as CompressWidthParams>::D as usize / 8);
    assert!(P::PUBLIC_KEY_BYTES == P::POLYVEC_BYTES + SYMBYTES);
    assert!(P::CIPHERTEXT_BYTES == P::POLYVEC_COMPRESSED_BYTES + P::POLY_COMPRESSED_BYTES);
}

const _: () = {
    check_params::<Kyber512>();
    check_params::<Kyber768>();
    check_params::<Kyber1024>();

    assert!(<<Kyber512 as ParameterSet>::Eta1 as CbdWidth>::ETA == 3);
    assert!(<<Kyber768 as ParameterSet>::Eta1 as CbdWidth>::ETA == 2);
};
