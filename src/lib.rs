//! `kyber-core`: the Kyber / ML-KEM arithmetic engine with SHAKE bound in.
//!
//! [`math`] is the `no_std` core: reduction, NTT, sampling, compression and
//! codecs over injected PRF/XOF capabilities. [`hash`] supplies SHAKE-128 and
//! SHAKE-256 for those capabilities. The functions here wire the two together
//! for callers that just want the standard primitives.

#![deny(unsafe_code)]

pub use kyber_hash as hash;
pub use kyber_math as math;
pub use kyber_math::{
    ct::{ct_cmov, ct_compare},
    sample::Noise,
    Backend, CbdWidth, CompressWidth, Error, Eta2, Eta3, Kyber1024, Kyber512, Kyber768,
    NttMatrix, NttPolynomial, NttVector, ParameterSet, Polynomial, Vector, D1, D10, D11, D4, D5,
    N, POLYBYTES, Q, SYMBYTES,
};

use kyber_hash::{Shake128Xof, Shake256Prf};

/// `CBD_η(SHAKE-256(seed ‖ nonce))`.
pub fn get_noise<Eta: CbdWidth>(seed: &[u8; SYMBYTES], nonce: u8) -> Result<Polynomial, Error> {
    kyber_math::sample::get_noise::<Eta, _>(&Shake256Prf, seed, nonce)
}

/// The public matrix `A` (or `Aᵀ`) expanded from `seed` with SHAKE-128.
pub fn gen_matrix<const K: usize>(
    seed: &[u8; SYMBYTES],
    transposed: bool,
) -> Result<NttMatrix<K>, Error> {
    NttMatrix::generate(&Shake128Xof, seed, transposed)
}

/// The key-generation (`with_poly == false`) or encryption
/// (`with_poly == true`) noise draw for parameter set `P`.
pub fn sample_noise<P: ParameterSet, const K: usize>(
    seed: &[u8; SYMBYTES],
    with_poly: bool,
) -> Result<Noise<K>, Error> {
    kyber_math::sample::sample_noise::<P, _, K>(&Shake256Prf, seed, with_poly)
}

/// Kernel family this process dispatches to.
#[must_use]
pub fn backend() -> Backend {
    Backend::active()
}
