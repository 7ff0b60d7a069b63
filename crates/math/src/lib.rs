//! `kyber-math`: arithmetic core for Kyber / ML-KEM.
//!
//! `no_std`, zero-allocation polynomial arithmetic over `Z_q[X]/(X^{256}+1)`.
//! Sub-modules cover modular reduction, the Number-Theoretic Transform,
//! polynomial and polynomial-vector arithmetic, compression and byte codecs,
//! CBD and rejection sampling over injected PRF/XOF capabilities, a
//! constant-time comparator, and the backend dispatch that selects between the
//! portable and lane-chunked kernels once per process.

#![no_std]
#![deny(unsafe_code)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod backend;
pub mod compress;
pub mod ct;
pub mod encode;
mod error;
pub mod ntt;
pub mod params;
pub mod poly;
pub mod reduce;
pub mod sample;

pub use backend::{Backend, PolyOps};
pub use compress::{CompressWidth, D1, D4, D5, D10, D11};
pub use error::Error;
pub use params::{Kyber512, Kyber768, Kyber1024, ParameterSet};
pub use poly::{NttMatrix, NttPolynomial, NttVector, Polynomial, Vector};
pub use sample::{CbdWidth, Eta2, Eta3, Prf, Xof, XofReader};

/// Polynomial ring degree.
pub const N: usize = 256;

/// Field modulus.
pub const Q: i16 = 3329;

/// Size in bytes of seeds and messages.
pub const SYMBYTES: usize = 32;

/// Size in bytes of a serialised polynomial (12 bits * 256 / 8).
pub const POLYBYTES: usize = 384;

/// SHAKE-128 rate: bytes produced per XOF squeeze block.
pub const XOF_BLOCK_BYTES: usize = 168;
