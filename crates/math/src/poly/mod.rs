//! Domain-separated polynomial types.
//!
//! [`Polynomial`] holds coefficients in standard order, [`NttPolynomial`] in
//! bit-reversed NTT order; the only way between them is the consuming
//! transform. Vectors and the public matrix are fixed-size arrays of these.

mod ntt_poly;
mod polynomial;
mod polyvec;

pub use ntt_poly::NttPolynomial;
pub use polynomial::Polynomial;
pub use polyvec::{NttMatrix, NttVector, Vector};
