//! Deterministic sampling: sealed CBD noise widths, the injected PRF/XOF
//! capabilities, rejection-uniform matrix entries and the protocol noise
//! sequence.

use zeroize::Zeroize;

use crate::{
    backend::{self, ETA2_BYTES, ETA3_BYTES},
    error::Error,
    params::ParameterSet,
    poly::{Polynomial, Vector},
    N, Q, SYMBYTES, XOF_BLOCK_BYTES,
};

/// Upper bound on XOF blocks squeezed for one matrix entry.
///
/// A healthy XOF needs 3 blocks with overwhelming probability (each block
/// yields 112 candidates, ~81% accepted); hitting this cap means the source
/// is broken.
pub const MAX_XOF_BLOCKS: usize = 64;

/// Keyed pseudo-random function, SHAKE-256 shaped: `PRF(seed ‖ nonce)`.
pub trait Prf {
    /// Fill `out` with PRF output for `seed ‖ nonce`.
    fn prf(&self, seed: &[u8; SYMBYTES], nonce: u8, out: &mut [u8]) -> Result<(), Error>;
}

/// Squeeze side of an absorbed XOF.
pub trait XofReader {
    /// Produce the next [`XOF_BLOCK_BYTES`] of output.
    fn squeeze_block(&mut self, block: &mut [u8; XOF_BLOCK_BYTES]) -> Result<(), Error>;
}

/// Extendable-output function, SHAKE-128 shaped: absorbs `seed ‖ x ‖ y`.
pub trait Xof {
    type Reader: XofReader;

    fn absorb(&self, seed: &[u8; SYMBYTES], x: u8, y: u8) -> Result<Self::Reader, Error>;
}

impl<T: Prf + ?Sized> Prf for &T {
    #[inline]
    fn prf(&self, seed: &[u8; SYMBYTES], nonce: u8, out: &mut [u8]) -> Result<(), Error> {
        (**self).prf(seed, nonce, out)
    }
}

impl<T: Xof + ?Sized> Xof for &T {
    type Reader = T::Reader;

    #[inline]
    fn absorb(&self, seed: &[u8; SYMBYTES], x: u8, y: u8) -> Result<Self::Reader, Error> {
        (**self).absorb(seed, x, y)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Sealed trait for CBD noise sampling width.
pub trait CbdWidth: sealed::Sealed {
    const ETA: usize;
    const BUF_BYTES: usize;

    /// PRF output buffer of exactly `BUF_BYTES`.
    type Buf: AsRef<[u8]> + AsMut<[u8]> + Zeroize;

    fn zeroed_buf() -> Self::Buf;

    fn sample(r: &mut [i16; N], buf: &Self::Buf);
}

#[derive(Debug, Clone, Copy)]
pub struct Eta2;
#[derive(Debug, Clone, Copy)]
pub struct Eta3;

impl sealed::Sealed for Eta2 {}
impl CbdWidth for Eta2 {
    const ETA: usize = 2;
    const BUF_BYTES: usize = ETA2_BYTES;

    type Buf = [u8; ETA2_BYTES];

    #[inline]
    fn zeroed_buf() -> Self::Buf {
        [0u8; ETA2_BYTES]
    }

    #[inline]
    fn sample(r: &mut [i16; N], buf: &Self::Buf) {
        backend::dispatch!(cbd_eta2(r, buf));
    }
}

impl sealed::Sealed for Eta3 {}
impl CbdWidth for Eta3 {
    const ETA: usize = 3;
    const BUF_BYTES: usize = ETA3_BYTES;

    type Buf = [u8; ETA3_BYTES];

    #[inline]
    fn zeroed_buf() -> Self::Buf {
        [0u8; ETA3_BYTES]
    }

    #[inline]
    fn sample(r: &mut [i16; N], buf: &Self::Buf) {
        backend::dispatch!(cbd_eta3(r, buf));
    }
}

/// Parse one block of XOF output into `r[ctr..]`, returning the new count.
///
/// Every three bytes give two 12-bit little-endian candidates; those below q
/// are kept in order.
fn rej_uniform_block(r: &mut [i16; N], mut ctr: usize, buf: &[u8; XOF_BLOCK_BYTES]) -> usize {
    for b in buf.chunks_exact(3) {
        if ctr == N {
            break;
        }
        let val0 = ((b[0] as u16) | ((b[1] as u16) << 8)) & 0x0FFF;
        let val1 = ((b[1] as u16) >> 4) | ((b[2] as u16) << 4);
        if val0 < Q as u16 {
            r[ctr] = val0 as i16;
            ctr += 1;
        }
        if ctr < N && val1 < Q as u16 {
            r[ctr] = val1 as i16;
            ctr += 1;
        }
    }
    ctr
}

/// Fill `r` with uniform coefficients in `[0, q)` by rejection sampling
/// blocks pulled from `fill`.
///
/// Fails with [`Error::RejectionSamplingExhausted`] after
/// [`MAX_XOF_BLOCKS`] blocks; errors from `fill` pass through unchanged.
pub fn reject_uniform(
    r: &mut [i16; N],
    mut fill: impl FnMut(&mut [u8; XOF_BLOCK_BYTES]) -> Result<(), Error>,
) -> Result<(), Error> {
    let mut ctr = 0;
    let mut buf = [0u8; XOF_BLOCK_BYTES];
    let mut blocks = 0;

    while ctr < N {
        if blocks == MAX_XOF_BLOCKS {
            return Err(Error::RejectionSamplingExhausted { blocks });
        }
        fill(&mut buf)?;
        blocks += 1;
        ctr = rej_uniform_block(r, ctr, &buf);
    }
    Ok(())
}

/// One uniform polynomial from `XOF(seed ‖ x ‖ y)`.
pub fn uniform_poly<X: Xof + ?Sized>(
    xof: &X,
    seed: &[u8; SYMBYTES],
    x: u8,
    y: u8,
) -> Result<[i16; N], Error> {
    let mut reader = xof.absorb(seed, x, y)?;
    let mut r = [0i16; N];
    reject_uniform(&mut r, |block| reader.squeeze_block(block))?;
    Ok(r)
}

/// Noise polynomial `CBD_η(PRF(seed ‖ nonce))`. The PRF output is wiped
/// before returning.
pub fn get_noise<Eta: CbdWidth, F: Prf + ?Sized>(
    prf: &F,
    seed: &[u8; SYMBYTES],
    nonce: u8,
) -> Result<Polynomial, Error> {
    let mut buf = Eta::zeroed_buf();
    let res = prf.prf(seed, nonce, buf.as_mut());
    let poly = res.map(|()| Polynomial::sample_cbd::<Eta>(&buf));
    buf.zeroize();
    poly
}

/// The full noise draw for one key generation or encryption.
pub struct Noise<const K: usize> {
    /// Secret vector: `η1`, nonces `0..K`.
    pub secret: Vector<K>,
    /// Error vector: nonces `K..2K`, `η1` for key generation and `η2` for
    /// encryption.
    pub error: Vector<K>,
    /// Extra error polynomial for encryption: `η2`, nonce `2K`.
    pub error_poly: Option<Polynomial>,
}

impl<const K: usize> core::fmt::Debug for Noise<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Noise")
            .field("k", &K)
            .field("error_poly", &self.error_poly.is_some())
            .finish_non_exhaustive()
    }
}

impl<const K: usize> Zeroize for Noise<K> {
    fn zeroize(&mut self) {
        self.secret.zeroize();
        self.error.zeroize();
        if let Some(p) = self.error_poly.as_mut() {
            p.zeroize();
        }
    }
}

fn noise_vector<Eta: CbdWidth, F: Prf + ?Sized, const K: usize>(
    prf: &F,
    seed: &[u8; SYMBYTES],
    first_nonce: u8,
) -> Result<Vector<K>, Error> {
    let mut v = Vector::zero();
    for (nonce, p) in (first_nonce..).zip(v.polys_mut().iter_mut()) {
        *p = get_noise::<Eta, F>(prf, seed, nonce)?;
    }
    Ok(v)
}

/// Draw the noise for parameter set `P` from `seed`.
///
/// With `with_poly == false` this is the key-generation draw (two `η1`
/// vectors); with `true` it is the encryption draw (`η1` secret, `η2`
/// error vector and error polynomial). Nonces run `0, 1, …, 2K` in order.
pub fn sample_noise<P: ParameterSet, F: Prf + ?Sized, const K: usize>(
    prf: &F,
    seed: &[u8; SYMBYTES],
    with_poly: bool,
) -> Result<Noise<K>, Error> {
    const { assert!(K == P::K, "vector rank must match the parameter set") };
    let k = K as u8;

    let secret = noise_vector::<P::Eta1, F, K>(prf, seed, 0)?;
    if !with_poly {
        let error = noise_vector::<P::Eta1, F, K>(prf, seed, k)?;
        return Ok(Noise {
            secret,
            error,
            error_poly: None,
        });
    }
    let error = noise_vector::<P::Eta2, F, K>(prf, seed, k)?;
    let error_poly = get_noise::<P::Eta2, F>(prf, seed, 2 * k)?;
    Ok(Noise {
        secret,
        error,
        error_poly: Some(error_poly),
    })
}
