//! SHAKE adapters for the `kyber-math` sampling capabilities.
//!
//! | Kyber name | Primitive | Adapter |
//! |------------|-----------|---------|
//! | **PRF**    | SHAKE-256 | [`Shake256Prf`] |
//! | **XOF**    | SHAKE-128 | [`Shake128Xof`] |
//!
//! Both are stateless unit structs; the XOF hands out a fresh
//! [`Shake128Stream`] per matrix entry.

#![no_std]
#![deny(unsafe_code)]

use kyber_math::{Error, Prf, Xof, XofReader, SYMBYTES, XOF_BLOCK_BYTES};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader as DigestReader},
    Shake128, Shake128Reader, Shake256,
};

pub const SHAKE128_RATE: usize = 168;
pub const SHAKE256_RATE: usize = 136;

const _: () = assert!(SHAKE128_RATE == XOF_BLOCK_BYTES);

/// One-shot SHAKE-128 of `input`, squeezed into `out`.
pub fn shake128(input: &[u8], out: &mut [u8]) {
    let mut h = Shake128::default();
    Update::update(&mut h, input);
    h.finalize_xof().read(out);
}

/// One-shot SHAKE-256 of `input`, squeezed into `out`.
pub fn shake256(input: &[u8], out: &mut [u8]) {
    let mut h = Shake256::default();
    Update::update(&mut h, input);
    h.finalize_xof().read(out);
}

/// `PRF(seed, nonce) = SHAKE-256(seed ‖ nonce)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shake256Prf;

impl Prf for Shake256Prf {
    fn prf(&self, seed: &[u8; SYMBYTES], nonce: u8, out: &mut [u8]) -> Result<(), Error> {
        let mut h = Shake256::default();
        Update::update(&mut h, seed);
        Update::update(&mut h, &[nonce]);
        h.finalize_xof().read(out);
        Ok(())
    }
}

/// `XOF(seed, x, y) = SHAKE-128(seed ‖ x ‖ y)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shake128Xof;

/// Squeeze side of an absorbed SHAKE-128 instance.
pub struct Shake128Stream(Shake128Reader);

impl core::fmt::Debug for Shake128Stream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shake128Stream").finish_non_exhaustive()
    }
}

impl XofReader for Shake128Stream {
    #[inline]
    fn squeeze_block(&mut self, block: &mut [u8; XOF_BLOCK_BYTES]) -> Result<(), Error> {
        self.0.read(block);
        Ok(())
    }
}

impl Xof for Shake128Xof {
    type Reader = Shake128Stream;

    fn absorb(&self, seed: &[u8; SYMBYTES], x: u8, y: u8) -> Result<Shake128Stream, Error> {
        let mut h = Shake128::default();
        Update::update(&mut h, seed);
        Update::update(&mut h, &[x, y]);
        Ok(Shake128Stream(h.finalize_xof()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake_empty_input() {
        let mut out = [0u8; 16];
        shake128(&[], &mut out);
        assert_eq!(
            out,
            [
                0x7f, 0x9c, 0x2b, 0xa4, 0xe8, 0x8f, 0x82, 0x7d, 0x61, 0x60, 0x45, 0x50, 0x76,
                0x05, 0x85, 0x3e
            ]
        );
        shake256(&[], &mut out);
        assert_eq!(
            out,
            [
                0x46, 0xb9, 0xdd, 0x2b, 0x0b, 0xa8, 0x8d, 0x13, 0x23, 0x3b, 0x3f, 0xeb, 0x74,
                0x3e, 0xeb, 0x24
            ]
        );
    }

    #[test]
    fn xof_absorbs_seed_then_indices() {
        let mut stream = Shake128Xof.absorb(&[0u8; SYMBYTES], 1, 2).expect("absorb");
        let mut block = [0u8; XOF_BLOCK_BYTES];
        stream.squeeze_block(&mut block).expect("squeeze");
        assert_eq!(&block[..8], &[0x8a, 0x40, 0xe6, 0x07, 0x09, 0xb8, 0x8a, 0x08]);
    }

    #[test]
    fn xof_blocks_continue_the_stream() {
        let seed: [u8; SYMBYTES] = core::array::from_fn(|i| i as u8);
        let mut input = [0u8; SYMBYTES + 2];
        input[..SYMBYTES].copy_from_slice(&seed);
        input[SYMBYTES..].copy_from_slice(&[3, 0]);
        let mut expected = [0u8; 3 * XOF_BLOCK_BYTES];
        shake128(&input, &mut expected);

        let mut stream = Shake128Xof.absorb(&seed, 3, 0).expect("absorb");
        let mut block = [0u8; XOF_BLOCK_BYTES];
        for chunk in expected.chunks_exact(XOF_BLOCK_BYTES) {
            stream.squeeze_block(&mut block).expect("squeeze");
            assert_eq!(&block[..], chunk);
        }
    }

    #[test]
    fn prf_appends_nonce() {
        let seed: [u8; SYMBYTES] = core::array::from_fn(|i| i as u8);
        let mut out = [0u8; 8];
        Shake256Prf.prf(&seed, 7, &mut out).expect("prf");
        assert_eq!(out, [0xef, 0x0d, 0xb3, 0x22, 0x86, 0x29, 0xd8, 0xc1]);
    }
}
