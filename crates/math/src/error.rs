use core::fmt;

/// Errors surfaced by the sampling layer and the byte codecs.
///
/// Arithmetic routines never fail; a tampered ciphertext shows up as a
/// mismatch through [`crate::ct::ct_compare`], not as an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The injected PRF or XOF reported a failure. Passed through without
    /// interpretation.
    Primitive,
    /// Rejection sampling squeezed `blocks` XOF blocks without collecting
    /// a full polynomial. Only a broken random source gets here.
    RejectionSamplingExhausted {
        /// Number of blocks consumed before giving up.
        blocks: usize,
    },
    /// Input byte slice has the wrong length.
    InvalidLength {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.write_str("hash primitive failure"),
            Self::RejectionSamplingExhausted { blocks } => {
                write!(f, "rejection sampling exhausted after {blocks} XOF blocks")
            }
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected}, got {actual}")
            }
        }
    }
}

impl core::error::Error for Error {}

/// Check that `actual` equals `expected`, reporting both on mismatch.
#[inline]
pub(crate) const fn check_len(expected: usize, actual: usize) -> Result<(), Error> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::InvalidLength { expected, actual })
    }
}
