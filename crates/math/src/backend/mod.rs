//! Capability dispatch between the polynomial kernels.
//!
//! Every hot polynomial routine is declared once on [`PolyOps`] and
//! implemented twice: [`Portable`] is the loop-form reference, [`Lanes`]
//! works on fixed 16-coefficient chunks the optimiser can keep in vector
//! registers. Both produce bit-identical output for every valid input.
//!
//! The process-wide choice is made by [`Backend::active`] on first use and
//! cached in an atomic; it is never re-checked.

mod lanes;
mod portable;

use core::{
    fmt::Display,
    sync::atomic::{AtomicU8, Ordering},
};

pub use lanes::Lanes;
pub use portable::Portable;

use crate::N;

/// Bytes of PRF output consumed by one η=2 polynomial.
pub const ETA2_BYTES: usize = 2 * N / 4;

/// Bytes of PRF output consumed by one η=3 polynomial.
pub const ETA3_BYTES: usize = 3 * N / 4;

/// Polynomial kernels shared by every backend.
///
/// Coefficient arithmetic wraps on `i16` overflow; callers keep inputs inside
/// the documented ranges so that it never does.
pub trait PolyOps {
    /// Forward NTT, ending with a Barrett pass into `[0, q]`.
    fn ntt(r: &mut [i16; N]);

    /// Inverse NTT, output in the Montgomery domain.
    fn inverse_ntt(r: &mut [i16; N]);

    /// Barrett-reduce every coefficient into `[0, q]`.
    fn reduce(r: &mut [i16; N]);

    /// Multiply every coefficient by `R = 2^{16}` modulo q.
    fn to_mont(r: &mut [i16; N]);

    /// Map coefficients in `[0, 2q)` onto `[0, q)`.
    fn csubq(r: &mut [i16; N]);

    /// `r[i] = a[i] + b[i]`, no reduction.
    fn add(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]);

    /// `r[i] += b[i]`, no reduction.
    fn add_assign(r: &mut [i16; N], b: &[i16; N]);

    /// `r[i] = a[i] - b[i]`, no reduction.
    fn sub(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]);

    /// NTT-domain product: 64 pairs of degree-1 multiplications with roots
    /// `+ZETAS[64 + i]` and `-ZETAS[64 + i]`.
    fn basemul(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]);

    /// `r += a ∘ b` in the NTT domain, no reduction.
    fn basemul_acc(r: &mut [i16; N], a: &[i16; N], b: &[i16; N]);

    /// `r[i] = round(a[i] · 2^d / q) mod 2^d` for `a[i]` in `[0, 2q)`.
    fn compress(r: &mut [u16; N], a: &[i16; N], d: u32);

    /// `r[i] = round(a[i] · q / 2^d)`.
    fn decompress(r: &mut [i16; N], a: &[u16; N], d: u32);

    /// Centred binomial sample with η = 2.
    fn cbd_eta2(r: &mut [i16; N], buf: &[u8; ETA2_BYTES]);

    /// Centred binomial sample with η = 3.
    fn cbd_eta3(r: &mut [i16; N], buf: &[u8; ETA3_BYTES]);
}

/// Kernel family selected for this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Backend {
    Portable = 1,
    Lanes    = 2,
}

impl Display for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Portable => f.write_str("portable"),
            Self::Lanes => f.write_str("lanes"),
        }
    }
}

const UNSELECTED: u8 = 0;

static SELECTED: AtomicU8 = AtomicU8::new(UNSELECTED);

impl Backend {
    /// The backend used by every dispatched routine.
    ///
    /// Detection runs on the first call only. Concurrent first calls may each
    /// run detection, but they store the same answer.
    #[must_use]
    pub fn active() -> Self {
        match SELECTED.load(Ordering::Relaxed) {
            1 => Self::Portable,
            2 => Self::Lanes,
            _ => {
                let chosen = Self::detect();
                SELECTED.store(chosen as u8, Ordering::Relaxed);
                chosen
            }
        }
    }

    /// Probe the running CPU. With `std` this asks for AVX2 (x86_64) or NEON
    /// (aarch64); without it, 64-bit targets get [`Backend::Lanes`].
    #[must_use]
    pub fn detect() -> Self {
        #[cfg(all(feature = "std", target_arch = "x86_64"))]
        let wide = std::is_x86_feature_detected!("avx2");
        #[cfg(all(feature = "std", target_arch = "aarch64"))]
        let wide = std::arch::is_aarch64_feature_detected!("neon");
        #[cfg(not(all(feature = "std", any(target_arch = "x86_64", target_arch = "aarch64"))))]
        let wide = cfg!(target_pointer_width = "64");

        if wide { Self::Lanes } else { Self::Portable }
    }
}

/// Dispatch a [`PolyOps`] method over the cached [`Backend`].
macro_rules! dispatch {
    ($op:ident ( $($arg:expr),* $(,)? )) => {
        match $crate::backend::Backend::active() {
            $crate::backend::Backend::Portable => {
                <$crate::backend::Portable as $crate::backend::PolyOps>::$op($($arg),*)
            }
            $crate::backend::Backend::Lanes => {
                <$crate::backend::Lanes as $crate::backend::PolyOps>::$op($($arg),*)
            }
        }
    };
}
pub(crate) use dispatch;
