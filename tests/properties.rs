//! Algebraic properties of the transform, compression and message codec,
//! checked on both kernel families.

use kyber_core::math::{
    backend::{Lanes, PolyOps, Portable, ETA2_BYTES, ETA3_BYTES},
    reduce::fqmul,
};
use kyber_core::{CompressWidth, Polynomial, D1, D10, D11, D4, D5, N, Q, SYMBYTES};
use proptest::{collection::vec, prelude::*};

fn coeffs(range: core::ops::Range<i16>) -> impl Strategy<Value = [i16; N]> {
    vec(range, N).prop_map(|v| <[i16; N]>::try_from(v).unwrap())
}

fn bytes<const L: usize>() -> impl Strategy<Value = [u8; L]> {
    vec(any::<u8>(), L).prop_map(|v| <[u8; L]>::try_from(v).unwrap())
}

/// `a * b` in `Z_q[X]/(X^256 + 1)`, canonical.
fn negacyclic_product(a: &[i16; N], b: &[i16; N]) -> [i16; N] {
    let mut acc = [0i64; N];
    for i in 0..N {
        for j in 0..N {
            let p = a[i] as i64 * b[j] as i64;
            if i + j < N {
                acc[i + j] += p;
            } else {
                acc[i + j - N] -= p;
            }
        }
    }
    acc.map(|c| c.rem_euclid(Q as i64) as i16)
}

fn ntt_roundtrip<B: PolyOps>(a: &[i16; N]) {
    let mut r = *a;
    B::ntt(&mut r);
    assert!(r.iter().all(|c| (0..=Q).contains(c)));
    B::inverse_ntt(&mut r);
    // The inverse leaves a factor of R = 2^16 behind.
    for (x, y) in r.iter().zip(a) {
        assert_eq!(fqmul(*x, 1).rem_euclid(Q), y.rem_euclid(Q));
    }
}

fn ntt_product<B: PolyOps>(a: &[i16; N], b: &[i16; N]) -> [i16; N] {
    let (mut ah, mut bh, mut r) = (*a, *b, [0i16; N]);
    B::ntt(&mut ah);
    B::ntt(&mut bh);
    B::basemul(&mut r, &ah, &bh);
    B::inverse_ntt(&mut r);
    r.map(|c| c.rem_euclid(Q))
}

fn distance_mod_q(x: i16, y: i16) -> i16 {
    let d = (x - y).rem_euclid(Q);
    d.min(Q - d)
}

fn check_compress<D: CompressWidth>(a: &[i16; N]) {
    let mut buf = [0u8; 352];
    let p = Polynomial::from(*a);
    p.compress::<D>(&mut buf[..D::POLY_BYTES]).unwrap();
    let back = Polynomial::decompress::<D>(&buf[..D::POLY_BYTES]).unwrap();
    let bound = (Q + (1 << D::D)) >> (D::D + 1);
    for (&x, &y) in a.iter().zip(back.coeffs()) {
        assert!((0..Q).contains(&y));
        assert!(distance_mod_q(x, y) <= bound, "d={} x={x} y={y}", D::D);
    }
}

proptest! {
    #[test]
    fn ntt_inverts_on_every_backend(a in coeffs(-Q + 1..Q)) {
        ntt_roundtrip::<Portable>(&a);
        ntt_roundtrip::<Lanes>(&a);
    }

    #[test]
    fn ntt_multiplication_is_negacyclic(a in coeffs(0..Q), b in coeffs(-3..4)) {
        let want = negacyclic_product(&a, &b);
        prop_assert_eq!(ntt_product::<Portable>(&a, &b), want);
        prop_assert_eq!(ntt_product::<Lanes>(&a, &b), want);
    }

    #[test]
    fn compression_error_is_bounded(a in coeffs(0..2 * Q)) {
        check_compress::<D1>(&a);
        check_compress::<D4>(&a);
        check_compress::<D5>(&a);
        check_compress::<D10>(&a);
        check_compress::<D11>(&a);
    }

    #[test]
    fn message_survives_small_noise(msg in bytes::<SYMBYTES>(), e in coeffs(-800..801)) {
        let mut p = Polynomial::from_message(&msg);
        p += &Polynomial::from(e);
        p.reduce();
        prop_assert_eq!(p.to_message(), msg);
    }

    #[test]
    fn backends_agree_on_transforms(a in coeffs(-4 * Q..4 * Q)) {
        let (mut p, mut l) = (a, a);
        Portable::inverse_ntt(&mut p);
        Lanes::inverse_ntt(&mut l);
        prop_assert_eq!(p, l);

        let (mut p, mut l) = (a.map(|c| c % Q), a.map(|c| c % Q));
        Portable::ntt(&mut p);
        Lanes::ntt(&mut l);
        prop_assert_eq!(p, l);
    }

    #[test]
    fn backends_agree_on_pointwise(a in coeffs(0..Q), b in coeffs(0..Q), c in coeffs(-Q..Q)) {
        let (mut p, mut l) = (c, c);
        Portable::basemul_acc(&mut p, &a, &b);
        Lanes::basemul_acc(&mut l, &a, &b);
        prop_assert_eq!(p, l);

        Portable::to_mont(&mut p);
        Lanes::to_mont(&mut l);
        prop_assert_eq!(p, l);
    }

    #[test]
    fn backends_agree_on_compression(a in coeffs(0..2 * Q)) {
        for d in [1, 4, 5, 10, 11] {
            let (mut p, mut l) = ([0u16; N], [0u16; N]);
            Portable::compress(&mut p, &a, d);
            Lanes::compress(&mut l, &a, d);
            prop_assert_eq!(p, l, "d={}", d);

            let (mut pd, mut ld) = ([0i16; N], [0i16; N]);
            Portable::decompress(&mut pd, &p, d);
            Lanes::decompress(&mut ld, &l, d);
            prop_assert_eq!(pd, ld, "d={}", d);
        }
    }

    #[test]
    fn backends_agree_on_cbd(b2 in bytes::<ETA2_BYTES>(), b3 in bytes::<ETA3_BYTES>()) {
        let (mut p, mut l) = ([0i16; N], [0i16; N]);
        Portable::cbd_eta2(&mut p, &b2);
        Lanes::cbd_eta2(&mut l, &b2);
        prop_assert_eq!(p, l);
        prop_assert!(p.iter().all(|c| (-2..=2).contains(c)));

        Portable::cbd_eta3(&mut p, &b3);
        Lanes::cbd_eta3(&mut l, &b3);
        prop_assert_eq!(p, l);
        prop_assert!(p.iter().all(|c| (-3..=3).contains(c)));
    }
}
