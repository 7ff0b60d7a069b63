//! Sampling against SHAKE: fixed values, distributions and nonce order.

use kyber_core::{
    gen_matrix, get_noise, sample_noise, Eta2, Eta3, Kyber1024, Kyber512, Kyber768, NttMatrix,
    Polynomial, Q, SYMBYTES,
};
use sha2::{Digest, Sha256};

const COUNTING_SEED: [u8; SYMBYTES] = [7; SYMBYTES];

fn counting_seed() -> [u8; SYMBYTES] {
    core::array::from_fn(|i| i as u8)
}

fn histogram<const ETA: usize>(polys: impl Iterator<Item = Polynomial>) -> Vec<usize> {
    let mut counts = vec![0usize; 2 * ETA + 1];
    for p in polys {
        for &c in p.coeffs() {
            let c = usize::try_from(c + ETA as i16).expect("coefficient below -eta");
            counts[c] += 1;
        }
    }
    counts
}

fn assert_binomial(counts: &[usize], weights: &[usize]) {
    let total: usize = counts.iter().sum();
    let denom: usize = weights.iter().sum();
    for (i, (&got, &w)) in counts.iter().zip(weights).enumerate() {
        let want = (total * w / denom) as f64;
        let slack = 4.0 * want.sqrt();
        assert!(
            (got as f64 - want).abs() <= slack,
            "bucket {i}: got {got}, want {want} +/- {slack}"
        );
    }
}

#[test]
fn eta2_matches_binomial_weights() {
    let polys = (0..64).map(|n| get_noise::<Eta2>(&COUNTING_SEED, n).unwrap());
    let counts = histogram::<2>(polys);
    assert_eq!(counts, [1031, 4223, 6039, 4077, 1014]);
    assert_binomial(&counts, &[1, 4, 6, 4, 1]);
}

#[test]
fn eta3_matches_binomial_weights() {
    let polys = (0..64).map(|n| get_noise::<Eta3>(&COUNTING_SEED, n).unwrap());
    let counts = histogram::<3>(polys);
    assert_eq!(counts, [224, 1544, 3841, 5134, 3857, 1511, 273]);
    assert_binomial(&counts, &[1, 6, 15, 20, 15, 6, 1]);
}

#[test]
fn noise_known_values() {
    let seed = [0x2a; SYMBYTES];
    let p = get_noise::<Eta2>(&seed, 0).unwrap();
    assert_eq!(
        p.coeffs()[..16],
        [0, -1, -1, 0, -1, -1, 0, 0, 0, 0, 0, 0, -1, 0, 1, -2]
    );
    let p = get_noise::<Eta3>(&seed, 1).unwrap();
    assert_eq!(
        p.coeffs()[..16],
        [1, -3, 1, -1, 2, -2, -1, -3, 0, 1, 0, 1, 2, 1, 1, 1]
    );
}

#[test]
fn matrix_known_values() {
    let a = gen_matrix::<3>(&counting_seed(), false).unwrap();
    assert_eq!(
        a.rows()[0].polys()[1].coeffs()[..8],
        [797, 993, 161, 6, 2608, 2385, 2096, 2661]
    );

    let mut h = Sha256::new();
    for row in a.rows() {
        let mut buf = [0u8; 3 * 384];
        row.to_bytes(&mut buf).unwrap();
        h.update(buf);
    }
    let digest: [u8; 32] = h.finalize().into();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    assert_eq!(
        hex,
        "c3c68c7f38b3da8e21b7a27b28a4f1b1130d5584dfb6f8a1dd65fb9660bb93d5"
    );
}

fn check_transposed<const K: usize>() {
    let seed = [0x5c; SYMBYTES];
    let a = gen_matrix::<K>(&seed, false).unwrap();
    let at = gen_matrix::<K>(&seed, true).unwrap();
    for i in 0..K {
        for j in 0..K {
            assert_eq!(a.rows()[i].polys()[j], at.rows()[j].polys()[i], "({i}, {j})");
        }
    }
}

#[test]
fn transposed_matrix_swaps_entries() {
    check_transposed::<2>();
    check_transposed::<3>();
    check_transposed::<4>();
}

#[test]
fn matrix_coefficients_are_canonical() {
    let a: NttMatrix<4> = gen_matrix(&[0xff; SYMBYTES], true).unwrap();
    for row in a.rows() {
        for p in row.polys() {
            assert!(p.coeffs().iter().all(|c| (0..Q).contains(c)));
        }
    }
}

#[test]
fn keygen_noise_uses_eta1_throughout() {
    let seed = counting_seed();
    let noise = sample_noise::<Kyber512, 2>(&seed, false).unwrap();
    for (i, p) in noise.secret.polys().iter().enumerate() {
        assert_eq!(*p, get_noise::<Eta3>(&seed, i as u8).unwrap());
    }
    for (i, p) in noise.error.polys().iter().enumerate() {
        assert_eq!(*p, get_noise::<Eta3>(&seed, 2 + i as u8).unwrap());
    }
    assert!(noise.error_poly.is_none());
}

#[test]
fn encryption_noise_switches_to_eta2() {
    let seed = counting_seed();
    let noise = sample_noise::<Kyber512, 2>(&seed, true).unwrap();
    assert_eq!(noise.secret.polys()[1], get_noise::<Eta3>(&seed, 1).unwrap());
    assert_eq!(noise.error.polys()[0], get_noise::<Eta2>(&seed, 2).unwrap());
    assert_eq!(noise.error.polys()[1], get_noise::<Eta2>(&seed, 3).unwrap());
    assert_eq!(noise.error_poly, Some(get_noise::<Eta2>(&seed, 4).unwrap()));
}

#[test]
fn larger_sets_use_eta2_for_secrets() {
    let seed = [1; SYMBYTES];
    let n768 = sample_noise::<Kyber768, 3>(&seed, true).unwrap();
    assert_eq!(n768.secret.polys()[2], get_noise::<Eta2>(&seed, 2).unwrap());
    assert_eq!(n768.error_poly, Some(get_noise::<Eta2>(&seed, 6).unwrap()));

    let n1024 = sample_noise::<Kyber1024, 4>(&seed, false).unwrap();
    assert_eq!(n1024.error.polys()[3], get_noise::<Eta2>(&seed, 7).unwrap());
    assert!(n1024
        .secret
        .polys()
        .iter()
        .flat_map(|p| p.coeffs())
        .all(|c| (-2..=2).contains(c)));
}
