use field_protocols::commitment::PedersenParams;
use field_protocols::homomorphic::{ElGamalKeyPair, HomomorphicScheme, PaillierKeyPair};
use field_protocols::primitives::{mod_inverse, PrimeField};
use field_protocols::protocol::{commit, respond, setup, verify};
use field_protocols::sharing::SecretSharing;
use field_protocols::{FixedSource, SeededRng};
use num_bigint::BigUint;
use proptest::prelude::*;

const P: u64 = 97;

fn big(v: u64) -> BigUint {
    BigUint::from(v)
}

proptest! {
    #[test]
    fn any_k_shares_reconstruct(
        secret in 0..P,
        k in 2usize..=6,
        extra in 0usize..=4,
        seed in any::<u64>()
    ) {
        let n = k + extra;
        let scheme = SecretSharing::new(big(P)).unwrap();
        let mut rng = SeededRng::from_seed(seed);
        let shares = scheme.generate_shares(&big(secret), n, k, &mut rng).unwrap();

        prop_assert_eq!(shares.len(), n);
        prop_assert_eq!(scheme.reconstruct_secret(&shares[..k]).unwrap(), big(secret));
        prop_assert_eq!(scheme.reconstruct_secret(&shares[n - k..]).unwrap(), big(secret));
    }

    #[test]
    fn inverse_multiplies_to_one(a in 1..P) {
        let inv = mod_inverse(&big(a), &big(P)).unwrap();
        prop_assert_eq!((big(a) * inv) % big(P), big(1));
    }

    #[test]
    fn field_subtraction_undoes_addition(a in 0..P, b in 0..P) {
        let field = PrimeField::new(big(P)).unwrap();
        let sum = field.add(&big(a), &big(b));
        prop_assert_eq!(field.sub(&sum, &big(b)), big(a));
    }

    #[test]
    fn paillier_decrypts_sums(m1 in 0u64..3233, m2 in 0u64..3233, seed in any::<u64>()) {
        let keys = PaillierKeyPair::generate(&big(61), &big(53)).unwrap();
        let pk = &keys.public_key;
        let mut rng = SeededRng::from_seed(seed);
        let c1 = pk.encrypt(&big(m1), &mut rng).unwrap();
        let c2 = pk.encrypt(&big(m2), &mut rng).unwrap();

        prop_assert_eq!(keys.decrypt(&c1).unwrap(), big(m1));
        let sum = pk.combine(&c1, &c2).unwrap();
        prop_assert_eq!(keys.decrypt(&sum).unwrap(), big((m1 + m2) % 3233));
    }

    #[test]
    fn elgamal_decrypts_products(
        m1 in 1u64..23,
        m2 in 1u64..23,
        x in 1u64..=21,
        seed in any::<u64>()
    ) {
        let keys = ElGamalKeyPair::from_private(&big(23), &big(5), &big(x)).unwrap();
        let pk = &keys.public_key;
        let mut rng = SeededRng::from_seed(seed);
        let c1 = pk.encrypt(&big(m1), &mut rng).unwrap();
        let c2 = pk.encrypt(&big(m2), &mut rng).unwrap();

        prop_assert_eq!(keys.decrypt(&pk.combine(&c1, &c2).unwrap()).unwrap(), big((m1 * m2) % 23));
    }

    #[test]
    fn honest_schnorr_transcripts_verify(x in 1u64..=21, r in 1u64..=21, c in 0u64..=21) {
        let (params, key) = setup(&big(23), &big(5), &big(x)).unwrap();
        let a = commit(params.p(), params.g(), &big(r)).unwrap();
        let s = respond(&big(r), key.x(), &big(c), params.p()).unwrap();
        prop_assert!(verify(&a, &big(c), &s, params.y(), params.p(), params.g()));
    }

    #[test]
    fn schnorr_rejects_wrong_response(
        x in 1u64..=21,
        r in 1u64..=21,
        c in 0u64..=21,
        delta in 1u64..22
    ) {
        let (params, key) = setup(&big(23), &big(5), &big(x)).unwrap();
        let a = commit(params.p(), params.g(), &big(r)).unwrap();
        let s = respond(&big(r), key.x(), &big(c), params.p()).unwrap();
        let forged = (s + delta) % big(22);
        prop_assert!(!verify(&a, &big(c), &forged, params.y(), params.p(), params.g()));
    }

    #[test]
    fn pedersen_opens_only_committed_message(m in 0u64..22, other in 0u64..22, r in 0u64..22) {
        let params = PedersenParams::new(big(23), big(5), big(7)).unwrap();
        let opening = params.commit(&big(m), &mut FixedSource::new([r]));
        prop_assert!(params.open(&opening.commitment, &big(m), &opening.randomness));
        if other != m {
            prop_assert!(!params.open(&opening.commitment, &big(other), &opening.randomness));
        }
    }
}
