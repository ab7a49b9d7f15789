use num_bigint::BigUint;
use num_traits::One;

use super::{Commitment, Nonce, PrivateKey, PublicParameters, Response};
use crate::primitives::field::check_exponent;
use crate::primitives::RandomSource;
use crate::{Error, Result};

/// Computes the commitment `A = g^r mod p`.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `r` is outside `[1, p-2]`.
pub fn commit(p: &BigUint, g: &BigUint, r: &BigUint) -> Result<BigUint> {
    check_exponent(r, p, "commitment nonce")?;
    Ok(g.modpow(r, p))
}

/// Computes the response `s = (r + x*c) mod (p-1)`.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if `r` or `x` is outside `[1, p-2]` or `c`
/// is outside `[0, p-2]`.
pub fn respond(r: &BigUint, x: &BigUint, c: &BigUint, p: &BigUint) -> Result<BigUint> {
    check_exponent(r, p, "commitment nonce")?;
    check_exponent(x, p, "private key")?;
    let order = p - 1u8;
    if *c >= order {
        return Err(Error::out_of_range("challenge must lie in [0, p-2]"));
    }
    Ok((r + x * c) % order)
}

/// Prover for the Schnorr identification protocol.
///
/// Demonstrates knowledge of `x` with `y = g^x mod p` without revealing it.
/// The prover holds no per-run state: the [`Nonce`] returned by
/// [`commit`](Prover::commit) must be passed back to
/// [`respond`](Prover::respond) by the caller.
///
/// # Security
///
/// - Draw nonces from [`SecureRng`](crate::SecureRng) outside of tests
/// - Never reuse a nonce across protocol runs
#[derive(Clone, Debug)]
pub struct Prover {
    params: PublicParameters,
    private_key: PrivateKey,
}

impl Prover {
    /// Creates a prover, checking that the key matches `y`.
    pub fn new(params: PublicParameters, private_key: PrivateKey) -> Result<Self> {
        params.validate()?;
        check_exponent(private_key.x(), params.p(), "private key")?;
        if params.g().modpow(private_key.x(), params.p()) != *params.y() {
            return Err(Error::invalid("private key does not match public key y"));
        }
        Ok(Self {
            params,
            private_key,
        })
    }

    /// Returns the public parameters.
    pub fn params(&self) -> &PublicParameters {
        &self.params
    }

    /// First move: samples `r` in `[1, p-2]` and commits to it.
    ///
    /// Returns the commitment and the secret nonce (must be kept secret).
    pub fn commit<R: RandomSource + ?Sized>(&self, rng: &mut R) -> (Commitment, Nonce) {
        let r = rng.sample_range(&BigUint::one(), &self.params.order());
        let a = self.params.g().modpow(&r, self.params.p());
        (Commitment::new(a), Nonce::new(r))
    }

    /// First move with a caller-chosen nonce.
    pub fn commit_with_nonce(&self, r: &BigUint) -> Result<(Commitment, Nonce)> {
        let a = commit(self.params.p(), self.params.g(), r)?;
        Ok((Commitment::new(a), Nonce::new(r.clone())))
    }

    /// Third move: answers the verifier's challenge.
    pub fn respond(&self, nonce: &Nonce, challenge: &BigUint) -> Result<Response> {
        let s = respond(
            nonce.r(),
            self.private_key.x(),
            challenge,
            self.params.p(),
        )?;
        Ok(Response::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{FixedSource, SecureRng};
    use crate::protocol::setup;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn prover() -> Prover {
        let (params, key) = setup(&big(23), &big(5), &big(6)).unwrap();
        Prover::new(params, key).unwrap()
    }

    #[test]
    fn fixed_nonce_commitment() {
        let (commitment, nonce) = prover().commit_with_nonce(&big(3)).unwrap();
        assert_eq!(commitment.a(), &big(10));
        assert_eq!(nonce.r(), &big(3));
    }

    #[test]
    fn commit_samples_in_range() {
        let prover = prover();
        let mut rng = SecureRng::new();
        for _ in 0..50 {
            let (commitment, nonce) = prover.commit(&mut rng);
            assert!(*nonce.r() >= big(1) && *nonce.r() <= big(21));
            assert_eq!(commitment.a(), &big(5).modpow(nonce.r(), &big(23)));
        }
    }

    #[test]
    fn response_value() {
        // s = 3 + 6*2 mod 22 = 15
        let prover = prover();
        let mut rng = FixedSource::new([3u32]);
        let (_, nonce) = prover.commit(&mut rng);
        assert_eq!(prover.respond(&nonce, &big(2)).unwrap().s(), &big(15));
    }

    #[test]
    fn response_wraps_modulo_order() {
        // 21 + 6*21 = 147 ≡ 15 (mod 22)
        assert_eq!(respond(&big(21), &big(6), &big(21), &big(23)).unwrap(), big(15));
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        let prover = prover();
        assert!(matches!(
            prover.commit_with_nonce(&big(0)),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            prover.respond(&Nonce::new(big(3)), &big(22)),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn rejects_mismatched_key() {
        let (params, _) = setup(&big(23), &big(5), &big(6)).unwrap();
        assert!(matches!(
            Prover::new(params, PrivateKey::new(big(7))),
            Err(Error::InvalidParameter(_))
        ));
    }
}
