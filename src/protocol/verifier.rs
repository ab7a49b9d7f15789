use num_bigint::BigUint;
use num_traits::Zero;

use super::{PublicParameters, Transcript};
use crate::primitives::RandomSource;

/// Samples a challenge uniformly from `[0, p-2]`.
pub fn challenge<R: RandomSource + ?Sized>(p: &BigUint, rng: &mut R) -> BigUint {
    if p.is_zero() {
        return BigUint::zero();
    }
    rng.sample_below(&(p - 1u8))
}

/// Checks `g^s ≡ A * y^c (mod p)`.
///
/// A pure predicate: malformed values simply fail to verify.
pub fn verify(
    a: &BigUint,
    c: &BigUint,
    s: &BigUint,
    y: &BigUint,
    p: &BigUint,
    g: &BigUint,
) -> bool {
    if p.is_zero() {
        return false;
    }
    let lhs = g.modpow(s, p);
    let rhs = (a * y.modpow(c, p)) % p;
    lhs == rhs
}

/// Verifier for the Schnorr identification protocol.
///
/// Holds only the prover's public parameters; every move is a pure function
/// of its arguments, so one verifier may serve any number of concurrent runs.
#[derive(Clone, Debug)]
pub struct Verifier {
    params: PublicParameters,
}

impl Verifier {
    /// Creates a new verifier for the given public parameters.
    pub fn new(params: PublicParameters) -> Self {
        Self { params }
    }

    /// Returns the public parameters.
    pub fn params(&self) -> &PublicParameters {
        &self.params
    }

    /// Second move: samples a challenge uniformly from `[0, p-2]`.
    pub fn challenge<R: RandomSource + ?Sized>(&self, rng: &mut R) -> BigUint {
        challenge(self.params.p(), rng)
    }

    /// Final check over a complete transcript.
    pub fn verify(&self, transcript: &Transcript) -> bool {
        let accepted = verify(
            &transcript.commitment,
            &transcript.challenge,
            &transcript.response,
            self.params.y(),
            self.params.p(),
            self.params.g(),
        );
        tracing::debug!(accepted, "Schnorr transcript verified");
        accepted
    }
}
