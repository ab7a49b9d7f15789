//! Schnorr identification: a three-move proof of knowledge of a discrete log.
//!
//! ```text
//! Prover                          Verifier
//!   r <- [1, p-2], A = g^r  ---A--->
//!                           <--c---  c <- [0, p-2]
//!   s = r + x*c mod (p-1)   ---s--->
//!                                    accept iff g^s == A * y^c (mod p)
//! ```
//!
//! Every move is stateless; ordering the moves and carrying the nonce from
//! the first to the third is the caller's job.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::primitives::RandomSource;
use crate::Result;

/// Core protocol types (parameters, private key, messages, transcript).
pub mod gadgets;
/// Prover side: commitment and response.
pub mod prover;
/// Verifier side: challenge and verification.
pub mod verifier;

pub use gadgets::{setup, Commitment, Nonce, PrivateKey, PublicParameters, Response, Transcript};
pub use prover::{commit, respond, Prover};
pub use verifier::{challenge, verify, Verifier};

/// A complete protocol run between an honest prover and a verifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchnorrDemo {
    pub parameters: PublicParameters,
    pub transcript: Transcript,
    pub is_valid: bool,
}

/// Runs commit, challenge, response and verification in order.
pub fn demo<R: RandomSource + ?Sized>(
    p: &BigUint,
    g: &BigUint,
    x: &BigUint,
    rng: &mut R,
) -> Result<SchnorrDemo> {
    let (parameters, private_key) = setup(p, g, x)?;
    let prover = Prover::new(parameters.clone(), private_key)?;
    let verifier = Verifier::new(parameters.clone());

    let (commitment, nonce) = prover.commit(rng);
    let challenge = verifier.challenge(rng);
    let response = prover.respond(&nonce, &challenge)?;

    let transcript = Transcript::new(&commitment, &challenge, &response);
    let is_valid = verifier.verify(&transcript);
    Ok(SchnorrDemo {
        parameters,
        transcript,
        is_valid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::FixedSource;

    #[test]
    fn reference_demo_run() {
        let big = |v: u32| BigUint::from(v);
        let mut rng = FixedSource::new([3u32, 2]);
        let run = demo(&big(23), &big(5), &big(6), &mut rng).unwrap();
        assert_eq!(run.transcript.commitment, big(10));
        assert_eq!(run.transcript.challenge, big(2));
        assert_eq!(run.transcript.response, big(15));
        assert!(run.is_valid);
    }
}
