use num_bigint::BigUint;
use tracing::{debug, instrument};

use super::config::ToolkitConfig;
use super::messages::{Algorithm, Reply, Request, Response};
use crate::commitment::PedersenParams;
use crate::homomorphic::{
    self, Ciphertext, ElGamalKeyPair, HomomorphicScheme, Operation, PaillierKeyPair,
};
use crate::primitives::field::check_group;
use crate::primitives::RandomSource;
use crate::protocol::{self, Nonce, Prover, Verifier};
use crate::sharing::SecretSharing;
use crate::Result;

/// Stateless dispatcher from [`Request`] to [`Reply`].
///
/// Owns the configuration and one randomness source; keeps nothing between
/// calls, so multi-move protocols carry their intermediate values (such as
/// the Schnorr nonce) in the messages themselves.
pub struct Toolkit {
    config: ToolkitConfig,
    rng: Box<dyn RandomSource>,
}

impl Toolkit {
    /// Validates `config` and builds its configured randomness source.
    pub fn new(config: ToolkitConfig) -> Result<Self> {
        let rng = config.randomness.build()?;
        Self::with_rng(config, rng)
    }

    /// Validates `config` and uses `rng` regardless of its randomness section.
    pub fn with_rng(config: ToolkitConfig, rng: Box<dyn RandomSource>) -> Result<Self> {
        config.validate()?;
        if !rng.is_secure() {
            tracing::warn!("toolkit running with non-secure randomness");
        }
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Executes one request.
    #[instrument(skip_all, fields(operation = request.operation()))]
    pub fn handle(&mut self, request: Request) -> Result<Reply> {
        let reply = match request {
            Request::SharingGenerate {
                secret,
                n,
                k,
                prime,
            } => {
                let scheme = self.sharing(prime)?;
                let shares = scheme.generate_shares(&secret, n, k, &mut *self.rng)?;
                Reply::new(
                    Algorithm::Shamir,
                    Response::Shares {
                        prime: scheme.prime().clone(),
                        n,
                        k,
                        shares,
                    },
                )
            }
            Request::SharingReconstruct { shares, prime } => {
                let secret = self.sharing(prime)?.reconstruct_secret(&shares)?;
                Reply::new(Algorithm::Shamir, Response::Secret { secret })
            }
            Request::SharingSum {
                parties,
                threshold,
                prime,
            } => {
                let sum = self.sharing(prime)?.compute_sum(&parties, threshold)?;
                Reply::new(Algorithm::Shamir, Response::PartySum(sum))
            }
            Request::SharingDemo { secret, n, k } => {
                let demo = self.sharing(None)?.demo(&secret, n, k, &mut *self.rng)?;
                Reply::new(Algorithm::Shamir, Response::SharingDemo(demo))
            }

            Request::PaillierGenerate { p, q } => {
                let keys = self.paillier(p, q)?;
                Reply::new(
                    Algorithm::Paillier,
                    Response::PaillierKeys {
                        public_key: keys.public_key,
                        private_key: keys.private_key,
                        homomorphic_operation: Operation::Addition,
                    },
                )
            }
            Request::PaillierEncrypt {
                public_key,
                message,
            } => {
                public_key.validate()?;
                let ciphertext = public_key.encrypt(&message, &mut *self.rng)?;
                encrypted(Algorithm::Paillier, Ciphertext::Additive(ciphertext))
            }
            Request::PaillierDecrypt {
                key_pair,
                ciphertext,
            } => {
                key_pair.validate()?;
                let plaintext = key_pair.decrypt(&ciphertext)?;
                Reply::new(Algorithm::Paillier, Response::Decrypted { plaintext })
            }
            Request::PaillierAdd {
                public_key,
                ciphertext1,
                ciphertext2,
            } => {
                public_key.validate()?;
                let sum = public_key.combine(&ciphertext1, &ciphertext2)?;
                encrypted(Algorithm::Paillier, Ciphertext::Additive(sum))
            }
            Request::PaillierScale {
                public_key,
                ciphertext,
                factor,
            } => {
                public_key.validate()?;
                let scaled = public_key.scale(&ciphertext, &factor)?;
                encrypted(Algorithm::Paillier, Ciphertext::Additive(scaled))
            }

            Request::ElGamalGenerate { p, g, x } => {
                let keys = self.elgamal(p, g, x)?;
                Reply::new(
                    Algorithm::ElGamal,
                    Response::ElGamalKeys {
                        public_key: keys.public_key,
                        private_key: keys.private_key,
                        homomorphic_operation: Operation::Multiplication,
                    },
                )
            }
            Request::ElGamalEncrypt {
                public_key,
                message,
            } => {
                public_key.validate()?;
                let ciphertext = public_key.encrypt(&message, &mut *self.rng)?;
                encrypted(Algorithm::ElGamal, Ciphertext::Multiplicative(ciphertext))
            }
            Request::ElGamalDecrypt {
                key_pair,
                ciphertext,
            } => {
                key_pair.validate()?;
                let plaintext = key_pair.decrypt(&ciphertext)?;
                Reply::new(Algorithm::ElGamal, Response::Decrypted { plaintext })
            }
            Request::ElGamalMultiply {
                public_key,
                ciphertext1,
                ciphertext2,
            } => {
                public_key.validate()?;
                let product = public_key.combine(&ciphertext1, &ciphertext2)?;
                encrypted(Algorithm::ElGamal, Ciphertext::Multiplicative(product))
            }

            Request::HomomorphicCombine {
                public_key,
                ciphertext1,
                ciphertext2,
            } => {
                public_key.validate()?;
                let combined = public_key.combine(&ciphertext1, &ciphertext2)?;
                encrypted(Algorithm::Homomorphic, combined)
            }
            Request::HomomorphicDemo { kind, values } => {
                let demo = match kind {
                    Operation::Addition => {
                        let keys = self.paillier(None, None)?;
                        homomorphic::demo_addition(&keys, &values, &mut *self.rng)?
                    }
                    Operation::Multiplication => {
                        let keys = self.elgamal(None, None, None)?;
                        homomorphic::demo_multiplication(&keys, &values, &mut *self.rng)?
                    }
                };
                Reply::new(Algorithm::Homomorphic, Response::HomomorphicDemo(demo))
            }

            Request::SchnorrSetup { p, g, x } => {
                let p = p.unwrap_or_else(|| self.config.schnorr.p.clone());
                let g = g.unwrap_or_else(|| self.config.schnorr.g.clone());
                check_group(&p, &g)?;
                let x = match x {
                    Some(x) => x,
                    None => self.sample_exponent(&p),
                };
                let (public_parameters, private_key) = protocol::setup(&p, &g, &x)?;
                Reply::new(
                    Algorithm::Schnorr,
                    Response::SchnorrSetup {
                        public_parameters,
                        private_key,
                    },
                )
            }
            Request::SchnorrCommit {
                public_parameters,
                nonce,
            } => {
                public_parameters.validate()?;
                let p = public_parameters.p();
                let r = match nonce {
                    Some(r) => r,
                    None => self.sample_exponent(p),
                };
                let commitment = protocol::commit(p, public_parameters.g(), &r)?;
                Reply::new(
                    Algorithm::Schnorr,
                    Response::SchnorrCommitment {
                        commitment,
                        nonce: r,
                    },
                )
            }
            Request::SchnorrChallenge { public_parameters } => {
                public_parameters.validate()?;
                let challenge = Verifier::new(public_parameters).challenge(&mut *self.rng);
                Reply::new(Algorithm::Schnorr, Response::Challenge { challenge })
            }
            Request::SchnorrRespond {
                public_parameters,
                private_key,
                nonce,
                challenge,
            } => {
                let prover = Prover::new(public_parameters, private_key)?;
                let response = prover.respond(&Nonce::new(nonce), &challenge)?;
                Reply::new(
                    Algorithm::Schnorr,
                    Response::SchnorrResponse {
                        response: response.s().clone(),
                    },
                )
            }
            Request::SchnorrVerify {
                public_parameters,
                transcript,
            } => {
                let is_valid = Verifier::new(public_parameters).verify(&transcript);
                Reply::new(Algorithm::Schnorr, Response::Verification { is_valid })
            }
            Request::SchnorrDemo { x } => {
                let p = self.config.schnorr.p.clone();
                let g = self.config.schnorr.g.clone();
                let x = match x {
                    Some(x) => x,
                    None => self.sample_exponent(&p),
                };
                let demo = protocol::demo(&p, &g, &x, &mut *self.rng)?;
                Reply::new(Algorithm::Schnorr, Response::SchnorrDemo(demo))
            }

            Request::CommitmentSetup => Reply::new(
                Algorithm::Pedersen,
                Response::CommitmentSetup {
                    public_parameters: self.pedersen(None)?,
                },
            ),
            Request::CommitmentCommit {
                public_parameters,
                message,
                randomness,
            } => {
                let params = self.pedersen(public_parameters)?;
                let opening = match randomness {
                    Some(r) => params.commit_with(&message, &r),
                    None => params.commit(&message, &mut *self.rng),
                };
                Reply::new(Algorithm::Pedersen, Response::Commitment(opening))
            }
            Request::CommitmentOpen {
                public_parameters,
                commitment,
                message,
                randomness,
            } => {
                let params = self.pedersen(public_parameters)?;
                let is_valid = params.open(&commitment, &message, &randomness);
                Reply::new(Algorithm::Pedersen, Response::Verification { is_valid })
            }
            Request::CommitmentDemo { message } => {
                let demo = self.pedersen(None)?.demo(&message, &mut *self.rng);
                Reply::new(Algorithm::Pedersen, Response::CommitmentDemo(demo))
            }
        };
        debug!(algorithm = ?reply.algorithm, "request handled");
        Ok(reply)
    }

    fn sharing(&self, prime: Option<BigUint>) -> Result<SecretSharing> {
        SecretSharing::new(prime.unwrap_or_else(|| self.config.sharing.prime.clone()))
    }

    fn paillier(&self, p: Option<BigUint>, q: Option<BigUint>) -> Result<PaillierKeyPair> {
        let p = p.unwrap_or_else(|| self.config.paillier.p.clone());
        let q = q.unwrap_or_else(|| self.config.paillier.q.clone());
        PaillierKeyPair::generate(&p, &q)
    }

    fn elgamal(
        &mut self,
        p: Option<BigUint>,
        g: Option<BigUint>,
        x: Option<BigUint>,
    ) -> Result<ElGamalKeyPair> {
        let p = p.unwrap_or_else(|| self.config.elgamal.p.clone());
        let g = g.unwrap_or_else(|| self.config.elgamal.g.clone());
        match x {
            Some(x) => ElGamalKeyPair::from_private(&p, &g, &x),
            None => ElGamalKeyPair::generate(&p, &g, &mut *self.rng),
        }
    }

    fn pedersen(&self, params: Option<PedersenParams>) -> Result<PedersenParams> {
        match params {
            Some(params) => {
                params.validate()?;
                Ok(params)
            }
            None => self.config.commitment.params(),
        }
    }

    /// Uniform exponent in `[1, p-2]`.
    fn sample_exponent(&mut self, p: &BigUint) -> BigUint {
        self.rng.sample_range(&BigUint::from(1u8), &(p - 1u8))
    }
}

fn encrypted(algorithm: Algorithm, ciphertext: Ciphertext) -> Reply {
    Reply::new(algorithm, Response::Encrypted { ciphertext })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::FixedSource;
    use crate::protocol::Transcript;
    use crate::Error;

    fn toolkit(values: &[u64]) -> Toolkit {
        Toolkit::with_rng(
            ToolkitConfig::default(),
            Box::new(FixedSource::new(values.iter().copied())),
        )
        .unwrap()
    }

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn sharing_generate_then_reconstruct() {
        let mut toolkit = toolkit(&[5, 7]);
        let reply = toolkit
            .handle(Request::SharingGenerate {
                secret: big(42),
                n: 5,
                k: 3,
                prime: None,
            })
            .unwrap();
        assert_eq!(reply.algorithm, Algorithm::Shamir);
        let Response::Shares { shares, prime, .. } = reply.body else {
            panic!("expected shares");
        };
        assert_eq!(prime, big(97));
        assert_eq!(shares.len(), 5);

        let reply = toolkit
            .handle(Request::SharingReconstruct {
                shares: shares[2..].to_vec(),
                prime: None,
            })
            .unwrap();
        let Response::Secret { secret } = reply.body else {
            panic!("expected secret");
        };
        assert_eq!(secret, big(42));
    }

    #[test]
    fn schnorr_moves_through_messages() {
        let mut toolkit = toolkit(&[6, 3, 2]);
        let Response::SchnorrSetup {
            public_parameters,
            private_key,
        } = toolkit
            .handle(Request::SchnorrSetup {
                p: None,
                g: None,
                x: None,
            })
            .unwrap()
            .body
        else {
            panic!("expected setup");
        };
        assert_eq!(public_parameters.y(), &big(8));

        let Response::SchnorrCommitment { commitment, nonce } = toolkit
            .handle(Request::SchnorrCommit {
                public_parameters: public_parameters.clone(),
                nonce: None,
            })
            .unwrap()
            .body
        else {
            panic!("expected commitment");
        };
        assert_eq!((commitment.clone(), nonce.clone()), (big(10), big(3)));

        let Response::Challenge { challenge } = toolkit
            .handle(Request::SchnorrChallenge {
                public_parameters: public_parameters.clone(),
            })
            .unwrap()
            .body
        else {
            panic!("expected challenge");
        };
        assert_eq!(challenge, big(2));

        let Response::SchnorrResponse { response } = toolkit
            .handle(Request::SchnorrRespond {
                public_parameters: public_parameters.clone(),
                private_key,
                nonce,
                challenge: challenge.clone(),
            })
            .unwrap()
            .body
        else {
            panic!("expected response");
        };
        assert_eq!(response, big(15));

        let Response::Verification { is_valid } = toolkit
            .handle(Request::SchnorrVerify {
                public_parameters,
                transcript: Transcript {
                    commitment,
                    challenge,
                    response,
                },
            })
            .unwrap()
            .body
        else {
            panic!("expected verification");
        };
        assert!(is_valid);
    }

    #[test]
    fn commitment_with_explicit_randomness() {
        let mut toolkit = toolkit(&[1]);
        let Response::Commitment(opening) = toolkit
            .handle(Request::CommitmentCommit {
                public_parameters: None,
                message: big(4),
                randomness: Some(big(2)),
            })
            .unwrap()
            .body
        else {
            panic!("expected commitment");
        };
        assert_eq!(opening.commitment, big(12));
    }

    fn parse(value: serde_json::Value) -> Request {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn degenerate_keys_are_rejected() {
        use serde_json::json;

        let paillier_pk = json!({"n": "0"});
        let paillier_ct = json!({"value": "1", "modulus": "0"});
        let elgamal_pk = json!({"p": "0", "g": "5", "y": "8"});
        let elgamal_ct = json!({"c1": "1", "c2": "1", "modulus": "0"});
        let requests = [
            json!({"operation": "schnorr.setup", "p": 0}),
            json!({"operation": "schnorr.setup", "p": 1, "g": 0}),
            json!({"operation": "paillier.encrypt", "publicKey": paillier_pk, "message": 0}),
            json!({
                "operation": "paillier.decrypt",
                "keyPair": {
                    "publicKey": paillier_pk,
                    "privateKey": {"lambda": "1", "mu": "1"}
                },
                "ciphertext": paillier_ct
            }),
            json!({
                "operation": "paillier.add",
                "publicKey": paillier_pk,
                "ciphertext1": paillier_ct,
                "ciphertext2": paillier_ct
            }),
            json!({
                "operation": "paillier.scale",
                "publicKey": paillier_pk,
                "ciphertext": paillier_ct,
                "factor": 3
            }),
            json!({"operation": "elgamal.encrypt", "publicKey": elgamal_pk, "message": 0}),
            json!({
                "operation": "elgamal.decrypt",
                "keyPair": {"publicKey": elgamal_pk, "privateKey": {"x": "6"}},
                "ciphertext": elgamal_ct
            }),
            json!({
                "operation": "elgamal.multiply",
                "publicKey": elgamal_pk,
                "ciphertext1": elgamal_ct,
                "ciphertext2": elgamal_ct
            }),
            json!({
                "operation": "homomorphic.combine",
                "publicKey": {"scheme": "additive", "n": "0"},
                "ciphertext1": {"scheme": "additive", "value": "1", "modulus": "0"},
                "ciphertext2": {"scheme": "additive", "value": "1", "modulus": "0"}
            }),
            json!({
                "operation": "homomorphic.combine",
                "publicKey": {"scheme": "multiplicative", "p": "0", "g": "5", "y": "8"},
                "ciphertext1": {"scheme": "multiplicative", "c1": "1", "c2": "1", "modulus": "0"},
                "ciphertext2": {"scheme": "multiplicative", "c1": "1", "c2": "1", "modulus": "0"}
            }),
        ];

        let mut toolkit = toolkit(&[1]);
        for value in requests {
            let request = parse(value);
            let operation = request.operation();
            assert!(
                matches!(toolkit.handle(request), Err(Error::InvalidParameter(_))),
                "{operation} accepted a degenerate modulus"
            );
        }
    }

    #[test]
    fn elgamal_decrypt_rejects_mismatched_private_key() {
        // 5^7 mod 23 = 17, not 8
        let request = parse(serde_json::json!({
            "operation": "elgamal.decrypt",
            "keyPair": {
                "publicKey": {"p": "17", "g": "5", "y": "8"},
                "privateKey": {"x": "7"}
            },
            "ciphertext": {"c1": "a", "c2": "1", "modulus": "17"}
        }));
        assert!(matches!(
            toolkit(&[1]).handle(request),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn sharing_sum_over_parties() {
        let mut toolkit = toolkit(&[5, 7, 3]);
        let mut parties = Vec::new();
        for (secret, k) in [(42, 3), (11, 2)] {
            let Response::Shares { shares, .. } = toolkit
                .handle(Request::SharingGenerate {
                    secret: big(secret),
                    n: 3,
                    k,
                    prime: None,
                })
                .unwrap()
                .body
            else {
                panic!("expected shares");
            };
            parties.push(shares);
        }

        let reply = toolkit
            .handle(Request::SharingSum {
                parties,
                threshold: 3,
                prime: None,
            })
            .unwrap();
        assert_eq!(reply.algorithm, Algorithm::Shamir);
        let Response::PartySum(sum) = reply.body else {
            panic!("expected party sum");
        };
        assert_eq!(sum.results.len(), 2);
        assert_eq!(sum.total, big(53));
    }

    #[test]
    fn rejects_invalid_configuration() {
        let mut config = ToolkitConfig::default();
        config.commitment.h = config.commitment.g.clone();
        assert!(Toolkit::new(config).is_err());
    }
}
