//! JSON request and response messages.
//!
//! A request is an object whose `operation` field names the call, e.g.
//! `{"operation": "sharing.generate", "secret": 42, "n": 5, "k": 3}`.
//! Field elements, keys and ciphertexts are radix-16 strings; secrets,
//! messages, plaintexts and group parameter overrides (`p`, `q`, `g`,
//! `prime`) are decimal, as in the configuration file. Omitted overrides fall
//! back to the toolkit configuration.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::commitment::{CommitmentDemo, PedersenCommitment, PedersenParams};
use crate::homomorphic::{
    Ciphertext, ElGamalCiphertext, ElGamalKeyPair, ElGamalPrivateKey, ElGamalPublicKey,
    HomomorphicDemo, Operation, PaillierCiphertext, PaillierKeyPair, PaillierPrivateKey,
    PaillierPublicKey, PublicKey,
};
use crate::primitives::encoding::{decimal, hex};
use crate::protocol::{PrivateKey, PublicParameters, SchnorrDemo, Transcript};
use crate::sharing::{PartySum, Share, SharingDemo};

/// A single toolkit call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all_fields = "camelCase")]
pub enum Request {
    #[serde(rename = "sharing.generate")]
    SharingGenerate {
        #[serde(with = "decimal")]
        secret: BigUint,
        n: usize,
        k: usize,
        #[serde(default, with = "decimal::option")]
        prime: Option<BigUint>,
    },
    #[serde(rename = "sharing.reconstruct")]
    SharingReconstruct {
        shares: Vec<Share>,
        #[serde(default, with = "decimal::option")]
        prime: Option<BigUint>,
    },
    /// Reconstructs every party's secret from its first `threshold` shares
    /// and totals them.
    #[serde(rename = "sharing.sum")]
    SharingSum {
        parties: Vec<Vec<Share>>,
        threshold: usize,
        #[serde(default, with = "decimal::option")]
        prime: Option<BigUint>,
    },
    #[serde(rename = "sharing.demo")]
    SharingDemo {
        #[serde(with = "decimal")]
        secret: BigUint,
        n: usize,
        k: usize,
    },

    #[serde(rename = "paillier.generate")]
    PaillierGenerate {
        #[serde(default, with = "decimal::option")]
        p: Option<BigUint>,
        #[serde(default, with = "decimal::option")]
        q: Option<BigUint>,
    },
    #[serde(rename = "paillier.encrypt")]
    PaillierEncrypt {
        public_key: PaillierPublicKey,
        #[serde(with = "decimal")]
        message: BigUint,
    },
    #[serde(rename = "paillier.decrypt")]
    PaillierDecrypt {
        key_pair: PaillierKeyPair,
        ciphertext: PaillierCiphertext,
    },
    #[serde(rename = "paillier.add")]
    PaillierAdd {
        public_key: PaillierPublicKey,
        ciphertext1: PaillierCiphertext,
        ciphertext2: PaillierCiphertext,
    },
    #[serde(rename = "paillier.scale")]
    PaillierScale {
        public_key: PaillierPublicKey,
        ciphertext: PaillierCiphertext,
        #[serde(with = "decimal")]
        factor: BigUint,
    },

    #[serde(rename = "elgamal.generate")]
    ElGamalGenerate {
        #[serde(default, with = "decimal::option")]
        p: Option<BigUint>,
        #[serde(default, with = "decimal::option")]
        g: Option<BigUint>,
        /// Private exponent; sampled when absent.
        #[serde(default, with = "hex::option")]
        x: Option<BigUint>,
    },
    #[serde(rename = "elgamal.encrypt")]
    ElGamalEncrypt {
        public_key: ElGamalPublicKey,
        #[serde(with = "decimal")]
        message: BigUint,
    },
    #[serde(rename = "elgamal.decrypt")]
    ElGamalDecrypt {
        key_pair: ElGamalKeyPair,
        ciphertext: ElGamalCiphertext,
    },
    #[serde(rename = "elgamal.multiply")]
    ElGamalMultiply {
        public_key: ElGamalPublicKey,
        ciphertext1: ElGamalCiphertext,
        ciphertext2: ElGamalCiphertext,
    },

    /// Scheme-agnostic combination; operands must match the key's scheme.
    #[serde(rename = "homomorphic.combine")]
    HomomorphicCombine {
        public_key: PublicKey,
        ciphertext1: Ciphertext,
        ciphertext2: Ciphertext,
    },
    #[serde(rename = "homomorphic.demo")]
    HomomorphicDemo {
        kind: Operation,
        #[serde(with = "decimal_list")]
        values: Vec<BigUint>,
    },

    #[serde(rename = "schnorr.setup")]
    SchnorrSetup {
        #[serde(default, with = "decimal::option")]
        p: Option<BigUint>,
        #[serde(default, with = "decimal::option")]
        g: Option<BigUint>,
        #[serde(default, with = "hex::option")]
        x: Option<BigUint>,
    },
    #[serde(rename = "schnorr.commit")]
    SchnorrCommit {
        public_parameters: PublicParameters,
        /// Commitment exponent; sampled when absent.
        #[serde(default, with = "hex::option")]
        nonce: Option<BigUint>,
    },
    #[serde(rename = "schnorr.challenge")]
    SchnorrChallenge { public_parameters: PublicParameters },
    #[serde(rename = "schnorr.respond")]
    SchnorrRespond {
        public_parameters: PublicParameters,
        private_key: PrivateKey,
        #[serde(with = "hex")]
        nonce: BigUint,
        #[serde(with = "hex")]
        challenge: BigUint,
    },
    #[serde(rename = "schnorr.verify")]
    SchnorrVerify {
        public_parameters: PublicParameters,
        #[serde(flatten)]
        transcript: Transcript,
    },
    #[serde(rename = "schnorr.demo")]
    SchnorrDemo {
        #[serde(default, with = "hex::option")]
        x: Option<BigUint>,
    },

    #[serde(rename = "commitment.setup")]
    CommitmentSetup,
    #[serde(rename = "commitment.commit")]
    CommitmentCommit {
        #[serde(default)]
        public_parameters: Option<PedersenParams>,
        #[serde(with = "decimal")]
        message: BigUint,
        /// Blinding value; sampled when absent.
        #[serde(default, with = "decimal::option")]
        randomness: Option<BigUint>,
    },
    #[serde(rename = "commitment.open")]
    CommitmentOpen {
        #[serde(default)]
        public_parameters: Option<PedersenParams>,
        #[serde(with = "hex")]
        commitment: BigUint,
        #[serde(with = "decimal")]
        message: BigUint,
        #[serde(with = "decimal")]
        randomness: BigUint,
    },
    #[serde(rename = "commitment.demo")]
    CommitmentDemo {
        #[serde(with = "decimal")]
        message: BigUint,
    },
}

impl Request {
    /// Wire name of the operation.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SharingGenerate { .. } => "sharing.generate",
            Self::SharingReconstruct { .. } => "sharing.reconstruct",
            Self::SharingSum { .. } => "sharing.sum",
            Self::SharingDemo { .. } => "sharing.demo",
            Self::PaillierGenerate { .. } => "paillier.generate",
            Self::PaillierEncrypt { .. } => "paillier.encrypt",
            Self::PaillierDecrypt { .. } => "paillier.decrypt",
            Self::PaillierAdd { .. } => "paillier.add",
            Self::PaillierScale { .. } => "paillier.scale",
            Self::ElGamalGenerate { .. } => "elgamal.generate",
            Self::ElGamalEncrypt { .. } => "elgamal.encrypt",
            Self::ElGamalDecrypt { .. } => "elgamal.decrypt",
            Self::ElGamalMultiply { .. } => "elgamal.multiply",
            Self::HomomorphicCombine { .. } => "homomorphic.combine",
            Self::HomomorphicDemo { .. } => "homomorphic.demo",
            Self::SchnorrSetup { .. } => "schnorr.setup",
            Self::SchnorrCommit { .. } => "schnorr.commit",
            Self::SchnorrChallenge { .. } => "schnorr.challenge",
            Self::SchnorrRespond { .. } => "schnorr.respond",
            Self::SchnorrVerify { .. } => "schnorr.verify",
            Self::SchnorrDemo { .. } => "schnorr.demo",
            Self::CommitmentSetup => "commitment.setup",
            Self::CommitmentCommit { .. } => "commitment.commit",
            Self::CommitmentOpen { .. } => "commitment.open",
            Self::CommitmentDemo { .. } => "commitment.demo",
        }
    }
}

/// Human-readable algorithm label attached to every reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "Shamir Secret Sharing")]
    Shamir,
    #[serde(rename = "Paillier")]
    Paillier,
    #[serde(rename = "ElGamal")]
    ElGamal,
    #[serde(rename = "Homomorphic Encryption")]
    Homomorphic,
    #[serde(rename = "Schnorr Identification Protocol")]
    Schnorr,
    #[serde(rename = "Pedersen Commitment Scheme")]
    Pedersen,
}

/// Result payload of a toolkit call.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum Response {
    Shares {
        #[serde(with = "decimal")]
        prime: BigUint,
        n: usize,
        k: usize,
        shares: Vec<Share>,
    },
    Secret {
        #[serde(with = "decimal")]
        secret: BigUint,
    },
    PartySum(PartySum),
    SharingDemo(SharingDemo),
    PaillierKeys {
        public_key: PaillierPublicKey,
        private_key: PaillierPrivateKey,
        homomorphic_operation: Operation,
    },
    ElGamalKeys {
        public_key: ElGamalPublicKey,
        private_key: ElGamalPrivateKey,
        homomorphic_operation: Operation,
    },
    Encrypted {
        ciphertext: Ciphertext,
    },
    Decrypted {
        #[serde(with = "decimal")]
        plaintext: BigUint,
    },
    HomomorphicDemo(HomomorphicDemo),
    SchnorrSetup {
        public_parameters: PublicParameters,
        private_key: PrivateKey,
    },
    SchnorrCommitment {
        #[serde(with = "hex")]
        commitment: BigUint,
        /// Must be passed back to `schnorr.respond`.
        #[serde(with = "hex")]
        nonce: BigUint,
    },
    Challenge {
        #[serde(with = "hex")]
        challenge: BigUint,
    },
    SchnorrResponse {
        #[serde(with = "hex")]
        response: BigUint,
    },
    Verification {
        is_valid: bool,
    },
    SchnorrDemo(SchnorrDemo),
    CommitmentSetup {
        public_parameters: PedersenParams,
    },
    Commitment(PedersenCommitment),
    CommitmentDemo(CommitmentDemo),
}

/// Response tagged with the algorithm that produced it.
#[derive(Clone, Debug, Serialize)]
pub struct Reply {
    pub algorithm: Algorithm,
    #[serde(flatten)]
    pub body: Response,
}

impl Reply {
    pub fn new(algorithm: Algorithm, body: Response) -> Self {
        Self { algorithm, body }
    }
}

/// Accepts a list of integers or decimal strings.
mod decimal_list {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Item(#[serde(with = "crate::primitives::encoding::decimal")] BigUint);

    pub fn serialize<S: Serializer>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| v.to_str_radix(10)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<BigUint>, D::Error> {
        Ok(Vec::<Item>::deserialize(deserializer)?
            .into_iter()
            .map(|item| item.0)
            .collect())
    }
}
