//! Homomorphic encryption engines.
//!
//! Two independent schemes sharing no state:
//! - **paillier**: ciphertext product ⇒ plaintext sum (mod `n`)
//! - **elgamal**: component-wise ciphertext product ⇒ plaintext product (mod `p`)
//!
//! Ciphertexts record the modulus they were produced under, so combining
//! operands from different schemes or key instances fails with
//! [`Error::TypeMismatch`] instead of producing garbage.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::primitives::encoding::decimal;
use crate::primitives::RandomSource;
use crate::{Error, Result};

/// ElGamal-style multiplicative scheme.
pub mod elgamal;
/// Paillier-style additive scheme.
pub mod paillier;

pub use elgamal::{ElGamalCiphertext, ElGamalKeyPair, ElGamalPrivateKey, ElGamalPublicKey};
pub use paillier::{PaillierCiphertext, PaillierKeyPair, PaillierPrivateKey, PaillierPublicKey};

/// Minimum number of values accepted by the demo flows.
pub const DEMO_MIN_VALUES: usize = 2;
/// Maximum number of values accepted by the demo flows.
pub const DEMO_MAX_VALUES: usize = 5;

/// Plaintext operation realized by combining ciphertexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Addition,
    Multiplication,
}

/// Public-key side of a homomorphic scheme.
pub trait HomomorphicScheme {
    /// Ciphertext type produced by this scheme.
    type Ciphertext: Clone + core::fmt::Debug;

    /// Plaintext operation that [`combine`](Self::combine) realizes.
    const OPERATION: Operation;

    /// Plaintexts live in `[0, plaintext_modulus)`.
    fn plaintext_modulus(&self) -> &BigUint;

    /// Encrypts `m` with fresh randomness.
    ///
    /// Fails with [`Error::OutOfRange`] if `m` is not below the plaintext modulus.
    fn encrypt<R: RandomSource + ?Sized>(
        &self,
        m: &BigUint,
        rng: &mut R,
    ) -> Result<Self::Ciphertext>;

    /// Combines two ciphertexts under this key.
    fn combine(&self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Result<Self::Ciphertext>;

    /// Folds a non-empty list of ciphertexts with [`combine`](Self::combine).
    fn combine_all(&self, ciphertexts: &[Self::Ciphertext]) -> Result<Self::Ciphertext> {
        let (first, rest) = ciphertexts
            .split_first()
            .ok_or_else(|| Error::invalid("no ciphertexts to combine"))?;
        rest.iter()
            .try_fold(first.clone(), |acc, c| self.combine(&acc, c))
    }
}

/// Public key of either scheme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum PublicKey {
    Additive(PaillierPublicKey),
    Multiplicative(ElGamalPublicKey),
}

/// Ciphertext of either scheme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Ciphertext {
    Additive(PaillierCiphertext),
    Multiplicative(ElGamalCiphertext),
}

impl Ciphertext {
    /// Scheme name, for diagnostics.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Additive(_) => "additive",
            Self::Multiplicative(_) => "multiplicative",
        }
    }
}

impl PublicKey {
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Additive(_) => "additive",
            Self::Multiplicative(_) => "multiplicative",
        }
    }

    /// Validates the wrapped key.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Additive(pk) => pk.validate(),
            Self::Multiplicative(pk) => pk.validate(),
        }
    }

    /// Combines two ciphertexts, rejecting operands of another scheme.
    pub fn combine(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        match (self, a, b) {
            (Self::Additive(pk), Ciphertext::Additive(a), Ciphertext::Additive(b)) => {
                pk.combine(a, b).map(Ciphertext::Additive)
            }
            (
                Self::Multiplicative(pk),
                Ciphertext::Multiplicative(a),
                Ciphertext::Multiplicative(b),
            ) => pk.combine(a, b).map(Ciphertext::Multiplicative),
            _ => Err(Error::TypeMismatch(format!(
                "cannot combine {} and {} ciphertexts under a {} key",
                a.scheme(),
                b.scheme(),
                self.scheme()
            ))),
        }
    }
}

/// Result of an encrypt-combine-decrypt round trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HomomorphicDemo {
    pub operation: Operation,
    pub ciphertexts: Vec<Ciphertext>,
    pub combined: Ciphertext,
    #[serde(with = "decimal")]
    pub result: BigUint,
}

fn check_demo_values(values: &[BigUint]) -> Result<()> {
    if !(DEMO_MIN_VALUES..=DEMO_MAX_VALUES).contains(&values.len()) {
        return Err(Error::invalid(format!(
            "demo takes {DEMO_MIN_VALUES} to {DEMO_MAX_VALUES} values, got {}",
            values.len()
        )));
    }
    Ok(())
}

fn encrypt_and_fold<S, R>(
    scheme: &S,
    values: &[BigUint],
    rng: &mut R,
) -> Result<(Vec<S::Ciphertext>, S::Ciphertext)>
where
    S: HomomorphicScheme,
    R: RandomSource + ?Sized,
{
    check_demo_values(values)?;
    let ciphertexts = values
        .iter()
        .map(|m| scheme.encrypt(m, &mut *rng))
        .collect::<Result<Vec<_>>>()?;
    let combined = scheme.combine_all(&ciphertexts)?;
    Ok((ciphertexts, combined))
}

/// Encrypts each value under the additive scheme, sums homomorphically and
/// decrypts the sum.
pub fn demo_addition<R: RandomSource + ?Sized>(
    keys: &PaillierKeyPair,
    values: &[BigUint],
    rng: &mut R,
) -> Result<HomomorphicDemo> {
    let (ciphertexts, combined) = encrypt_and_fold(&keys.public_key, values, rng)?;
    let result = keys.decrypt(&combined)?;
    Ok(HomomorphicDemo {
        operation: Operation::Addition,
        ciphertexts: ciphertexts.into_iter().map(Ciphertext::Additive).collect(),
        combined: Ciphertext::Additive(combined),
        result,
    })
}

/// Encrypts each value under the multiplicative scheme, multiplies
/// homomorphically and decrypts the product.
pub fn demo_multiplication<R: RandomSource + ?Sized>(
    keys: &ElGamalKeyPair,
    values: &[BigUint],
    rng: &mut R,
) -> Result<HomomorphicDemo> {
    let (ciphertexts, combined) = encrypt_and_fold(&keys.public_key, values, rng)?;
    let result = keys.decrypt(&combined)?;
    Ok(HomomorphicDemo {
        operation: Operation::Multiplication,
        ciphertexts: ciphertexts
            .into_iter()
            .map(Ciphertext::Multiplicative)
            .collect(),
        combined: Ciphertext::Multiplicative(combined),
        result,
    })
}
