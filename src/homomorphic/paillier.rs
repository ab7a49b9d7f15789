//! Paillier-style additive homomorphic encryption.
//!
//! Uses the simplified generator `g = n + 1`, so `L(g^λ mod n²) = λ mod n`
//! and the decryption constant is `μ = λ^-1 mod n`.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use super::{HomomorphicScheme, Operation};
use crate::primitives::encoding::hex;
use crate::primitives::field::{gcd, is_probable_prime, lcm, mod_inverse_coprime};
use crate::primitives::RandomSource;
use crate::{Error, Result};

/// Draws allowed when searching for randomness coprime to `n`.
const MAX_SAMPLING_ATTEMPTS: usize = 128;

/// Public key: the modulus `n = p*q`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaillierPublicKey {
    #[serde(with = "hex")]
    n: BigUint,
}

/// Private key `(λ, μ)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaillierPrivateKey {
    #[serde(with = "hex")]
    lambda: BigUint,
    #[serde(with = "hex")]
    mu: BigUint,
}

/// Matching public/private key pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaillierKeyPair {
    pub public_key: PaillierPublicKey,
    pub private_key: PaillierPrivateKey,
}

/// Ciphertext `c` in `Z*_{n²}`, tagged with the modulus it was produced under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaillierCiphertext {
    #[serde(with = "hex")]
    value: BigUint,
    #[serde(with = "hex")]
    modulus: BigUint,
}

impl PaillierCiphertext {
    pub fn new(value: BigUint, modulus: BigUint) -> Self {
        Self { value, modulus }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// The public modulus `n` of the key that produced this ciphertext.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
}

impl PaillierPublicKey {
    /// Wraps an existing modulus.
    pub fn new(n: BigUint) -> Result<Self> {
        let key = Self { n };
        key.validate()?;
        Ok(key)
    }

    /// Checks the invariant of [`PaillierPublicKey::new`].
    ///
    /// Keys received over the wire bypass `new`; validate them before use.
    pub fn validate(&self) -> Result<()> {
        if self.n < BigUint::from(6u8) {
            return Err(Error::invalid("Paillier modulus is too small"));
        }
        Ok(())
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn n_squared(&self) -> BigUint {
        &self.n * &self.n
    }

    /// The generator `g = n + 1`.
    pub fn generator(&self) -> BigUint {
        &self.n + 1u8
    }

    fn check_modulus(&self, c: &PaillierCiphertext) -> Result<()> {
        if c.modulus != self.n {
            return Err(Error::TypeMismatch(format!(
                "ciphertext modulus {} does not match key modulus {}",
                c.modulus, self.n
            )));
        }
        Ok(())
    }

    /// Encrypts `m` with caller-supplied randomness `r` (coprime to `n`).
    pub fn encrypt_with(&self, m: &BigUint, r: &BigUint) -> Result<PaillierCiphertext> {
        if *m >= self.n {
            return Err(Error::out_of_range(format!(
                "message must be below the modulus {}",
                self.n
            )));
        }
        if r.is_zero() || !gcd(r, &self.n).is_one() {
            return Err(Error::invalid("encryption randomness must be coprime to n"));
        }
        let n_squared = self.n_squared();
        let gm = self.generator().modpow(m, &n_squared);
        let rn = r.modpow(&self.n, &n_squared);
        Ok(PaillierCiphertext {
            value: (gm * rn) % &n_squared,
            modulus: self.n.clone(),
        })
    }

    /// `c^k mod n²`, an encryption of `m*k mod n`.
    pub fn scale(&self, c: &PaillierCiphertext, k: &BigUint) -> Result<PaillierCiphertext> {
        self.check_modulus(c)?;
        Ok(PaillierCiphertext {
            value: c.value.modpow(k, &self.n_squared()),
            modulus: self.n.clone(),
        })
    }
}

impl HomomorphicScheme for PaillierPublicKey {
    type Ciphertext = PaillierCiphertext;

    const OPERATION: Operation = Operation::Addition;

    fn plaintext_modulus(&self) -> &BigUint {
        &self.n
    }

    fn encrypt<R: RandomSource + ?Sized>(
        &self,
        m: &BigUint,
        rng: &mut R,
    ) -> Result<PaillierCiphertext> {
        let one = BigUint::one();
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let r = rng.sample_range(&one, &self.n);
            if gcd(&r, &self.n).is_one() {
                return self.encrypt_with(m, &r);
            }
        }
        Err(Error::invalid("randomness source never produced a unit modulo n"))
    }

    /// `c1 * c2 mod n²`, an encryption of `m1 + m2 mod n`.
    fn combine(
        &self,
        a: &PaillierCiphertext,
        b: &PaillierCiphertext,
    ) -> Result<PaillierCiphertext> {
        self.check_modulus(a)?;
        self.check_modulus(b)?;
        let n_squared = self.n_squared();
        Ok(PaillierCiphertext {
            value: (&a.value * &b.value) % &n_squared,
            modulus: self.n.clone(),
        })
    }
}

impl PaillierPrivateKey {
    pub fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    pub fn mu(&self) -> &BigUint {
        &self.mu
    }
}

impl PaillierKeyPair {
    /// Derives a key pair from the primes `p` and `q`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidParameter`] if either value is not prime,
    /// if `p == q`, or if `gcd(pq, (p-1)(q-1)) != 1`.
    pub fn generate(p: &BigUint, q: &BigUint) -> Result<Self> {
        if !is_probable_prime(p) || !is_probable_prime(q) {
            return Err(Error::invalid("Paillier factors must be prime"));
        }
        if p == q {
            return Err(Error::invalid("Paillier factors must be distinct"));
        }
        let n = p * q;
        let p1 = p - 1u8;
        let q1 = q - 1u8;
        if !gcd(&n, &(&p1 * &q1)).is_one() {
            return Err(Error::invalid("gcd(pq, (p-1)(q-1)) must be 1"));
        }
        let lambda = lcm(&p1, &q1);
        let mu = mod_inverse_coprime(&lambda, &n)?;

        tracing::debug!(bits = n.bits(), "generated Paillier key pair");
        Ok(Self {
            public_key: PaillierPublicKey { n },
            private_key: PaillierPrivateKey { lambda, mu },
        })
    }

    /// Checks the public half; the private values are unconstrained.
    pub fn validate(&self) -> Result<()> {
        self.public_key.validate()
    }

    /// Recovers `m = L(c^λ mod n²) * μ mod n`.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if the ciphertext belongs to another modulus
    /// - [`Error::InvalidParameter`] if `c` is outside `[1, n²)` or shares a
    ///   factor with `n`
    pub fn decrypt(&self, c: &PaillierCiphertext) -> Result<BigUint> {
        let pk = &self.public_key;
        pk.check_modulus(c)?;
        let n_squared = pk.n_squared();
        if c.value.is_zero() || c.value >= n_squared {
            return Err(Error::invalid("ciphertext outside [1, n^2)"));
        }
        if !gcd(&c.value, &pk.n).is_one() {
            return Err(Error::invalid("ciphertext is not a unit modulo n"));
        }
        let x = c.value.modpow(&self.private_key.lambda, &n_squared);
        let l = (x - 1u8) / &pk.n;
        Ok((l * &self.private_key.mu) % &pk.n)
    }
}
