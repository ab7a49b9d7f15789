//! ElGamal-style multiplicative homomorphic encryption over `Z*_p`.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use super::{HomomorphicScheme, Operation};
use crate::primitives::encoding::hex;
use crate::primitives::field::{check_exponent, check_group, mod_inverse};
use crate::primitives::RandomSource;
use crate::{Error, Result};

/// Public key `(p, g, y = g^x mod p)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalPublicKey {
    #[serde(with = "hex")]
    p: BigUint,
    #[serde(with = "hex")]
    g: BigUint,
    #[serde(with = "hex")]
    y: BigUint,
}

/// Private exponent `x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalPrivateKey {
    #[serde(with = "hex")]
    x: BigUint,
}

/// Matching public/private key pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElGamalKeyPair {
    pub public_key: ElGamalPublicKey,
    pub private_key: ElGamalPrivateKey,
}

/// Ciphertext `(c1, c2)`, tagged with the prime it was produced under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElGamalCiphertext {
    #[serde(with = "hex")]
    c1: BigUint,
    #[serde(with = "hex")]
    c2: BigUint,
    #[serde(with = "hex")]
    modulus: BigUint,
}

impl ElGamalCiphertext {
    pub fn new(c1: BigUint, c2: BigUint, modulus: BigUint) -> Self {
        Self { c1, c2, modulus }
    }

    pub fn c1(&self) -> &BigUint {
        &self.c1
    }

    pub fn c2(&self) -> &BigUint {
        &self.c2
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
}

impl ElGamalPublicKey {
    /// Checks that `p` is a prime `>= 5`, `g` generates `Z*_p` and `y` lies
    /// in `[1, p)`.
    pub fn validate(&self) -> Result<()> {
        check_group(&self.p, &self.g)?;
        if self.y.is_zero() || self.y >= self.p {
            return Err(Error::invalid("public key y must lie in [1, p)"));
        }
        Ok(())
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    pub fn y(&self) -> &BigUint {
        &self.y
    }

    fn check_modulus(&self, c: &ElGamalCiphertext) -> Result<()> {
        if c.modulus != self.p {
            return Err(Error::TypeMismatch(format!(
                "ciphertext modulus {} does not match key modulus {}",
                c.modulus, self.p
            )));
        }
        Ok(())
    }

    /// Encrypts `m` with a caller-supplied ephemeral exponent `k`.
    pub fn encrypt_with(&self, m: &BigUint, k: &BigUint) -> Result<ElGamalCiphertext> {
        if *m >= self.p {
            return Err(Error::out_of_range(format!(
                "message must be below the prime {}",
                self.p
            )));
        }
        check_exponent(k, &self.p, "ephemeral exponent")?;
        let c1 = self.g.modpow(k, &self.p);
        let c2 = (m * self.y.modpow(k, &self.p)) % &self.p;
        Ok(ElGamalCiphertext {
            c1,
            c2,
            modulus: self.p.clone(),
        })
    }
}

impl HomomorphicScheme for ElGamalPublicKey {
    type Ciphertext = ElGamalCiphertext;

    const OPERATION: Operation = Operation::Multiplication;

    fn plaintext_modulus(&self) -> &BigUint {
        &self.p
    }

    fn encrypt<R: RandomSource + ?Sized>(
        &self,
        m: &BigUint,
        rng: &mut R,
    ) -> Result<ElGamalCiphertext> {
        let k = rng.sample_range(&BigUint::one(), &(&self.p - 1u8));
        self.encrypt_with(m, &k)
    }

    /// Component-wise product, an encryption of `m1 * m2 mod p`.
    fn combine(&self, a: &ElGamalCiphertext, b: &ElGamalCiphertext) -> Result<ElGamalCiphertext> {
        self.check_modulus(a)?;
        self.check_modulus(b)?;
        Ok(ElGamalCiphertext {
            c1: (&a.c1 * &b.c1) % &self.p,
            c2: (&a.c2 * &b.c2) % &self.p,
            modulus: self.p.clone(),
        })
    }
}

impl ElGamalPrivateKey {
    pub fn x(&self) -> &BigUint {
        &self.x
    }
}

impl ElGamalKeyPair {
    /// Samples a private exponent in `[1, p-2]` for the group `(p, g)`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidParameter`] unless `p` is a prime `>= 5`
    /// and `g` generates `Z*_p`.
    pub fn generate<R: RandomSource + ?Sized>(
        p: &BigUint,
        g: &BigUint,
        rng: &mut R,
    ) -> Result<Self> {
        check_group(p, g)?;
        let x = rng.sample_range(&BigUint::one(), &(p - 1u8));
        Self::build(p, g, x)
    }

    /// Builds a key pair from a known private exponent `x` in `[1, p-2]`.
    pub fn from_private(p: &BigUint, g: &BigUint, x: &BigUint) -> Result<Self> {
        check_group(p, g)?;
        check_exponent(x, p, "private exponent")?;
        Self::build(p, g, x.clone())
    }

    fn build(p: &BigUint, g: &BigUint, x: BigUint) -> Result<Self> {
        let y = g.modpow(&x, p);
        tracing::debug!(bits = p.bits(), "generated ElGamal key pair");
        Ok(Self {
            public_key: ElGamalPublicKey {
                p: p.clone(),
                g: g.clone(),
                y,
            },
            private_key: ElGamalPrivateKey { x },
        })
    }

    /// Checks the public key and that `x` matches `y`.
    pub fn validate(&self) -> Result<()> {
        let pk = &self.public_key;
        pk.validate()?;
        check_exponent(&self.private_key.x, &pk.p, "private exponent")?;
        if pk.g.modpow(&self.private_key.x, &pk.p) != pk.y {
            return Err(Error::invalid("private exponent does not match public key y"));
        }
        Ok(())
    }

    /// Recovers `m = c2 * (c1^x)^-1 mod p`.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if the ciphertext belongs to another prime
    /// - [`Error::DivisionByZero`] if `c1 ≡ 0 (mod p)`
    pub fn decrypt(&self, c: &ElGamalCiphertext) -> Result<BigUint> {
        let pk = &self.public_key;
        pk.check_modulus(c)?;
        let s = c.c1.modpow(&self.private_key.x, &pk.p);
        let s_inv = mod_inverse(&s, &pk.p)?;
        Ok((&c.c2 * s_inv) % &pk.p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{FixedSource, SecureRng};

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn demo_keys() -> ElGamalKeyPair {
        ElGamalKeyPair::from_private(&big(23), &big(5), &big(6)).unwrap()
    }

    #[test]
    fn fixed_key_public_value() {
        // 5^6 mod 23 = 8
        assert_eq!(demo_keys().public_key.y(), &big(8));
    }

    #[test]
    fn encrypt_decrypt_all_messages() {
        let keys = demo_keys();
        let mut rng = SecureRng::new();
        for m in 0..23u64 {
            let c = keys.public_key.encrypt(&big(m), &mut rng).unwrap();
            assert_eq!(keys.decrypt(&c).unwrap(), big(m));
        }
    }

    #[test]
    fn known_ciphertext() {
        // k = 3: c1 = 5^3 = 125 ≡ 10, c2 = 4 * 8^3 = 2048 ≡ 1 (mod 23)
        let keys = demo_keys();
        let mut rng = FixedSource::new([3u32]);
        let c = keys.public_key.encrypt(&big(4), &mut rng).unwrap();
        assert_eq!(c.c1(), &big(10));
        assert_eq!(c.c2(), &big(1));
    }

    #[test]
    fn multiplicative_homomorphism() {
        let keys = demo_keys();
        let mut rng = SecureRng::new();
        let c1 = keys.public_key.encrypt(&big(4), &mut rng).unwrap();
        let c2 = keys.public_key.encrypt(&big(5), &mut rng).unwrap();
        let product = keys.public_key.combine(&c1, &c2).unwrap();
        assert_eq!(keys.decrypt(&product).unwrap(), big(20));

        let c3 = keys.public_key.encrypt(&big(3), &mut rng).unwrap();
        let product = keys.public_key.combine(&product, &c3).unwrap();
        assert_eq!(keys.decrypt(&product).unwrap(), big(60 % 23));
    }

    #[test]
    fn generated_keys_round_trip() {
        let mut rng = SecureRng::new();
        let keys = ElGamalKeyPair::generate(&big(467), &big(2), &mut rng).unwrap();
        let x = keys.private_key.x();
        assert!(*x >= big(1) && *x <= big(465));
        let c = keys.public_key.encrypt(&big(123), &mut rng).unwrap();
        assert_eq!(keys.decrypt(&c).unwrap(), big(123));
    }

    #[test]
    fn message_at_prime_is_out_of_range() {
        let keys = demo_keys();
        let mut rng = SecureRng::new();
        assert!(matches!(
            keys.public_key.encrypt(&big(23), &mut rng),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn rejects_bad_group() {
        assert!(ElGamalKeyPair::from_private(&big(24), &big(5), &big(6)).is_err());
        assert!(ElGamalKeyPair::from_private(&big(23), &big(2), &big(6)).is_err());
        assert!(ElGamalKeyPair::from_private(&big(23), &big(5), &big(22)).is_err());
        assert!(ElGamalKeyPair::from_private(&big(23), &big(5), &big(0)).is_err());
    }

    #[test]
    fn zero_c1_is_division_by_zero() {
        let keys = demo_keys();
        let c = ElGamalCiphertext::new(big(0), big(5), big(23));
        assert!(matches!(keys.decrypt(&c), Err(Error::DivisionByZero(_))));
    }

    #[test]
    fn mismatched_primes_rejected() {
        let keys = demo_keys();
        let other = ElGamalCiphertext::new(big(3), big(4), big(29));
        let mut rng = SecureRng::new();
        let own = keys.public_key.encrypt(&big(2), &mut rng).unwrap();
        assert!(matches!(
            keys.public_key.combine(&own, &other),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn deserialized_keys_are_validated() {
        let pk: ElGamalPublicKey = serde_json::from_str(r#"{"p":"0","g":"5","y":"8"}"#).unwrap();
        assert!(matches!(pk.validate(), Err(Error::InvalidParameter(_))));
        // y = 0 is outside [1, p)
        let pk: ElGamalPublicKey = serde_json::from_str(r#"{"p":"17","g":"5","y":"0"}"#).unwrap();
        assert!(matches!(pk.validate(), Err(Error::InvalidParameter(_))));

        let mut keys = demo_keys();
        assert!(keys.validate().is_ok());
        keys.private_key = ElGamalPrivateKey { x: big(7) };
        assert!(matches!(keys.validate(), Err(Error::InvalidParameter(_))));
    }
}
