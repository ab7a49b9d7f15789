//! Protocol gadgets for Schnorr identification.
//!
//! Public parameters, the private key, and the three protocol messages
//! (commitment, challenge, response) collected into a [`Transcript`].

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::primitives::encoding::hex;
use crate::primitives::field::{check_exponent, check_group};
use crate::{Error, Result};

/// Public parameters `(p, g, y)` with `y = g^x mod p`.
///
/// # Security
///
/// `p` must be prime and `g` must generate `Z*_p`. Demonstration primes in
/// the tens offer no security at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParameters {
    #[serde(with = "hex")]
    p: BigUint,
    #[serde(with = "hex")]
    g: BigUint,
    #[serde(with = "hex")]
    y: BigUint,
}

impl PublicParameters {
    /// Creates validated public parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `p` is not a prime `>= 5`, `g`
    /// is not a generator, or `y` is not in `[1, p)`.
    pub fn new(p: BigUint, g: BigUint, y: BigUint) -> Result<Self> {
        let params = Self { p, g, y };
        params.validate()?;
        Ok(params)
    }

    /// Checks the invariants of [`PublicParameters::new`].
    ///
    /// Useful after deserializing parameters received from a peer.
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

    /// Exponent modulus `p - 1`.
    pub fn order(&self) -> BigUint {
        &self.p - 1u8
    }
}

/// Secret discrete logarithm `x`.
///
/// Never transmit this to a verifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    #[serde(with = "hex")]
    x: BigUint,
}

impl PrivateKey {
    pub fn new(x: BigUint) -> Self {
        Self { x }
    }

    pub fn x(&self) -> &BigUint {
        &self.x
    }
}

/// Builds `(PublicParameters { p, g, y = g^x }, PrivateKey { x })`.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] for a non-prime `p` or a non-generator `g`
/// - [`Error::OutOfRange`] if `x` is outside `[1, p-2]`
pub fn setup(p: &BigUint, g: &BigUint, x: &BigUint) -> Result<(PublicParameters, PrivateKey)> {
    check_group(p, g)?;
    check_exponent(x, p, "private key")?;
    let y = g.modpow(x, p);
    tracing::debug!(bits = p.bits(), "Schnorr parameters set");
    Ok((
        PublicParameters {
            p: p.clone(),
            g: g.clone(),
            y,
        },
        PrivateKey::new(x.clone()),
    ))
}

/// First message `A = g^r mod p`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    #[serde(with = "hex")]
    a: BigUint,
}

impl Commitment {
    pub fn new(a: BigUint) -> Self {
        Self { a }
    }

    pub fn a(&self) -> &BigUint {
        &self.a
    }
}

/// Prover's secret commitment exponent `r`.
///
/// Must be kept by the prover until the response is computed and never
/// reused across runs: two responses under one `r` reveal `x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce {
    #[serde(with = "hex")]
    r: BigUint,
}

impl Nonce {
    pub fn new(r: BigUint) -> Self {
        Self { r }
    }

    pub fn r(&self) -> &BigUint {
        &self.r
    }
}

/// Third message `s = r + x*c mod (p-1)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(with = "hex")]
    s: BigUint,
}

impl Response {
    pub fn new(s: BigUint) -> Self {
        Self { s }
    }

    pub fn s(&self) -> &BigUint {
        &self.s
    }
}

/// Complete protocol run `{A, c, s}`.
///
/// Validity is a property of the whole triple together with the public
/// parameters, not of any single field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(with = "hex")]
    pub commitment: BigUint,
    #[serde(with = "hex")]
    pub challenge: BigUint,
    #[serde(with = "hex")]
    pub response: BigUint,
}

impl Transcript {
    pub fn new(commitment: &Commitment, challenge: &BigUint, response: &Response) -> Self {
        Self {
            commitment: commitment.a.clone(),
            challenge: challenge.clone(),
            response: response.s.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn setup_computes_public_key() {
        let (params, key) = setup(&big(23), &big(5), &big(6)).unwrap();
        assert_eq!(params.y(), &big(8));
        assert_eq!(key.x(), &big(6));
        assert_eq!(params.order(), big(22));
    }

    #[test]
    fn setup_rejects_composite_modulus() {
        assert!(matches!(
            setup(&big(21), &big(5), &big(6)),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn setup_rejects_out_of_range_exponent() {
        assert!(matches!(
            setup(&big(23), &big(5), &big(0)),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            setup(&big(23), &big(5), &big(22)),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn parameters_validate_public_key() {
        assert!(PublicParameters::new(big(23), big(5), big(8)).is_ok());
        assert!(PublicParameters::new(big(23), big(5), big(0)).is_err());
        assert!(PublicParameters::new(big(23), big(5), big(23)).is_err());
    }

    #[test]
    fn transcript_serializes_as_hex() {
        let t = Transcript::new(&Commitment::new(big(10)), &big(2), &Response::new(big(15)));
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"commitment":"a","challenge":"2","response":"f"}"#);
    }
}
