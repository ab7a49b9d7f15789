//! Shamir threshold secret sharing over a prime field.
//!
//! A secret `s` becomes the constant term of a random polynomial `f` of
//! degree `k - 1`; party `i` receives `(i, f(i))`. Any `k` shares recover
//! `f(0)` by Lagrange interpolation, fewer reveal nothing.
//!
//! Reconstruction does not know the original threshold: interpolating fewer
//! than `k` shares silently yields a field element unrelated to the secret.
//! Shares carry no authenticity check either, so a forged `(x, y)` is
//! interpolated like any other point.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::primitives::encoding::{decimal, hex};
use crate::primitives::{PrimeField, RandomSource};
use crate::{Error, Result};

/// A single share `(x, f(x))`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Share {
    /// Evaluation point; nonzero and distinct per party.
    #[serde(with = "hex")]
    pub x: BigUint,
    /// Polynomial value at `x`.
    #[serde(with = "hex")]
    pub y: BigUint,
}

impl Share {
    pub fn new(x: impl Into<BigUint>, y: impl Into<BigUint>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Secret polynomial `a0 + a1*x + ... + a(k-1)*x^(k-1)`.
///
/// Lives only for the duration of share generation.
struct Polynomial {
    coefficients: Vec<BigUint>,
}

impl Polynomial {
    fn sample<R: RandomSource + ?Sized>(
        field: &PrimeField,
        constant: &BigUint,
        threshold: usize,
        rng: &mut R,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(threshold);
        coefficients.push(constant.clone());
        coefficients.extend((1..threshold).map(|_| field.sample_nonzero(rng)));
        Self { coefficients }
    }

    /// Horner evaluation modulo `p`.
    fn evaluate(&self, field: &PrimeField, x: &BigUint) -> BigUint {
        self.coefficients
            .iter()
            .rev()
            .fold(BigUint::zero(), |acc, a| field.add(&field.mul(&acc, x), a))
    }
}

/// Outcome of a generate-then-reconstruct round trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SharingDemo {
    pub shares: Vec<Share>,
    /// The first `k` shares, used for reconstruction.
    pub subset: Vec<Share>,
    #[serde(with = "decimal")]
    pub reconstructed: BigUint,
    pub success: bool,
}

/// Secret recovered for one party of a multi-party sum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySecret {
    /// Position of the party in the request.
    pub party: usize,
    #[serde(with = "decimal")]
    pub secret: BigUint,
}

/// Per-party secrets and their total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySum {
    pub results: Vec<PartySecret>,
    /// Parties that supplied fewer than `threshold` shares.
    pub skipped: Vec<usize>,
    /// Integer sum of the recovered secrets, not reduced modulo `p`.
    #[serde(with = "decimal")]
    pub total: BigUint,
}

/// Sharing engine bound to a prime field.
#[derive(Clone, Debug)]
pub struct SecretSharing {
    field: PrimeField,
}

impl SecretSharing {
    /// Creates an engine over the field of integers modulo the prime `prime`.
    pub fn new(prime: BigUint) -> Result<Self> {
        Ok(Self {
            field: PrimeField::new(prime)?,
        })
    }

    /// Returns the field prime.
    pub fn prime(&self) -> &BigUint {
        self.field.modulus()
    }

    /// Splits `secret` into `n` shares with threshold `k`.
    ///
    /// Shares are evaluated at `x = 1..=n`, in that order.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidThreshold`] unless `2 <= k <= n`
    /// - [`Error::OutOfRange`] if `secret >= p`
    /// - [`Error::InvalidParameter`] if `n >= p` (indices would collide)
    pub fn generate_shares<R: RandomSource + ?Sized>(
        &self,
        secret: &BigUint,
        n: usize,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<Share>> {
        if k < 2 || k > n {
            return Err(Error::InvalidThreshold { k, n });
        }
        let p = self.field.modulus();
        if secret >= p {
            return Err(Error::out_of_range(format!(
                "secret must be below the field prime {p}"
            )));
        }
        if BigUint::from(n) >= *p {
            return Err(Error::invalid(format!(
                "{n} shares need distinct nonzero indices below {p}"
            )));
        }

        let polynomial = Polynomial::sample(&self.field, secret, k, rng);
        let shares: Vec<Share> = (1..=n)
            .map(|i| {
                let x = BigUint::from(i);
                let y = polynomial.evaluate(&self.field, &x);
                Share { x, y }
            })
            .collect();

        tracing::debug!(n, k, "generated shares");
        Ok(shares)
    }

    /// Recovers `f(0)` from the supplied shares by Lagrange interpolation.
    ///
    /// Share order does not matter. Coordinates are reduced modulo `p`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidThreshold`] if fewer than two shares are supplied
    /// - [`Error::DivisionByZero`] if two shares have the same `x`
    pub fn reconstruct_secret(&self, shares: &[Share]) -> Result<BigUint> {
        if shares.len() < 2 {
            return Err(Error::InvalidThreshold {
                k: 2,
                n: shares.len(),
            });
        }
        let field = &self.field;
        let points: Vec<(BigUint, BigUint)> = shares
            .iter()
            .map(|s| (field.reduce(&s.x), field.reduce(&s.y)))
            .collect();

        let mut secret = BigUint::zero();
        for (i, (xi, yi)) in points.iter().enumerate() {
            let mut numerator = BigUint::one();
            let mut denominator = BigUint::one();
            for (j, (xj, _)) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                numerator = field.mul(&numerator, &field.neg(xj));
                denominator = field.mul(&denominator, &field.sub(xi, xj));
            }
            let inverse = field.inv(&denominator).map_err(|_| {
                Error::DivisionByZero(format!("duplicate share x-coordinate {xi}"))
            })?;
            let term = field.mul(&field.mul(yi, &numerator), &inverse);
            secret = field.add(&secret, &term);
        }

        tracing::debug!(shares = shares.len(), "reconstructed secret");
        Ok(secret)
    }

    /// Reconstructs each party's secret from its first `threshold` shares and
    /// adds them up.
    ///
    /// Parties holding fewer than `threshold` shares are skipped and listed
    /// in [`PartySum::skipped`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidThreshold`] if `threshold < 2` or no party holds
    ///   `threshold` shares
    /// - [`Error::DivisionByZero`] if a party's subset repeats an `x`
    pub fn compute_sum(&self, parties: &[Vec<Share>], threshold: usize) -> Result<PartySum> {
        let most = parties.iter().map(Vec::len).max().unwrap_or(0);
        if threshold < 2 || threshold > most {
            return Err(Error::InvalidThreshold {
                k: threshold,
                n: most,
            });
        }

        let mut results = Vec::with_capacity(parties.len());
        let mut skipped = Vec::new();
        for (party, shares) in parties.iter().enumerate() {
            if shares.len() < threshold {
                skipped.push(party);
                continue;
            }
            let secret = self.reconstruct_secret(&shares[..threshold])?;
            results.push(PartySecret { party, secret });
        }
        let total: BigUint = results.iter().map(|r| &r.secret).sum();

        tracing::debug!(
            parties = results.len(),
            skipped = skipped.len(),
            "computed multi-party sum"
        );
        Ok(PartySum {
            results,
            skipped,
            total,
        })
    }

    /// Generates `n` shares and reconstructs from the first `k`.
    pub fn demo<R: RandomSource + ?Sized>(
        &self,
        secret: &BigUint,
        n: usize,
        k: usize,
        rng: &mut R,
    ) -> Result<SharingDemo> {
        let shares = self.generate_shares(secret, n, k, rng)?;
        let subset = shares[..k].to_vec();
        let reconstructed = self.reconstruct_secret(&subset)?;
        let success = reconstructed == *secret;
        Ok(SharingDemo {
            shares,
            subset,
            reconstructed,
            success,
        })
    }
}
