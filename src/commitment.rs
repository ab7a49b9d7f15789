//! Pedersen-style commitments `c = g^m * h^r mod p`.
//!
//! Hiding is perfect when `r` is uniform; binding holds only while nobody
//! knows `log_g(h)`. That independence is a precondition on whoever picks
//! `(p, g, h)` and cannot be checked here.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::primitives::encoding::{decimal, hex};
use crate::primitives::field::{check_generator, check_group};
use crate::primitives::RandomSource;
use crate::{Error, Result};

/// Public parameters `(p, g, h)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedersenParams {
    #[serde(with = "hex")]
    p: BigUint,
    #[serde(with = "hex")]
    g: BigUint,
    #[serde(with = "hex")]
    h: BigUint,
}

/// A commitment together with the randomness needed to open it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedersenCommitment {
    #[serde(with = "hex")]
    pub commitment: BigUint,
    #[serde(with = "decimal")]
    pub randomness: BigUint,
}

/// Result of a commit-then-open round trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentDemo {
    pub parameters: PedersenParams,
    #[serde(with = "decimal")]
    pub message: BigUint,
    #[serde(flatten)]
    pub opening: PedersenCommitment,
    pub is_valid: bool,
}

impl PedersenParams {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `p` is not a prime `>= 5`,
    /// either generator fails [`check_generator`], or `g == h`.
    pub fn new(p: BigUint, g: BigUint, h: BigUint) -> Result<Self> {
        let params = Self { p, g, h };
        params.validate()?;
        Ok(params)
    }

    /// Checks the invariants of [`PedersenParams::new`].
    pub fn validate(&self) -> Result<()> {
        check_group(&self.p, &self.g)?;
        check_generator(&self.h, &self.p)?;
        if self.g == self.h {
            return Err(Error::invalid("generators g and h must be different"));
        }
        Ok(())
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    pub fn h(&self) -> &BigUint {
        &self.h
    }

    fn evaluate(&self, m: &BigUint, r: &BigUint) -> BigUint {
        (self.g.modpow(m, &self.p) * self.h.modpow(r, &self.p)) % &self.p
    }

    /// Commits to `m` under the given randomness `r`.
    pub fn commit_with(&self, m: &BigUint, r: &BigUint) -> PedersenCommitment {
        PedersenCommitment {
            commitment: self.evaluate(m, r),
            randomness: r.clone(),
        }
    }

    /// Commits to `m` with `r` drawn uniformly from `[0, p-1)`.
    pub fn commit<R: RandomSource + ?Sized>(&self, m: &BigUint, rng: &mut R) -> PedersenCommitment {
        let r = rng.sample_below(&(&self.p - 1u8));
        self.commit_with(m, &r)
    }

    /// Returns `true` iff `c == g^m * h^r mod p`.
    pub fn open(&self, c: &BigUint, m: &BigUint, r: &BigUint) -> bool {
        self.evaluate(m, r) == *c
    }

    /// Commits to `m` with fresh randomness and immediately opens.
    pub fn demo<R: RandomSource + ?Sized>(&self, m: &BigUint, rng: &mut R) -> CommitmentDemo {
        let opening = self.commit(m, rng);
        let is_valid = self.open(&opening.commitment, m, &opening.randomness);
        CommitmentDemo {
            parameters: self.clone(),
            message: m.clone(),
            opening,
            is_valid,
        }
    }
}
