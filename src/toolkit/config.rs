use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::commitment::PedersenParams;
use crate::homomorphic::PaillierKeyPair;
use crate::primitives::encoding::decimal;
use crate::primitives::field::check_group;
use crate::primitives::{FixedSource, RandomSource, SecureRng, SeededRng};
use crate::sharing::SecretSharing;
use crate::{Error, Result};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/toolkit.toml";

/// Prefix of environment variable overrides, e.g. `TOOLKIT_SHARING__PRIME=101`.
pub const ENV_PREFIX: &str = "TOOLKIT_";

/// Toolkit configuration.
///
/// Every section has demonstration defaults; requests may override the
/// parameters of a single call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Secret sharing field.
    pub sharing: SharingSettings,
    /// Paillier primes.
    pub paillier: PaillierSettings,
    /// ElGamal group.
    pub elgamal: GroupSettings,
    /// Schnorr group.
    pub schnorr: GroupSettings,
    /// Pedersen parameters.
    pub commitment: CommitmentSettings,
    /// Randomness provider.
    pub randomness: RandomnessSettings,
}

/// Secret sharing settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingSettings {
    /// Field prime.
    #[serde(with = "decimal")]
    pub prime: BigUint,
}

/// Paillier key generation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaillierSettings {
    #[serde(with = "decimal")]
    pub p: BigUint,
    #[serde(with = "decimal")]
    pub q: BigUint,
}

/// A prime modulus and a generator of its multiplicative group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettings {
    #[serde(with = "decimal")]
    pub p: BigUint,
    #[serde(with = "decimal")]
    pub g: BigUint,
}

/// Pedersen commitment settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentSettings {
    #[serde(with = "decimal")]
    pub p: BigUint,
    #[serde(with = "decimal")]
    pub g: BigUint,
    #[serde(with = "decimal")]
    pub h: BigUint,
}

impl CommitmentSettings {
    /// Validated Pedersen parameters.
    pub fn params(&self) -> Result<PedersenParams> {
        PedersenParams::new(self.p.clone(), self.g.clone(), self.h.clone())
    }
}

/// Where randomness comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomnessMode {
    /// Operating system CSPRNG.
    #[default]
    Secure,
    /// Deterministic PRNG from `seed`.
    Seeded,
    /// Replays `values` in order. Tests only.
    Fixed,
}

/// Randomness provider settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomnessSettings {
    pub mode: RandomnessMode,
    /// Seed for [`RandomnessMode::Seeded`].
    pub seed: Option<u64>,
    /// Values for [`RandomnessMode::Fixed`].
    pub values: Vec<u64>,
}

impl RandomnessSettings {
    /// Deterministic randomness from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            mode: RandomnessMode::Seeded,
            seed: Some(seed),
            values: Vec::new(),
        }
    }

    /// Builds the configured provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for seeded mode without a seed or
    /// fixed mode without values.
    pub fn build(&self) -> Result<Box<dyn RandomSource>> {
        match self.mode {
            RandomnessMode::Secure => Ok(Box::new(SecureRng::new())),
            RandomnessMode::Seeded => {
                let seed = self
                    .seed
                    .ok_or_else(|| Error::invalid("seeded randomness requires a seed"))?;
                Ok(Box::new(SeededRng::from_seed(seed)))
            }
            RandomnessMode::Fixed => {
                if self.values.is_empty() {
                    return Err(Error::invalid("fixed randomness requires values"));
                }
                Ok(Box::new(FixedSource::new(self.values.iter().copied())))
            }
        }
    }
}

impl Default for SharingSettings {
    fn default() -> Self {
        Self {
            prime: BigUint::from(97u32),
        }
    }
}

impl Default for PaillierSettings {
    fn default() -> Self {
        Self {
            p: BigUint::from(61u32),
            q: BigUint::from(53u32),
        }
    }
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            p: BigUint::from(23u32),
            g: BigUint::from(5u32),
        }
    }
}

impl Default for CommitmentSettings {
    fn default() -> Self {
        Self {
            p: BigUint::from(23u32),
            g: BigUint::from(5u32),
            h: BigUint::from(7u32),
        }
    }
}

impl ToolkitConfig {
    /// Loads configuration from [`DEFAULT_CONFIG_PATH`] and the environment.
    ///
    /// Configuration priority: environment variables > TOML file > defaults.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> figment::error::Result<Self> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration from `path` and the environment.
    ///
    /// A missing file is not an error; its layer is simply empty.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: impl AsRef<Path>) -> figment::error::Result<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Checks every section by constructing its engine once.
    pub fn validate(&self) -> Result<()> {
        SecretSharing::new(self.sharing.prime.clone())?;
        PaillierKeyPair::generate(&self.paillier.p, &self.paillier.q)?;
        check_group(&self.elgamal.p, &self.elgamal.g)?;
        check_group(&self.schnorr.p, &self.schnorr.g)?;
        self.commitment.params()?;
        self.randomness.build()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = ToolkitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sharing.prime, BigUint::from(97u32));
        assert_eq!(config.randomness.mode, RandomnessMode::Secure);
    }

    #[test]
    fn rejects_composite_sharing_prime() {
        let mut config = ToolkitConfig::default();
        config.sharing.prime = BigUint::from(91u32);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_equal_paillier_primes() {
        let mut config = ToolkitConfig::default();
        config.paillier.q = config.paillier.p.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn seeded_mode_needs_seed() {
        let settings = RandomnessSettings {
            mode: RandomnessMode::Seeded,
            ..Default::default()
        };
        assert!(matches!(settings.build(), Err(Error::InvalidParameter(_))));
        assert!(RandomnessSettings::seeded(7).build().is_ok());
    }

    #[test]
    fn fixed_mode_replays_values() {
        let settings = RandomnessSettings {
            mode: RandomnessMode::Fixed,
            seed: None,
            values: vec![4, 9],
        };
        let mut rng = settings.build().unwrap();
        let ten = BigUint::from(10u32);
        assert_eq!(rng.sample_below(&ten), BigUint::from(4u32));
        assert_eq!(rng.sample_below(&ten), BigUint::from(9u32));
    }

    #[test]
    fn parses_partial_toml() {
        use figment::providers::{Format, Serialized, Toml};
        use figment::Figment;

        let config: ToolkitConfig = Figment::from(Serialized::defaults(ToolkitConfig::default()))
            .merge(Toml::string(
                r#"
                [sharing]
                prime = 101

                [randomness]
                mode = "seeded"
                seed = 42
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.sharing.prime, BigUint::from(101u32));
        assert_eq!(config.paillier, PaillierSettings::default());
        assert_eq!(config.randomness, RandomnessSettings::seeded(42));
    }
}
