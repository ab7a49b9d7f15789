//! Numeric-string serde adapters.
//!
//! Field elements, keys and ciphertexts travel as lowercase radix-16 strings;
//! secrets, messages and configuration values as decimal (a JSON/TOML integer
//! or a decimal string, so values beyond `u64` still fit).

use core::fmt;

use num_bigint::BigUint;
use num_traits::Num;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

use crate::{Error, Result};

/// Parses a radix-16 string, with or without a `0x` prefix.
pub fn parse_hex(s: &str) -> Result<BigUint> {
    let digits = s.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    BigUint::from_str_radix(digits, 16)
        .map_err(|_| Error::invalid(format!("malformed hex number: {s:?}")))
}

/// Parses a decimal string.
pub fn parse_decimal(s: &str) -> Result<BigUint> {
    BigUint::from_str_radix(s.trim(), 10)
        .map_err(|_| Error::invalid(format!("malformed decimal number: {s:?}")))
}

/// Formats a value as a lowercase radix-16 string.
pub fn to_hex(value: &BigUint) -> String {
    value.to_str_radix(16)
}

/// `#[serde(with = "hex")]` adapter for [`BigUint`].
pub mod hex {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &BigUint,
        serializer: S,
    ) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<BigUint, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = BigUint;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a radix-16 number string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> core::result::Result<BigUint, E> {
                parse_hex(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }

    /// `#[serde(default, with = "hex::option")]` adapter for `Option<BigUint>`.
    pub mod option {
        use num_bigint::BigUint;
        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super")] BigUint);

        pub fn serialize<S: Serializer>(
            value: &Option<BigUint>,
            serializer: S,
        ) -> core::result::Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&super::super::to_hex(v)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> core::result::Result<Option<BigUint>, D::Error> {
            Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
        }
    }
}

/// `#[serde(with = "decimal")]` adapter for [`BigUint`].
///
/// Accepts unsigned integers and decimal strings; serializes as a string.
pub mod decimal {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &BigUint,
        serializer: S,
    ) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<BigUint, D::Error> {
        struct DecimalVisitor;

        impl Visitor<'_> for DecimalVisitor {
            type Value = BigUint;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> core::result::Result<BigUint, E> {
                Ok(BigUint::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> core::result::Result<BigUint, E> {
                u64::try_from(v)
                    .map(BigUint::from)
                    .map_err(|_| E::custom(format!("expected a non-negative integer, got {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> core::result::Result<BigUint, E> {
                parse_decimal(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DecimalVisitor)
    }

    /// `#[serde(default, with = "decimal::option")]` adapter for `Option<BigUint>`.
    pub mod option {
        use num_bigint::BigUint;
        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super")] BigUint);

        pub fn serialize<S: Serializer>(
            value: &Option<BigUint>,
            serializer: S,
        ) -> core::result::Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&v.to_str_radix(10)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> core::result::Result<Option<BigUint>, D::Error> {
            Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
        }
    }
}
