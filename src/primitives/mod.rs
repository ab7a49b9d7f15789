//! Core arithmetic primitives shared by every protocol engine.
//!
//! - **field**: modular exponentiation, inversion, primality and the prime field type
//! - **rng**: randomness providers (secure, seeded, fixed)
//! - **encoding**: radix-16 and decimal string adapters for serde

/// Numeric-string encodings.
pub mod encoding;
/// Modular arithmetic kernel.
pub mod field;
/// Randomness providers.
pub mod rng;

pub use field::{
    check_exponent, check_generator, check_group, is_probable_prime, mod_inverse,
    mod_inverse_coprime, mod_pow, mod_pow_signed, PrimeField,
};
pub use rng::{FixedSource, RandomSource, SecureRng, SeededRng};
