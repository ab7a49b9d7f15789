//! Finite-field cryptographic protocols over `num-bigint` integers.
//!
//! - [`sharing`]: Shamir `(k, n)` threshold secret sharing
//! - [`homomorphic`]: Paillier (additive) and ElGamal (multiplicative) encryption
//! - [`protocol`]: Schnorr identification (commit, challenge, respond, verify)
//! - [`commitment`]: Pedersen commitments
//! - [`toolkit`]: configuration, JSON request/response messages and a dispatcher
//!
//! Every randomized operation takes a [`RandomSource`], so runs can be made
//! reproducible with [`SeededRng`] or [`FixedSource`].
//!
//! # Example
//!
//! ```
//! use field_protocols::sharing::SecretSharing;
//! use field_protocols::SecureRng;
//! use num_bigint::BigUint;
//!
//! let scheme = SecretSharing::new(BigUint::from(97u32)).unwrap();
//! let shares = scheme
//!     .generate_shares(&BigUint::from(42u32), 5, 3, &mut SecureRng::new())
//!     .unwrap();
//! let secret = scheme.reconstruct_secret(&shares[1..4]).unwrap();
//! assert_eq!(secret, BigUint::from(42u32));
//! ```
//!
//! # Security
//!
//! The default parameters are tiny demonstration primes. Nothing here is
//! constant-time and none of it should protect real data.

/// Pedersen commitments.
pub mod commitment;
/// Error types.
pub mod error;
/// Additively and multiplicatively homomorphic encryption.
pub mod homomorphic;
/// Modular arithmetic, randomness and encodings.
pub mod primitives;
/// Schnorr identification protocol.
pub mod protocol;
/// Shamir secret sharing.
pub mod sharing;
/// Request dispatching and configuration.
pub mod toolkit;

pub use error::Error;
pub use primitives::{FixedSource, PrimeField, RandomSource, SecureRng, SeededRng};

/// Result type alias for toolkit operations.
pub type Result<T> = core::result::Result<T, Error>;
