//! Modular arithmetic over arbitrary-precision integers.
//!
//! Every protocol in the crate sits on these helpers: exponentiation,
//! inversion (Fermat for prime moduli, extended Euclid otherwise), primality
//! and generator checks, and field-element sampling.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use super::rng::RandomSource;
use crate::{Error, Result};

/// Miller-Rabin witnesses; deterministic for every `n < 3.3 * 10^24`.
const MILLER_RABIN_BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Upper bound for trial division when factoring the group order.
const TRIAL_DIVISION_LIMIT: u64 = 1 << 20;

/// Reduces a signed integer into `[0, modulus)`.
pub fn normalize(value: &BigInt, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::invalid("modulus cannot be zero"));
    }
    let m = BigInt::from_biguint(Sign::Plus, modulus.clone());
    let reduced = value.mod_floor(&m);
    // mod_floor with a positive modulus is never negative
    Ok(reduced.to_biguint().unwrap_or_default())
}

/// Computes `base^exponent mod modulus`.
///
/// An exponent of zero yields `1 mod modulus`.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::invalid("modulus cannot be zero"));
    }
    Ok(base.modpow(exponent, modulus))
}

/// Computes `base^exponent mod modulus` for a possibly negative base.
///
/// The base is normalized into `[0, modulus)` first.
pub fn mod_pow_signed(base: &BigInt, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    let base = normalize(base, modulus)?;
    mod_pow(&base, exponent, modulus)
}

/// Computes `a^-1 mod p` for a prime `p` via Fermat's little theorem.
///
/// # Errors
///
/// Returns [`Error::DivisionByZero`] when `a ≡ 0 (mod p)`.
pub fn mod_inverse(a: &BigUint, p: &BigUint) -> Result<BigUint> {
    if *p < BigUint::from(2u8) {
        return Err(Error::invalid("inverse modulus must be at least 2"));
    }
    if (a % p).is_zero() {
        return Err(Error::DivisionByZero(format!(
            "{a} has no inverse modulo {p}"
        )));
    }
    let exponent = p - 2u8;
    mod_pow(a, &exponent, p)
}

/// Computes `a^-1 mod m` for an arbitrary modulus with the extended Euclidean
/// algorithm.
///
/// # Errors
///
/// Returns [`Error::DivisionByZero`] when `gcd(a, m) != 1`.
pub fn mod_inverse_coprime(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if *m < BigUint::from(2u8) {
        return Err(Error::invalid("inverse modulus must be at least 2"));
    }
    let a = BigInt::from_biguint(Sign::Plus, a % m);
    let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
    let egcd = a.extended_gcd(&modulus);
    if !egcd.gcd.is_one() {
        return Err(Error::DivisionByZero(format!(
            "{a} is not invertible modulo {m}"
        )));
    }
    normalize(&egcd.x, m)
}

/// Greatest common divisor.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Least common multiple.
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    a.lcm(b)
}

/// Miller-Rabin primality test over fixed bases.
pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u8);
    if *n < two {
        return false;
    }
    for base in MILLER_RABIN_BASES {
        let b = BigUint::from(base);
        if *n == b {
            return true;
        }
        if (n % &b).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for base in MILLER_RABIN_BASES {
        let mut x = BigUint::from(base).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Distinct prime factors of `n`, or `None` when trial division up to
/// 2^20 leaves a composite cofactor.
pub fn prime_factors(n: &BigUint) -> Option<Vec<BigUint>> {
    let mut factors = Vec::new();
    let mut rest = n.clone();
    let mut d: u64 = 2;

    while d <= TRIAL_DIVISION_LIMIT {
        let divisor = BigUint::from(d);
        if &divisor * &divisor > rest {
            break;
        }
        if (&rest % &divisor).is_zero() {
            factors.push(divisor.clone());
            while (&rest % &divisor).is_zero() {
                rest /= &divisor;
            }
        }
        d += if d == 2 { 1 } else { 2 };
    }

    if rest > BigUint::one() {
        if !is_probable_prime(&rest) {
            return None;
        }
        factors.push(rest);
    }
    Some(factors)
}

/// Checks that `g` generates the multiplicative group modulo the prime `p`.
///
/// When `p - 1` cannot be fully factored the order test is skipped and the
/// generator is accepted as an assumption of the caller.
pub fn check_generator(g: &BigUint, p: &BigUint) -> Result<()> {
    if *g <= BigUint::one() || g >= p {
        return Err(Error::invalid(format!("generator {g} must lie in (1, {p})")));
    }
    let order = p - 1u8;
    let Some(factors) = prime_factors(&order) else {
        tracing::warn!(bits = p.bits(), "cannot factor p - 1; generator order unchecked");
        return Ok(());
    };
    for q in factors {
        if g.modpow(&(&order / &q), p).is_one() {
            return Err(Error::invalid(format!(
                "{g} does not generate the multiplicative group mod {p}"
            )));
        }
    }
    Ok(())
}

/// Checks that `p` is a prime `>= 5` and `g` generates `Z*_p`.
pub fn check_group(p: &BigUint, g: &BigUint) -> Result<()> {
    if *p < BigUint::from(5u8) || !is_probable_prime(p) {
        return Err(Error::invalid(format!("modulus {p} must be a prime >= 5")));
    }
    check_generator(g, p)
}

/// Checks that the exponent `e` lies in `[1, p - 2]`.
pub fn check_exponent(e: &BigUint, p: &BigUint, what: &str) -> Result<()> {
    if e.is_zero() || e + 2u8 > *p {
        return Err(Error::out_of_range(format!("{what} must lie in [1, p-2]")));
    }
    Ok(())
}

/// Prime field `Z_p`.
///
/// Immutable once constructed; all operations reduce modulo `p`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    /// Creates the field of integers modulo the prime `p`.
    pub fn new(p: BigUint) -> Result<Self> {
        if !is_probable_prime(&p) {
            return Err(Error::invalid(format!("field modulus {p} is not prime")));
        }
        Ok(Self { modulus: p })
    }

    /// Returns the prime modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn reduce(&self, a: &BigUint) -> BigUint {
        a % &self.modulus
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.modulus
    }

    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let a = self.reduce(a);
        let b = self.reduce(b);
        if a >= b {
            a - b
        } else {
            &self.modulus - (b - a)
        }
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    pub fn neg(&self, a: &BigUint) -> BigUint {
        self.sub(&BigUint::zero(), a)
    }

    /// Multiplicative inverse; fails with [`Error::DivisionByZero`] on zero.
    pub fn inv(&self, a: &BigUint) -> Result<BigUint> {
        mod_inverse(a, &self.modulus)
    }

    pub fn pow(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.modulus)
    }

    /// Uniform element of `[0, p)`.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> BigUint {
        rng.sample_below(&self.modulus)
    }

    /// Uniform element of `[1, p - 1]`.
    pub fn sample_nonzero<R: RandomSource + ?Sized>(&self, rng: &mut R) -> BigUint {
        rng.sample_range(&BigUint::one(), &self.modulus)
    }
}
