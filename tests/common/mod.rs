//! Common test utilities shared across integration tests.

use field_protocols::FixedSource;
use num_bigint::BigUint;

/// Initialize test tracing (call once at the beginning of tests).
///
/// Logs from the library at DEBUG level go to the test writer.
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("field_protocols=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

#[allow(dead_code)]
pub fn big(v: u64) -> BigUint {
    BigUint::from(v)
}

/// A randomness source replaying `values` in order.
#[allow(dead_code)]
pub fn fixed(values: &[u64]) -> FixedSource {
    FixedSource::new(values.iter().copied())
}
