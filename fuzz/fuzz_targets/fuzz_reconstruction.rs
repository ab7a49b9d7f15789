#![no_main]

use field_protocols::sharing::{SecretSharing, Share};
use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

fuzz_target!(|data: &[u8]| {
    let Ok(scheme) = SecretSharing::new(BigUint::from(97u32)) else {
        return;
    };
    let shares: Vec<Share> = data
        .chunks_exact(2)
        .map(|pair| Share::new(pair[0], pair[1]))
        .collect();
    let _ = scheme.reconstruct_secret(&shares);
});
