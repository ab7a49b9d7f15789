#![no_main]

use field_protocols::toolkit::{Request, Toolkit, ToolkitConfig};
use field_protocols::FixedSource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(request) = serde_json::from_slice::<Request>(data) else {
        return;
    };
    let rng = Box::new(FixedSource::new([3u32, 2, 5, 7]));
    if let Ok(mut toolkit) = Toolkit::with_rng(ToolkitConfig::default(), rng) {
        let _ = toolkit.handle(request);
    }
});
