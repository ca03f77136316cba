#![no_main]

use covenant_utils::{format_duration, parse_duration};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(units) = parse_duration(text) {
        // Formatting truncates to two components, never rounds up.
        let shown = parse_duration(&format_duration(units)).expect("formatted duration parses");
        assert!(shown <= units);
    }
});
