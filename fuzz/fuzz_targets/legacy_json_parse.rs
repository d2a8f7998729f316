//! Fuzz target for legacy per-image JSON parsing.

#![no_main]

use leafcoco::ir::io_legacy_json::fuzz_parse_legacy_json;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_legacy_json(data);
});
