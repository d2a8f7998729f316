//! Fuzz target for box CSV parsing.
//!
//! Feeds arbitrary bytes to the alias-resolving CSV reader. Every box it
//! returns must have strictly positive extents.

#![no_main]

use leafcoco::ir::io_box_csv::fuzz_parse_box_csv;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(parsed) = fuzz_parse_box_csv(data) {
        assert!(parsed.boxes.iter().all(|b| b.bbox.is_valid()));
    }
});
