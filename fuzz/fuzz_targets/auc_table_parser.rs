#![no_main]

use libfuzzer_sys::fuzz_target;
use regrank::inputs::{parse_auc_table, parse_baseline_table};

fuzz_target!(|data: &[u8]| {
    // Malformed tables must surface as errors, never panics
    let _ = parse_auc_table(data, "fuzz");
    let _ = parse_baseline_table(data, "fuzz");
});
