//! Fuzz target for the YAML hint catalog parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_catalog_parser
//!
//! Feeds arbitrary text to `Catalog::parse()`. Any input must either produce
//! a catalog or a `Parse` error; a `NotFound` error or a panic is a bug.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Err(e) = errhint_catalog::Catalog::parse(s) {
            assert!(e.is_parse(), "in-memory parse reported {e}");
        }
    }
});
