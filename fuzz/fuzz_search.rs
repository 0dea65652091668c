//! Fuzz target for hint search.
//!
//! Run with: cargo +nightly fuzz run fuzz_search
//!
//! Searches a fixed catalog with arbitrary queries and checks the result set
//! against a direct filter over the records.

#![no_main]

use errhint_catalog::{Catalog, HintRecord};
use errhint_core::HintSearchEngine;
use libfuzzer_sys::fuzz_target;

fn catalog() -> Catalog {
    Catalog::new(vec![
        HintRecord::new("NullPointerException", "Check for null references"),
        HintRecord::new("IndexOutOfBoundsException", "Check array bounds"),
        HintRecord::new("TypeError", "Check operand types"),
        HintRecord::new("ÜnicodeError", "Check the encoding"),
        HintRecord::new("", "Matches only the empty query"),
    ])
}

fuzz_target!(|data: &[u8]| {
    let query = String::from_utf8_lossy(data);
    let catalog = catalog();
    let expected: Vec<String> = catalog
        .records()
        .iter()
        .filter(|r| r.error_type.contains(query.as_ref()))
        .map(|r| r.to_string())
        .collect();

    let mut engine = HintSearchEngine::with_catalog(catalog);
    let Ok(results) = engine.search(&query) else {
        panic!("search over an in-memory catalog failed");
    };
    let labels: Vec<String> = results.iter().map(|r| r.label().to_string()).collect();
    assert_eq!(labels, expected);
});
