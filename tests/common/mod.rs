//! Shared fixture helpers for integration tests.
//!
//! For artifact builders and classifier stubs, use `sympred::testing`.

#![allow(dead_code)]

use std::path::PathBuf;

/// Base directory for test cases.
pub fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases")
}

/// Directory of a checked-in artifact bundle.
pub fn bundle_dir(name: &str) -> PathBuf {
    test_cases_dir().join("bundles").join(name)
}
