//! Tracing initialisation for tests.
//!
//! The subscriber is installed at most once per process, so every test may
//! call [`init_test_tracing`]. Output goes to the test-harness writer and only
//! shows for failing tests (or with `--nocapture`).

use tracing_subscriber::EnvFilter;

/// Default filter: engine and loader diagnostics at `debug`, everything else
/// at `warn`.
pub const DEFAULT_TEST_FILTER: &str = "warn,errhint_core=debug,errhint_catalog=debug";

/// Install the test subscriber with [`DEFAULT_TEST_FILTER`] unless `RUST_LOG`
/// is set.
pub fn init_test_tracing() {
    init_test_tracing_with(DEFAULT_TEST_FILTER);
}

/// Install the test subscriber with a custom fallback filter.
///
/// ```ignore
/// errhint_test_utils::tracing_setup::init_test_tracing_with("errhint_core=trace");
/// ```
pub fn init_test_tracing_with(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
