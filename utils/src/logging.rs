//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for a binary or service embedding the
/// governance pipeline.
///
/// Respects the `RUST_LOG` environment variable for filtering; defaults to
/// `info` when unset. Pass `json = true` for line-delimited JSON output.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Initialize tracing for tests.
///
/// Safe to call from every test; only the first call in a process installs
/// the subscriber. Output goes through the test writer so it is captured
/// per test.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
