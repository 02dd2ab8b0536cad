//! Shared utilities for accord.

pub mod logging;
pub mod time;

pub use logging::{init_test_tracing, init_tracing};
pub use time::format_duration;
