//! Shared utilities for Tally.

pub mod logging;
pub mod redact;

pub use logging::{init_logging, LogFormat};
pub use redact::redact;
