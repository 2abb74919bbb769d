//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The platform is abstracted behind the `Platform` trait; this crate
//! provides a test-friendly implementation that:
//! - Returns deterministic resources and payloads
//! - Can be controlled programmatically (balances, injected failures)
//! - Records every call for assertions
//! - Never touches the network
//!
//! Usage: hand an `Arc<NullPlatform>` wherever an `Arc<dyn Platform>` is expected.

pub mod platform;

pub use platform::{NullPlatform, PlatformCall};
