//! Error handling.
//!
//! This module provides the typed error taxonomy of the application:
//! - `ProbeError`: per-URL and fatal probe failures, each with its own exit code
//! - `InitializationError`: logger, HTTP client and TLS setup failures
//!
//! The core never terminates the process; callers decide via
//! `ProbeError::is_per_url` whether to continue with the next target.

mod types;

// Re-export public API
pub use types::{ExitCode, InitializationError, ProbeError};
