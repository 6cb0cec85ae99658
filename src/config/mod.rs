//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, redirect limits, certificate thresholds)
//! - CLI option types and parsing
//! - Assembly of the request template and connection setup from CLI input

pub mod cli;
mod constants;
pub mod input;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{ConnectionSetup, HttpMethod, LogFormat};
