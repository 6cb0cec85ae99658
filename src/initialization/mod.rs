//! Application initialization.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - Logger (plain or JSON, on stderr)
//! - Crypto provider for rustls
//! - HTTP client with the certificate recording TLS configuration

mod client;
mod logger;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes the crypto provider for TLS operations.
///
/// Installs the `ring` provider as the process default for `rustls`. Must be
/// called before any TLS connection is established.
pub fn init_crypto_provider() {
    // Already installed is fine
    let _ = CryptoProvider::install_default(default_provider());
}
