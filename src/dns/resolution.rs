//! Host name resolution.
//!
//! This module resolves the host of a target URL to its IP addresses for the
//! `--resolve` display.

use log::debug;

use crate::error_handling::ProbeError;

/// Resolves a hostname to all of its IP addresses using the system resolver.
///
/// # Returns
///
/// The addresses in resolver order, comma separated and without duplicates.
/// IP literals (including bracketed IPv6) are returned as they are.
///
/// # Errors
///
/// Returns `ProbeError::ResolveFailed` if resolution fails or yields no address.
pub async fn resolve_host(host: &str) -> Result<String, ProbeError> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let failed = |source: std::io::Error| ProbeError::ResolveFailed {
        host: host.to_string(),
        source,
    };

    let mut addresses: Vec<String> = Vec::new();
    for addr in tokio::net::lookup_host((host, 0)).await.map_err(failed)? {
        let ip = addr.ip().to_string();
        if !addresses.contains(&ip) {
            addresses.push(ip);
        }
    }

    if addresses.is_empty() {
        return Err(failed(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no addresses found",
        )));
    }

    debug!("Resolved {host} to {}", addresses.join(", "));
    Ok(addresses.join(", "))
}
