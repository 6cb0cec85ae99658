//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, redirect limits and certificate thresholds.

/// Application name used in the default user agent and the `version` output.
pub const APP_NAME: &str = "HtProbe";

/// Application version (taken from the crate manifest).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Author shown by the `version` subcommand.
pub const AUTHOR: &str = "Harald Leinders <harald@leinders.de>";

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "htprobe/",
    env!("CARGO_PKG_VERSION"),
    " (HtProbe Request Analyzer)"
);

// Network operation timeouts
/// Default per-request timeout in seconds
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 3;
/// Largest accepted value for `--timeout` (0 disables the timeout)
pub const MAX_CONNECTION_TIMEOUT_SECS: u64 = 3600;

// Redirect handling
/// Maximum number of hops followed before the walker stops.
///
/// The chain returned for a capped run holds exactly this many results.
pub const MAX_REDIRECTS: usize = 25;
/// Status written to the last hop when the redirect limit is reached
pub const REDIRECT_LIMIT_STATUS: u16 = 999;
/// Lowest status treated as a redirect (300 Multiple Choices is not followed)
pub const REDIRECT_STATUS_MIN: u16 = 301;
/// Highest status treated as a redirect
pub const REDIRECT_STATUS_MAX: u16 = 399;

// Certificate classification
/// Certificates expiring within this many days are flagged as a warning
pub const CERT_EXPIRY_WARNING_DAYS: f64 = 30.0;
/// Peer chains shorter than this are reported as incomplete
pub const MIN_COMPLETE_CHAIN_LEN: usize = 2;

// Input parsing
/// Separator between name and value in `--add-header` values and header files
pub const HEADER_SEPARATOR: char = ':';
/// Separator between name and value in `--cookie` values and cookie files
pub const COOKIE_SEPARATOR: char = ':';

// Presentation
/// Terminal width used for shortening when `COLUMNS` is not set
pub const DEFAULT_SCREEN_WIDTH: usize = 120;
/// Maximum displayed header value length before shortening
pub const MAX_HEADER_VALUE_DISPLAY: usize = 90;
