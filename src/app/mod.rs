//! Application helpers used by the command drivers.

pub mod url;

pub use url::check_url;
