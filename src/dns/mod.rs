//! DNS lookups.

mod resolution;

pub use resolution::resolve_host;
