//! Request engine.
//!
//! This module sends the decorated requests and walks redirect chains:
//! - `request`: request template, per-URL request and header decoration
//! - `executor`: one HTTP exchange, cookie jar handling, TLS capture
//! - `hop`: the captured request/response pair of one exchange
//! - `redirects`: hop-by-hop redirect following with a fixed ceiling

mod executor;
mod hop;
mod redirects;
mod request;

pub use executor::RequestExecutor;
pub use hop::{RequestRecord, ResponseRecord, WebRequestResult};
pub use redirects::walk;
pub use request::{
    parse_cookie_header, parse_set_cookie, reconcile_cookies, split_first, BasicAuth, Cookie,
    RequestTemplate, WebRequest,
};

#[cfg(test)]
pub(crate) use hop::test_support;
