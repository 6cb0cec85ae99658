//! HTTP redirect chain resolution.
//!
//! This module follows redirect chains manually so every intermediate hop is
//! captured with its own request, response, certificates and cookies.

use log::{info, warn};

use crate::config::MAX_REDIRECTS;
use crate::error_handling::ProbeError;
use crate::fetch::executor::RequestExecutor;
use crate::fetch::hop::WebRequestResult;
use crate::fetch::request::WebRequest;

/// Executes `request` and, if `follow` is set, every redirect after it.
///
/// A response with a status in 301..=399 is followed to its `Location`
/// (resolved against the hop URL) with the same method, headers and body.
/// After `MAX_REDIRECTS` hops the last hop is marked with the redirect limit
/// status and walking stops, so a capped chain holds exactly that many hops.
///
/// # Returns
///
/// All hops in request order. Without `follow` this is a single hop.
///
/// # Errors
///
/// Returns the error of the first failing hop, or `ProbeError::ResponseInvalid`
/// for a redirect without a usable `Location` header.
pub async fn walk(
    executor: &RequestExecutor,
    mut request: WebRequest,
    follow: bool,
) -> Result<Vec<WebRequestResult>, ProbeError> {
    let first = executor.execute(&mut request).await?;
    let mut chain = vec![first];
    if !follow {
        return Ok(chain);
    }

    let mut redirects = 0usize;
    while let Some(last) = chain.last_mut() {
        if !last.response.is_redirect() {
            break;
        }

        let next = last.location()?;
        redirects += 1;
        if redirects >= MAX_REDIRECTS {
            warn!("Redirect limit of {MAX_REDIRECTS} reached at {}", last.request.url);
            last.response.mark_redirect_limit();
            break;
        }

        info!(
            "Redirect {redirects}: {} ({}) -> {next}",
            last.request.url, last.response.status
        );
        request.url = next;
        let hop = executor.execute(&mut request).await?;
        chain.push(hop);
    }

    Ok(chain)
}
