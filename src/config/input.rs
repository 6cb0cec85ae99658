//! Request input assembly.
//!
//! Turns the global CLI flags and the optional cookie/header/body files into
//! a `RequestTemplate` and a `ConnectionSetup`. All validation happens here,
//! before any network activity.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use log::{debug, warn};

use crate::config::cli::GlobalArgs;
use crate::config::constants::COOKIE_SEPARATOR;
use crate::config::types::{ConnectionSetup, HttpMethod};
use crate::error_handling::ProbeError;
use crate::fetch::{split_first, BasicAuth, Cookie, RequestTemplate};

/// Reads a file line by line.
///
/// # Errors
///
/// Returns `ProbeError::NoFile` if the file cannot be opened and
/// `ProbeError::FileIo` if reading fails part way.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ProbeError> {
    let file = File::open(path).map_err(|source| ProbeError::NoFile {
        path: path.to_path_buf(),
        source,
    })?;

    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ProbeError::FileIo {
            path: path.to_path_buf(),
            source,
        })
}

/// Parses a `name:value` string into a cookie.
///
/// Returns `None` if there is no separator or the name is empty.
pub fn parse_cookie(raw: &str) -> Option<Cookie> {
    let (name, value) = split_first(raw, COOKIE_SEPARATOR)?;
    if name.is_empty() {
        return None;
    }
    Some(Cookie::new(name, value))
}

/// Collects flag values followed by the lines of an optional file.
fn collect_with_file(values: &[String], file: Option<&Path>) -> Result<Vec<String>, ProbeError> {
    let mut collected = values.to_vec();
    if let Some(path) = file {
        collected.extend(read_lines(path)?);
    }
    Ok(collected)
}

/// Builds the request template shared by all target URLs.
///
/// # Errors
///
/// - `ProbeError::UnknownMethod` if `--method` is not in the allow-list
/// - `ProbeError::NoFile` / `ProbeError::FileIo` for unreadable input files
pub fn build_request_template(args: &GlobalArgs) -> Result<RequestTemplate, ProbeError> {
    let method: HttpMethod = args.method.parse()?;

    let mut cookies = Vec::new();
    for raw in collect_with_file(&args.cookie, args.cookie_file.as_deref())? {
        match parse_cookie(&raw) {
            Some(cookie) => cookies.push(cookie),
            None => warn!("Skipping malformed cookie (expected name:value): {raw}"),
        }
    }
    debug!("Request cookies: {cookies:?}");

    let extra_headers = collect_with_file(&args.add_header, args.header_file.as_deref())?
        .into_iter()
        .filter(|h| !h.trim().is_empty())
        .collect();

    let body = collect_with_file(&args.body, args.body_file.as_deref())?.join("\n");
    debug!("Request body: {body:?}");

    let auth = match (&args.user, &args.pass) {
        (Some(user), Some(pass)) => Some(BasicAuth {
            user: user.clone(),
            pass: pass.clone(),
        }),
        _ => None,
    };

    Ok(RequestTemplate {
        method,
        agent: args.agent.clone(),
        lang: args.lang.clone(),
        auth,
        body,
        extra_headers,
        cookies,
    })
}

/// Builds the connection policy for one run.
pub fn build_connection_setup(args: &GlobalArgs, follow_redirects: bool) -> ConnectionSetup {
    ConnectionSetup::new(
        Duration::from_secs(args.timeout),
        args.proxy.clone(),
        args.trust,
        follow_redirects,
        args.accept_cookies,
    )
}
