//! Header view.

use std::io::{self, Write};

use colored::Colorize;
use reqwest::header::HeaderMap;

use crate::config::MAX_HEADER_VALUE_DISPLAY;
use crate::display::{Block, View, PLAIN_BLOCK};
use crate::fetch::WebRequestResult;

/// `content-type` becomes `Content-Type`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

fn joined_values(headers: &HeaderMap, name: &str) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(name)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    (!values.is_empty()).then(|| values.join(", "))
}

/// All headers, sorted by name, repeated values joined with `, `.
pub(crate) fn header_lines(headers: &HeaderMap) -> Vec<(String, String)> {
    let mut lines: Vec<(String, String)> = headers
        .keys()
        .filter_map(|name| {
            joined_values(headers, name.as_str())
                .map(|value| (canonical_header_name(name.as_str()), value))
        })
        .collect();
    lines.sort();
    lines
}

/// Only the requested headers, in the requested order; missing ones as `N/A`.
pub(crate) fn selected_header_lines(names: &[String], headers: &HeaderMap) -> Vec<(String, String)> {
    names
        .iter()
        .map(|name| {
            let value = joined_values(headers, name.trim())
                .unwrap_or_else(|| "N/A".yellow().to_string());
            (canonical_header_name(name.trim()), value)
        })
        .collect()
}

pub(crate) fn print_headers(
    w: &mut dyn Write,
    view: &View,
    block: &Block<'_>,
    title: &str,
    lines: &[(String, String)],
) -> io::Result<()> {
    block.title(w, title)?;
    for (name, value) in lines {
        block.line(
            w,
            &format!(
                "{} {name}: {}",
                view.frame.bullet,
                view.shorten(value, MAX_HEADER_VALUE_DISPLAY)
            ),
        )?;
    }
    block.end(w)
}

/// Request and response headers of every hop, or only the `selected` response
/// headers if any are named.
pub fn print_header_hops(
    w: &mut dyn Write,
    view: &View,
    hops: &[WebRequestResult],
    selected: &[String],
) -> io::Result<()> {
    writeln!(w)?;
    for (index, hop) in hops.iter().enumerate() {
        view.hop_title(w, hop, index)?;
        if selected.is_empty() {
            print_headers(w, view, &PLAIN_BLOCK, "Request Header:", &header_lines(&hop.request.headers))?;
            print_headers(w, view, &PLAIN_BLOCK, "Response Header:", &header_lines(&hop.response.headers))?;
        } else {
            print_headers(
                w,
                view,
                &PLAIN_BLOCK,
                "Selected Headers:",
                &selected_header_lines(selected, &hop.response.headers),
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}
