//! Redirect chain view.

use std::io::{self, Write};

use colored::Colorize;

use crate::display::certificate::print_certificate_summary;
use crate::display::cookies::{print_cookies, select_cookies};
use crate::display::headers::{header_lines, print_headers, selected_header_lines};
use crate::display::{theme, Block, View};
use crate::fetch::WebRequestResult;
use crate::tls::CertificateReport;

const CHAIN_INDENT: &str = "       ";

/// Details printed beside the chain.
#[derive(Debug, Clone, Default)]
pub struct ChainOptions {
    pub request_headers: bool,
    pub request_cookies: bool,
    pub response_headers: bool,
    pub response_cookies: bool,
    pub certificates: bool,
    /// Response details for every hop instead of the last one only
    pub all_hops: bool,
    /// Show only these response headers
    pub selected_headers: Vec<String>,
    /// Show only these stored cookies
    pub selected_cookies: Vec<String>,
}

fn print_details(
    w: &mut dyn Write,
    view: &View,
    options: &ChainOptions,
    hop: &WebRequestResult,
    report: Option<&CertificateReport>,
    first: bool,
    show_response: bool,
) -> io::Result<()> {
    let block = Block {
        indent: CHAIN_INDENT,
        bar: view.frame.vbar,
    };

    // Request details are the same on every hop, so only the first shows them
    if first && options.request_headers {
        print_headers(w, view, &block, "Request Header:", &header_lines(&hop.request.headers))?;
    }
    if first && options.request_cookies {
        let sent = hop.request.cookies();
        print_cookies(w, view, &block, "Request Cookies:", &sent.iter().collect::<Vec<_>>())?;
    }

    if !show_response {
        return Ok(());
    }

    if options.certificates {
        print_certificate_summary(w, view, &block, report)?;
    }
    if options.response_headers {
        if options.selected_headers.is_empty() {
            print_headers(w, view, &block, "Response Header:", &header_lines(&hop.response.headers))?;
        } else {
            print_headers(
                w,
                view,
                &block,
                "Selected Headers:",
                &selected_header_lines(&options.selected_headers, &hop.response.headers),
            )?;
        }
    }
    if options.response_cookies {
        if options.selected_cookies.is_empty() {
            print_cookies(w, view, &block, "Stored Cookies:", &hop.cookies.iter().collect::<Vec<_>>())?;
        } else {
            print_cookies(
                w,
                view,
                &block,
                "Selected Cookies:",
                &select_cookies(&options.selected_cookies, &hop.cookies),
            )?;
        }
    }
    Ok(())
}

/// Draws the redirect chain: the start URL, one line per redirect with the
/// status that caused it, and the final status.
///
/// `reports` holds the certificate analysis per hop, in hop order.
pub fn print_chain(
    w: &mut dyn Write,
    view: &View,
    options: &ChainOptions,
    hops: &[WebRequestResult],
    reports: &[Option<CertificateReport>],
) -> io::Result<()> {
    let (Some(first), Some(last)) = (hops.first(), hops.last()) else {
        return Ok(());
    };
    let report = |i: usize| reports.get(i).and_then(Option::as_ref);
    let frame = view.frame;

    writeln!(w)?;
    writeln!(w, "{}", view.first_label(first))?;
    print_details(
        w,
        view,
        options,
        first,
        report(0),
        true,
        options.all_hops || hops.len() == 1,
    )?;

    let mut previous_status = first.response.status;
    for (index, hop) in hops.iter().enumerate().skip(1) {
        writeln!(
            w,
            "{CHAIN_INDENT}{} ({}) {}  [{}] {}",
            frame.tee,
            theme::status(previous_status),
            frame.rarrow,
            hop.request.method,
            view.target(hop)
        )?;
        print_details(
            w,
            view,
            options,
            hop,
            report(index),
            false,
            options.all_hops || index == hops.len() - 1,
        )?;
        previous_status = hop.response.status;
    }

    writeln!(
        w,
        "{CHAIN_INDENT}{} ({}) {}  {}",
        frame.corner,
        theme::status(last.response.status),
        frame.rarrow,
        last.response.status_line().as_str().bold()
    )?;
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::test_support::render;
    use crate::display::Frame;
    use crate::fetch::test_support::hop;

    fn view() -> View {
        View {
            frame: Frame::ASCII,
            full: false,
            width: 120,
            addresses: Default::default(),
        }
    }

    fn chain() -> Vec<WebRequestResult> {
        vec![
            hop("http://a.example/", 301, &[("location", "https://a.example/")]),
            hop("https://a.example/", 302, &[("location", "/home")]),
            hop("https://a.example/home", 200, &[("server", "test")]),
        ]
    }

    #[test]
    fn test_chain_lines() {
        let out = render(|w| print_chain(w, &view(), &ChainOptions::default(), &chain(), &[]));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "",
                "URL: http://a.example/  [GET]",
                "       +-- (301) ->  [GET] https://a.example/",
                "       +-- (302) ->  [GET] https://a.example/home",
                "       `-- (200) ->  200 OK",
                "",
            ]
        );
    }

    #[test]
    fn test_response_headers_only_on_last_hop_unless_all() {
        let options = ChainOptions {
            response_headers: true,
            ..Default::default()
        };
        let out = render(|w| print_chain(w, &view(), &options, &chain(), &[]));
        assert_eq!(out.matches("Response Header:").count(), 1);
        assert!(out.contains("       |   * Server: test"));

        let options = ChainOptions {
            response_headers: true,
            all_hops: true,
            ..Default::default()
        };
        let out = render(|w| print_chain(w, &view(), &options, &chain(), &[]));
        assert_eq!(out.matches("Response Header:").count(), 3);
    }

    #[test]
    fn test_redirect_limit_shows_sentinel_status() {
        let mut hops = chain();
        hops.truncate(2);
        hops[1].response.mark_redirect_limit();
        let out = render(|w| print_chain(w, &view(), &ChainOptions::default(), &hops, &[]));
        assert!(out.contains("`-- (999) ->  999 Redirect limit reached"));
    }

    #[test]
    fn test_single_hop_shows_response_details() {
        let options = ChainOptions {
            certificates: true,
            ..Default::default()
        };
        let hops = vec![hop("http://plain.example/", 200, &[])];
        let out = render(|w| print_chain(w, &view(), &options, &hops, &[None]));
        assert!(out.contains("Certificate(s):"));
        assert!(out.contains("* (None)"));
    }

    #[test]
    fn test_empty_chain_prints_nothing() {
        let out = render(|w| print_chain(w, &view(), &ChainOptions::default(), &[], &[]));
        assert!(out.is_empty());
    }
}
