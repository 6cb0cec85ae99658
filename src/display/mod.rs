//! Presentation layer.
//!
//! Every view writes to an injected `std::io::Write`, so the same code renders
//! to stdout, stderr, an output file or a test buffer. Colors come from
//! `colored` and follow its global override (`--no-color`).

mod certificate;
mod chain;
mod content;
mod cookies;
mod headers;
mod theme;

use std::collections::HashMap;
use std::io::{self, Write};

use colored::Colorize;

use crate::config::DEFAULT_SCREEN_WIDTH;
use crate::fetch::WebRequestResult;
use crate::utils::{shorten, visible_width};

pub use certificate::{
    print_certificate_block, print_certificate_hops, print_certificate_summary, CertificateOptions,
};
pub use chain::{print_chain, ChainOptions};
pub use content::{print_content, print_last_content};
pub use cookies::{print_cookie_hops, write_cookie_file};
pub use headers::{canonical_header_name, print_header_hops};
pub use theme::Frame;

/// Rendering settings shared by all views of a run.
#[derive(Debug, Clone)]
pub struct View {
    pub frame: Frame,
    /// Never shorten long values
    pub full: bool,
    pub width: usize,
    /// Resolved addresses per host, shown next to the URL (`--resolve`)
    pub addresses: HashMap<String, String>,
}

impl View {
    /// Creates a view, taking the screen width from `COLUMNS` if set.
    pub fn new(ascii: bool, full: bool) -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.trim().parse::<usize>().ok())
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_SCREEN_WIDTH);
        Self {
            frame: Frame::new(ascii),
            full,
            width,
            addresses: HashMap::new(),
        }
    }

    /// Room left for a value after the label column.
    pub(crate) fn value_width(&self) -> usize {
        self.width.saturating_sub(25).max(20)
    }

    pub(crate) fn shorten(&self, text: &str, max: usize) -> String {
        shorten(text, max, self.full)
    }

    /// Hop URL, followed by its resolved addresses when known.
    pub(crate) fn target(&self, hop: &WebRequestResult) -> String {
        match self.addresses.get(hop.host()) {
            Some(addresses) => format!("{} ({addresses})", hop.request.url),
            None => hop.request.url.to_string(),
        }
    }

    /// `URL: <target>  [METHOD]` in bold.
    pub(crate) fn first_label(&self, hop: &WebRequestResult) -> String {
        let label = format!("URL: {}  [{}]", self.target(hop), hop.request.method);
        label.as_str().bold().to_string()
    }

    /// Label of hop `index`: the first hop as URL, later ones as redirect target.
    pub(crate) fn redirect_label(&self, hop: &WebRequestResult, index: usize) -> String {
        if index == 0 {
            return self.first_label(hop);
        }
        let label = format!("{}  [{}]", self.target(hop), hop.request.method);
        format!("{}{}", "Redirect to: ".yellow(), label.as_str().bold())
    }

    /// Numbered, underlined hop title used by the per-hop views.
    pub(crate) fn hop_title(
        &self,
        w: &mut dyn Write,
        hop: &WebRequestResult,
        index: usize,
    ) -> io::Result<()> {
        let title = format!(
            "{}:  {} ({})",
            index + 1,
            self.redirect_label(hop, index),
            theme::status(hop.response.status)
        );
        self.underlined(w, &title)
    }

    pub(crate) fn underlined(&self, w: &mut dyn Write, title: &str) -> io::Result<()> {
        writeln!(w, "{title}")?;
        writeln!(w, "{}", self.frame.hline.repeat(visible_width(title)))?;
        writeln!(w)
    }
}

/// A titled list of lines, optionally hanging off a chain frame.
pub(crate) struct Block<'a> {
    pub indent: &'a str,
    pub bar: &'a str,
}

impl Block<'_> {
    pub fn title(&self, w: &mut dyn Write, title: &str) -> io::Result<()> {
        writeln!(w, "{}{}   {}", self.indent, self.bar, title.bold())
    }

    pub fn line(&self, w: &mut dyn Write, text: &str) -> io::Result<()> {
        writeln!(w, "{}{}   {}", self.indent, self.bar, text)
    }

    pub fn end(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}{}", self.indent, self.bar)
    }
}

/// Block layout of the stand-alone views (one space, no frame).
pub(crate) const PLAIN_BLOCK: Block<'static> = Block {
    indent: " ",
    bar: "",
};


#[cfg(test)]
mod tests {
    use super::test_support::render;
    use super::*;
    use crate::fetch::test_support::hop;

    fn view() -> View {
        View {
            frame: Frame::ASCII,
            full: false,
            width: 120,
            addresses: HashMap::new(),
        }
    }

    #[test]
    fn test_hop_title_is_underlined_to_visible_width() {
        let h = hop("http://example.com/", 200, &[]);
        let out = render(|w| view().hop_title(w, &h, 0));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "1:  URL: http://example.com/  [GET] (200)");
        assert_eq!(lines[1], "-".repeat(lines[0].chars().count()));
    }

    #[test]
    fn test_redirect_label_and_resolved_addresses() {
        let h = hop("http://example.com/next", 301, &[]);
        let mut v = view();
        v.addresses.insert("example.com".into(), "93.184.216.34".into());
        let out = render(|w| writeln!(w, "{}", v.redirect_label(&h, 2)));
        assert_eq!(
            out.trim_end(),
            "Redirect to: http://example.com/next (93.184.216.34)  [GET]"
        );
    }
}
