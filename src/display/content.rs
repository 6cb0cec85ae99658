//! Content view.

use std::io::{self, Write};

use colored::Colorize;

use crate::display::View;
use crate::fetch::WebRequestResult;

fn print_body(w: &mut dyn Write, view: &View, hop: &WebRequestResult) -> io::Result<()> {
    writeln!(w, "{}", "Content:".bold())?;
    writeln!(w, "{}", view.frame.hline.repeat(8).as_str().bold())?;
    writeln!(w)?;
    writeln!(w, "{}", hop.response.text())
}

/// Body of every hop, each under its hop title.
pub fn print_content(w: &mut dyn Write, view: &View, hops: &[WebRequestResult]) -> io::Result<()> {
    for (index, hop) in hops.iter().enumerate() {
        view.hop_title(w, hop, index)?;
        print_body(w, view, hop)?;
        writeln!(w)?;
    }
    w.flush()
}

/// Body of a single hop without title (`redirects --show-content`).
pub fn print_last_content(w: &mut dyn Write, view: &View, hop: &WebRequestResult) -> io::Result<()> {
    writeln!(w)?;
    print_body(w, view, hop)
}
