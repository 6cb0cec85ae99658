//! Frame characters and color rules.

use colored::{ColoredString, Colorize};

use crate::tls::{ChainStatus, Validity};

/// Characters used to draw chains and underlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub tee: &'static str,
    pub corner: &'static str,
    pub vbar: &'static str,
    pub hline: &'static str,
    pub rarrow: &'static str,
    pub larrow: &'static str,
    pub bullet: &'static str,
}

impl Frame {
    pub const UNICODE: Frame = Frame {
        tee: "├──",
        corner: "└──",
        vbar: "│",
        hline: "─",
        rarrow: "→",
        larrow: "←",
        bullet: "•",
    };

    pub const ASCII: Frame = Frame {
        tee: "+--",
        corner: "`--",
        vbar: "|",
        hline: "-",
        rarrow: "->",
        larrow: "<-",
        bullet: "*",
    };

    pub fn new(ascii: bool) -> Self {
        if ascii {
            Frame::ASCII
        } else {
            Frame::UNICODE
        }
    }
}

/// Colors a status code by class: 1xx cyan, 2xx green, 3xx yellow, 4xx red,
/// 5xx magenta, anything else plain.
pub fn status(code: u16) -> ColoredString {
    let text = code.to_string();
    match code {
        100..=199 => text.cyan(),
        200..=299 => text.green(),
        300..=399 => text.yellow(),
        400..=499 => text.red(),
        500..=599 => text.magenta(),
        _ => text.normal(),
    }
}

pub fn validity(validity: Validity, text: &str) -> ColoredString {
    match validity {
        Validity::Expired { .. } => text.red(),
        Validity::ExpiringSoon { .. } => text.yellow(),
        Validity::Valid { .. } => text.green(),
    }
}

pub fn chain_status(chain_status: ChainStatus) -> ColoredString {
    match chain_status {
        ChainStatus::SentByPeer => "sent by peer".green(),
        ChainStatus::Incomplete => "incomplete".red(),
        ChainStatus::TrustForced => "trust forced".yellow(),
        ChainStatus::SelfSigned => "selfsigned".red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color_buckets() {
        assert_eq!(status(101), "101".cyan());
        assert_eq!(status(204), "204".green());
        assert_eq!(status(302), "302".yellow());
        assert_eq!(status(404), "404".red());
        assert_eq!(status(503), "503".magenta());
        assert_eq!(status(999), "999".normal());
        assert_eq!(status(42), "42".normal());
    }

    #[test]
    fn test_validity_colors() {
        assert_eq!(validity(Validity::Expired { days: -1.0 }, "x"), "x".red());
        assert_eq!(validity(Validity::ExpiringSoon { days: 3.0 }, "x"), "x".yellow());
        assert_eq!(validity(Validity::Valid { days: 300.0 }, "x"), "x".green());
    }

    #[test]
    fn test_chain_status_colors() {
        assert_eq!(chain_status(ChainStatus::SelfSigned), "selfsigned".red());
        assert_eq!(chain_status(ChainStatus::TrustForced), "trust forced".yellow());
    }

    #[test]
    fn test_ascii_frame_is_ascii() {
        let f = Frame::new(true);
        for s in [f.tee, f.corner, f.vbar, f.hline, f.rarrow, f.larrow, f.bullet] {
            assert!(s.is_ascii(), "{s} is not ascii");
        }
    }
}
