//! Cookie view and cookie file output.

use std::io::{self, Write};

use colored::Colorize;

use crate::display::headers::{print_headers, selected_header_lines};
use crate::display::{Block, View, PLAIN_BLOCK};
use crate::fetch::{Cookie, WebRequestResult};

/// Stored cookies whose name is in `names` (names compared trimmed).
pub(crate) fn select_cookies<'a>(names: &[String], cookies: &'a [Cookie]) -> Vec<&'a Cookie> {
    cookies
        .iter()
        .filter(|c| names.iter().any(|n| n.trim() == c.name.trim()))
        .collect()
}

pub(crate) fn print_cookies(
    w: &mut dyn Write,
    view: &View,
    block: &Block<'_>,
    title: &str,
    cookies: &[&Cookie],
) -> io::Result<()> {
    block.title(w, title)?;
    if cookies.is_empty() {
        block.line(w, &format!("{} (None)", view.frame.bullet))?;
    }
    for cookie in cookies {
        let text = format!("{}: {}", cookie.name, cookie.full_value());
        block.line(
            w,
            &format!("{} {}", view.frame.bullet, view.shorten(&text, view.value_width())),
        )?;
    }
    block.end(w)
}

/// Cookies of every hop.
///
/// Without `selected` names this shows the cookies sent, the raw `Set-Cookie`
/// values of the response and (if cookies are accepted) the jar content after
/// the hop. With names, only the matching stored cookies are shown.
pub fn print_cookie_hops(
    w: &mut dyn Write,
    view: &View,
    hops: &[WebRequestResult],
    selected: &[String],
    accept_cookies: bool,
) -> io::Result<()> {
    writeln!(w)?;
    for (index, hop) in hops.iter().enumerate() {
        view.hop_title(w, hop, index)?;

        if selected.is_empty() {
            let sent = hop.request.cookies();
            print_cookies(w, view, &PLAIN_BLOCK, "Request Cookies:", &sent.iter().collect::<Vec<_>>())?;

            if !hop.response.set_cookie_headers().is_empty() {
                print_headers(
                    w,
                    view,
                    &PLAIN_BLOCK,
                    &"Cookie Store Request Detected:".yellow().to_string(),
                    &selected_header_lines(&["Set-Cookie".to_string()], &hop.response.headers),
                )?;
            }

            if accept_cookies {
                print_cookies(w, view, &PLAIN_BLOCK, "Stored Cookies:", &hop.cookies.iter().collect::<Vec<_>>())?;
            }
        } else {
            print_cookies(
                w,
                view,
                &PLAIN_BLOCK,
                "Selected Cookies:",
                &select_cookies(selected, &hop.cookies),
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Writes `cookies` one per line as `name=value`.
pub fn write_cookie_file(w: &mut dyn Write, cookies: &[Cookie]) -> io::Result<()> {
    for cookie in cookies {
        writeln!(w, "{cookie}")?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::test_support::render;
    use crate::display::Frame;
    use crate::fetch::test_support::hop;
    use reqwest::header::COOKIE;

    fn view() -> View {
        View {
            frame: Frame::ASCII,
            full: false,
            width: 120,
            addresses: Default::default(),
        }
    }

    #[test]
    fn test_set_cookie_is_announced() {
        let mut h = hop(
            "http://example.com/login",
            302,
            &[("set-cookie", "session=abc; Path=/")],
        );
        h.cookies = vec![Cookie::new("session", "abc")];
        h.request.headers.insert(COOKIE, "theme=dark".parse().unwrap());

        let out = render(|w| print_cookie_hops(w, &view(), &[h], &[], true));

        assert!(out.contains("Request Cookies:"));
        assert!(out.contains("* theme: dark"));
        assert!(out.contains("Cookie Store Request Detected:"));
        assert!(out.contains("* Set-Cookie: session=abc; Path=/"));
        assert!(out.contains("Stored Cookies:"));
        assert!(out.contains("* session: abc"));
    }

    #[test]
    fn test_no_cookies_shows_none_and_no_store_without_jar() {
        let h = hop("http://example.com/", 200, &[]);
        let out = render(|w| print_cookie_hops(w, &view(), &[h], &[], false));
        assert!(out.contains("* (None)"));
        assert!(!out.contains("Stored Cookies:"));
        assert!(!out.contains("Cookie Store Request Detected:"));
    }

    #[test]
    fn test_selected_cookies() {
        let mut h = hop("http://example.com/", 200, &[]);
        h.cookies = vec![Cookie::new("a", "1"), Cookie::new("b", "2")];
        let out = render(|w| print_cookie_hops(w, &view(), &[h], &[" b ".into()], true));
        assert!(out.contains("Selected Cookies:"));
        assert!(out.contains("* b: 2"));
        assert!(!out.contains("* a: 1"));
    }

    #[test]
    fn test_cookie_file_format() {
        let mut out = Vec::new();
        write_cookie_file(&mut out, &[Cookie::new("a", "1"), Cookie::new("b", "x y")]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a=1\nb=x y\n");
    }
}
