//! Certificate view.

use std::io::{self, Write};

use colored::Colorize;

use crate::display::{theme, Block, View, PLAIN_BLOCK};
use crate::fetch::WebRequestResult;
use crate::tls::{CertificateReport, ChainEntry, NameMatch};

/// Which parts of the certificate view are shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateOptions {
    /// Subject/issuer details, validity start and chain status
    pub details: bool,
    /// Client side verified chain(s), only together with `details`
    pub validated_chain: bool,
}

fn organization(org: &Option<String>) -> &str {
    org.as_deref().unwrap_or("(not available)")
}

fn print_chain_entries(
    w: &mut dyn Write,
    view: &View,
    block: &Block<'_>,
    number: usize,
    heading: &str,
    chain: &[ChainEntry],
) -> io::Result<()> {
    let Some((leaf, rest)) = chain.split_first() else {
        return Ok(());
    };
    block.line(
        w,
        &format!("  {heading:<9} [{number}] {}", leaf.common_name.to_lowercase()),
    )?;
    for entry in rest.iter().take_while(|e| !e.common_name.is_empty()) {
        block.line(
            w,
            &format!(
                "                {}  {} ({})",
                view.frame.larrow,
                entry.common_name,
                entry.organization.as_deref().unwrap_or_default()
            ),
        )?;
    }
    Ok(())
}

/// Colors SAN number `hit` green inside the (possibly shortened) SAN list.
///
/// `shown` is `plain` or a shortened prefix of it ending in `...`. The SAN
/// stays uncolored when shortening cut into it.
fn highlight_san(plain: &str, shown: &str, sans: &[&str], hit: usize) -> String {
    let Some(san) = sans.get(hit) else {
        return shown.to_string();
    };
    let kept = if shown == plain {
        plain.len()
    } else {
        shown.len().saturating_sub(3)
    };
    let start: usize = sans[..hit].iter().map(|s| s.len() + 2).sum();
    let end = start + san.len();
    if end > kept {
        return shown.to_string();
    }
    format!("{}{}{}", &shown[..start], san.green(), &shown[end..])
}

/// Full certificate block of one hop (`certificate` command).
///
/// The leaf CN is green if it matches the host; otherwise the matching SAN is
/// green. Without any match both CN and SANs are red.
pub fn print_certificate_block(
    w: &mut dyn Write,
    view: &View,
    block: &Block<'_>,
    report: Option<&CertificateReport>,
    options: CertificateOptions,
) -> io::Result<()> {
    block.title(w, "Certificate(s):")?;

    let Some(report) = report else {
        block.line(w, &format!("{} (None)", view.frame.bullet))?;
        return block.end(w);
    };
    let leaf = &report.leaf;
    let max = view.value_width();

    let common_name = view.shorten(&leaf.common_name, max);
    let sans: Vec<&str> = leaf.subject_alt_names.iter().map(|san| san.trim()).collect();
    let plain_sans = if sans.is_empty() {
        "None".to_string()
    } else {
        sans.join(", ")
    };
    let shown_sans = view.shorten(&plain_sans, max);
    let (common_name, sans) = match report.name_match {
        NameMatch::CommonName => (common_name.as_str().green().to_string(), shown_sans),
        NameMatch::SubjectAltName(hit) => (
            common_name,
            highlight_san(&plain_sans, &shown_sans, &sans, hit),
        ),
        NameMatch::Unmatched => (
            common_name.as_str().red().to_string(),
            shown_sans.as_str().red().to_string(),
        ),
    };

    block.line(w, &format!("{} CN:           {common_name}", view.frame.bullet))?;
    if options.details {
        block.line(w, &format!("  Organization: {}", organization(&leaf.organization)))?;
        if let Some(units) = &leaf.organizational_units {
            block.line(w, &format!("  Unit:         {units}"))?;
        }
        if let Some(country) = &leaf.country {
            block.line(w, &format!("  Country:      {country}"))?;
        }
    }
    block.line(w, &format!("  SANs:         {sans}"))?;

    if options.details {
        writeln!(w)?;
        block.line(w, &format!("  Issuer:       {}", view.shorten(&leaf.issuer_name, max)))?;
        block.line(w, &format!("  Organization: {}", organization(&leaf.issuer_organization)))?;
        if let Some(units) = &leaf.issuer_units {
            block.line(w, &format!("  Unit:         {units}"))?;
        }
        if let Some(country) = &leaf.issuer_country {
            block.line(w, &format!("  Country:      {country}"))?;
        }
        writeln!(w)?;
        block.line(w, &format!("  Valid from:   {}", leaf.valid_from))?;
    }
    block.line(
        w,
        &format!(
            "  Valid until:  {}",
            theme::validity(report.validity, &leaf.valid_until.to_string())
        ),
    )?;

    let heading = if options.details {
        writeln!(w)?;
        block.line(
            w,
            &format!(
                "  Certificate Chain ({}):",
                theme::chain_status(report.chain_status)
            ),
        )?;
        ""
    } else {
        "CA-Chain:"
    };
    print_chain_entries(w, view, block, 0, heading, &report.peer_chain)?;

    if options.details && options.validated_chain {
        writeln!(w)?;
        if report.verified_chains.is_empty() {
            block.line(w, "  Verified Chain(s): None")?;
        } else {
            block.line(
                w,
                &format!("  Verified Chain(s) ({}):", "checked by client".green()),
            )?;
            for (number, chain) in report.verified_chains.iter().enumerate() {
                print_chain_entries(w, view, block, number, heading, chain)?;
            }
        }
    }

    block.end(w)
}

/// Short certificate block used inside the redirect chain view.
pub fn print_certificate_summary(
    w: &mut dyn Write,
    view: &View,
    block: &Block<'_>,
    report: Option<&CertificateReport>,
) -> io::Result<()> {
    block.title(w, "Certificate(s):")?;

    match report {
        Some(report) => {
            let leaf = &report.leaf;
            let max = view.width.saturating_sub(28).max(20);
            let sans = if leaf.subject_alt_names.is_empty() {
                "None".to_string()
            } else {
                leaf.subject_alt_names.join(", ")
            };
            let ca_chain = report
                .peer_chain
                .iter()
                .map(|c| c.common_name.as_str())
                .collect::<Vec<_>>()
                .join(" <<< ");

            block.line(w, &format!("{} CN:          {}", view.frame.bullet, leaf.common_name))?;
            block.line(w, &format!("  SANs:        {}", view.shorten(&sans, max)))?;
            block.line(
                w,
                &format!(
                    "  Valid until: {}",
                    theme::validity(report.validity, &leaf.valid_until.to_string())
                ),
            )?;
            block.line(w, &format!("  CA-Chain:    {}", view.shorten(&ca_chain, max)))?;
        }
        None => block.line(w, &format!("{} (None)", view.frame.bullet))?,
    }

    block.end(w)
}

/// Certificate block for every hop, each under its hop title.
///
/// `reports` holds one analysis per hop, in hop order.
pub fn print_certificate_hops(
    w: &mut dyn Write,
    view: &View,
    hops: &[WebRequestResult],
    reports: &[Option<CertificateReport>],
    options: CertificateOptions,
) -> io::Result<()> {
    writeln!(w)?;
    for (index, (hop, report)) in hops.iter().zip(reports).enumerate() {
        view.hop_title(w, hop, index)?;
        print_certificate_block(w, view, &PLAIN_BLOCK, report.as_ref(), options)?;
        writeln!(w)?;
    }
    Ok(())
}
