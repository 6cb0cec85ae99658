//! One driver per subcommand.
//!
//! Every driver probes its URLs in order, renders to `out` and reports
//! per-URL failures on `err`, then returns the exit code of the first failure.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::config::cli::{
    CertificateArgs, ContentArgs, CookieArgs, GlobalArgs, HeaderArgs, RedirectArgs,
};
use crate::display::{
    print_certificate_hops, print_chain, print_content, print_cookie_hops, print_header_hops,
    print_last_content, write_cookie_file, CertificateOptions, ChainOptions,
};
use crate::error_handling::{ExitCode, ProbeError};
use crate::fetch::Cookie;

use super::probe::{Failures, Probe};

fn chain_options(args: &RedirectArgs) -> ChainOptions {
    ChainOptions {
        request_headers: args.request_headers,
        request_cookies: args.request_cookies,
        response_headers: args.response_headers || !args.display_header.is_empty(),
        response_cookies: args.show_cookies || !args.display_cookie.is_empty(),
        certificates: args.show_cert,
        all_hops: args.all,
        selected_headers: args.display_header.clone(),
        selected_cookies: args.display_cookie.clone(),
    }
}

/// `redirects`: the chain view, always following redirects.
pub async fn redirects(
    global: &GlobalArgs,
    args: &RedirectArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let probe = Probe::new(global, true)?;
    let options = chain_options(args);
    let mut failures = Failures::default();

    for raw in &args.urls {
        match probe.fetch(raw).await {
            Ok((view, hops)) => {
                let reports = probe.certificate_reports(&hops);
                print_chain(out, &view, &options, &hops, &reports)?;
                if args.show_content {
                    if let Some(last) = hops.last() {
                        print_last_content(err, &view, last)?;
                    }
                }
            }
            Err(e) => failures.record(err, raw, e)?,
        }
    }
    Ok(failures.exit_code())
}

/// `headers`: request and response headers per hop.
pub async fn headers(
    global: &GlobalArgs,
    args: &HeaderArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let probe = Probe::new(global, args.follow)?;
    let mut failures = Failures::default();

    for raw in &args.urls {
        match probe.fetch(raw).await {
            Ok((view, hops)) => print_header_hops(out, &view, &hops, &args.show_header)?,
            Err(e) => failures.record(err, raw, e)?,
        }
    }
    Ok(failures.exit_code())
}

fn create_file(path: &Path) -> Result<BufWriter<File>, ProbeError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ProbeError::NoFile {
            path: path.to_path_buf(),
            source,
        })
}

/// `content`: the body of every hop, to stdout or `--outfile`.
pub async fn content(
    global: &GlobalArgs,
    args: &ContentArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let probe = Probe::new(global, args.follow)?;
    let mut outfile = args.outfile.as_deref().map(create_file).transpose()?;
    let mut failures = Failures::default();

    for raw in &args.urls {
        match probe.fetch(raw).await {
            Ok((view, hops)) => match (outfile.as_mut(), args.outfile.as_deref()) {
                (Some(file), Some(path)) => {
                    print_content(file, &view, &hops).map_err(|source| ProbeError::FileIo {
                        path: path.to_path_buf(),
                        source,
                    })?;
                    info!("Content of {raw} written to {}", path.display());
                }
                _ => print_content(out, &view, &hops)?,
            },
            Err(e) => failures.record(err, raw, e)?,
        }
    }
    Ok(failures.exit_code())
}

fn save_cookies(out: &mut dyn Write, path: &Path, cookies: &[Cookie]) -> Result<(), ProbeError> {
    write!(out, "Save cookie list to {}: ", path.display())?;
    let mut file = create_file(path)?;
    write_cookie_file(&mut file, cookies).map_err(|source| ProbeError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    writeln!(out, "Done")?;
    Ok(())
}

/// `cookies`: cookies per hop, optionally saving the final jar content.
pub async fn cookies(
    global: &GlobalArgs,
    args: &CookieArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let probe = Probe::new(global, args.follow)?;
    let mut failures = Failures::default();

    for raw in &args.urls {
        match probe.fetch(raw).await {
            Ok((view, hops)) => {
                print_cookie_hops(out, &view, &hops, &args.show_cookie, probe.accept_cookies())?;
                if let (Some(path), Some(last)) = (args.save_cookies.as_deref(), hops.last()) {
                    save_cookies(out, path, &last.cookies)?;
                }
            }
            Err(e) => failures.record(err, raw, e)?,
        }
    }
    Ok(failures.exit_code())
}

/// `certificate`: the certificate block of every hop.
pub async fn certificate(
    global: &GlobalArgs,
    args: &CertificateArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let probe = Probe::new(global, args.follow)?;
    let options = CertificateOptions {
        details: args.show_details,
        validated_chain: args.validated_chain,
    };
    let mut failures = Failures::default();

    for raw in &args.urls {
        match probe.fetch(raw).await {
            Ok((view, hops)) => {
                let reports = probe.certificate_reports(&hops);
                print_certificate_hops(out, &view, &hops, &reports, options)?;
            }
            Err(e) => failures.record(err, raw, e)?,
        }
    }
    Ok(failures.exit_code())
}
