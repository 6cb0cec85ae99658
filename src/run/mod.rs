//! Command dispatch.
//!
//! `run_command` executes one parsed command line and returns the process exit
//! code. Output goes to the injected writers, so the whole run can be driven
//! from tests.

mod commands;
mod probe;

use std::io::Write;

use crate::config::cli::{Cli, Command};
use crate::config::{APP_NAME, APP_VERSION, AUTHOR};
use crate::error_handling::ExitCode;

pub use probe::{Failures, Probe};

/// Runs the command of `cli`.
///
/// # Errors
///
/// Returns errors that end the run: `ProbeError` for invalid flags, unreadable
/// input files or failed output, and `InitializationError` if the HTTP client
/// cannot be built. Per-URL failures are reported on `err` and only show up in
/// the returned exit code.
pub async fn run_command(
    cli: &Cli,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let global = &cli.global;
    let code = match &cli.command {
        Command::Redirects(args) => commands::redirects(global, args, out, err).await?,
        Command::Headers(args) => commands::headers(global, args, out, err).await?,
        Command::Content(args) => commands::content(global, args, out, err).await?,
        Command::Cookies(args) => commands::cookies(global, args, out, err).await?,
        Command::Certificate(args) => commands::certificate(global, args, out, err).await?,
        Command::Version => {
            print_version(out)?;
            ExitCode::Ok
        }
    };
    out.flush()?;
    Ok(code)
}

/// Writes name, version, platform and author.
pub fn print_version(w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{APP_NAME}")?;
    writeln!(w, "  Version:  {APP_VERSION}")?;
    writeln!(
        w,
        "  Binary:   {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    )?;
    writeln!(w, "  Author:   {AUTHOR}")?;
    writeln!(w)
}
