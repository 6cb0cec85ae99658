//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `htprobe` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Mapping the outcome to the process exit code
//!
//! All core functionality is implemented in the library crate.

use std::io;
use std::process;

use clap::Parser;
use colored::Colorize;

use htprobe::initialization::{init_crypto_provider, init_logger_with};
use htprobe::{run_command, Cli, ExitCode, ProbeError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let global = &cli.global;
    if let Err(e) = init_logger_with(
        global.log_level(),
        global.log_format.clone(),
        global.use_color(),
    ) {
        eprintln!("htprobe error: {e}");
        process::exit(ExitCode::Undefined.code());
    }

    init_crypto_provider();

    let result = run_command(&cli, &mut io::stdout(), &mut io::stderr()).await;

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("{}", format!("*** Error: {e:#}").as_str().red());
            e.downcast_ref::<ProbeError>()
                .map_or(ExitCode::Undefined, ProbeError::exit_code)
        }
    };
    process::exit(code.code());
}
