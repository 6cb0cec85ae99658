//! htprobe library: inspect HTTP(S) requests and their redirect chains.
//!
//! The library walks the redirect chain of a target URL hop by hop, records
//! what was sent and received at every hop (headers, cookies, body and the TLS
//! certificate chain) and renders the result as colored terminal views.
//!
//! # Example
//!
//! ```no_run
//! use htprobe::config::ConnectionSetup;
//! use htprobe::fetch::{walk, RequestExecutor, RequestTemplate};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! htprobe::initialization::init_crypto_provider();
//! let setup = ConnectionSetup::new(Duration::from_secs(3), None, false, true, false);
//! let executor = RequestExecutor::new(&setup)?;
//!
//! let url = htprobe::app::check_url("example.com")?;
//! let hops = walk(&executor, RequestTemplate::default().for_url(url), true).await?;
//! for hop in &hops {
//!     println!("{hop}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod app;
pub mod config;
pub mod display;
pub mod dns;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod run;
pub mod tls;
mod utils;

// Re-export public API
pub use config::cli::Cli;
pub use error_handling::{ExitCode, InitializationError, ProbeError};
pub use run::run_command;
