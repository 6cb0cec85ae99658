//! Command-line interface definition.
//!
//! Global flags (connection policy, request decoration, output style) live on
//! the root command and apply to every subcommand.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_CONNECTION_TIMEOUT_SECS,
};
use crate::config::types::LogFormat;

/// A http request analyzing and debugging tool.
#[derive(Debug, Parser)]
#[command(name = "htprobe", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by all subcommands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Set verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set debug mode
    #[arg(long, global = true, hide = true)]
    pub debug: bool,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Use ascii chars only
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Do not use colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Combines no color and ascii mode
    #[arg(long, global = true)]
    pub no_fancy: bool,

    /// Trust invalid and selfsigned certificates
    #[arg(short, long, global = true)]
    pub trust: bool,

    /// Resolve host names
    #[arg(long, global = true)]
    pub resolve: bool,

    /// Show results uncut (headers, cookies etc.)
    #[arg(long, global = true)]
    pub full: bool,

    /// Accept response cookies
    #[arg(short, long, global = true)]
    pub accept_cookies: bool,

    /// User (basic auth)
    #[arg(short, long, value_name = "USER", requires = "pass", global = true)]
    pub user: Option<String>,

    /// Password (basic auth)
    #[arg(short, long, value_name = "PASSWORD", requires = "user", global = true)]
    pub pass: Option<String>,

    /// User agent
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub agent: String,

    /// Set language header for request
    #[arg(short = 'L', long, value_name = "LANGUAGE", default_value = "", global = true)]
    pub lang: String,

    /// Set host as proxy
    #[arg(short = 'P', long, value_name = "HOST[:PORT]", global = true)]
    pub proxy: Option<String>,

    /// Connection timeout in seconds (0=disable, <=3600)
    #[arg(
        short = 'T',
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_CONNECTION_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(0..=MAX_CONNECTION_TIMEOUT_SECS),
        global = true
    )]
    pub timeout: u64,

    /// Http request method (see RFC 7231 section 4.3.)
    #[arg(short, long, default_value = "GET", global = true)]
    pub method: String,

    /// Set request cookie (fmt: name:value); may be repeated
    #[arg(long, value_name = "NAME:VALUE", global = true)]
    pub cookie: Vec<String>,

    /// Read cookies from file (fmt: lines of 'name:value')
    #[arg(long, value_name = "FILE", global = true)]
    pub cookie_file: Option<PathBuf>,

    /// Add entry to request body where needed (e.g. POST); may be repeated
    #[arg(short, long, value_name = "ENTRY", global = true)]
    pub body: Vec<String>,

    /// Read request body from file
    #[arg(short = 'B', long, value_name = "FILE", global = true)]
    pub body_file: Option<PathBuf>,

    /// Pass header to request (fmt: 'Name: Value'); may be repeated
    #[arg(short = 'A', long, value_name = "HEADER", global = true)]
    pub add_header: Vec<String>,

    /// Read request headers from file (fmt: lines of 'Name: Value')
    #[arg(long, value_name = "FILE", global = true)]
    pub header_file: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else if self.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        }
    }

    pub fn use_color(&self) -> bool {
        !(self.no_color || self.no_fancy)
    }

    pub fn use_ascii(&self) -> bool {
        self.ascii || self.no_fancy
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Follows and shows the redirect chain of a http request
    #[command(visible_aliases = ["rd", "redir", "redirect"])]
    Redirects(RedirectArgs),

    /// Shows the request and response headers of a http request
    #[command(visible_aliases = ["hd", "head"])]
    Headers(HeaderArgs),

    /// Makes a http request and displays the content of the response, if any
    #[command(visible_aliases = ["cnt", "cont"])]
    Content(ContentArgs),

    /// Shows the request and response cookies of a http request
    #[command(visible_aliases = ["ck", "cookie"])]
    Cookies(CookieArgs),

    /// Analyzes and displays server certificates
    #[command(visible_aliases = ["ct", "crt", "cert"])]
    Certificate(CertificateArgs),

    /// Shows version and runtime information
    #[command(visible_aliases = ["vers"])]
    Version,
}

#[derive(Debug, Args)]
pub struct RedirectArgs {
    /// Target URL(s)
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Show response cookies
    #[arg(short = 'c', long)]
    pub show_cookies: bool,

    /// Show certificate(s)
    #[arg(short = 'C', long)]
    pub show_cert: bool,

    /// Show response headers
    #[arg(short = 'H', long)]
    pub response_headers: bool,

    /// Show request headers
    #[arg(short = 'R', long)]
    pub request_headers: bool,

    /// Show request cookies
    #[arg(short = 'Z', long)]
    pub request_cookies: bool,

    /// Show content of last hop (prints to stderr)
    #[arg(short = 'O', long)]
    pub show_content: bool,

    /// Show details for all hops, not only the last one
    #[arg(long)]
    pub all: bool,

    /// Show only response header NAME; may be repeated
    #[arg(short = 'S', long, value_name = "NAME")]
    pub display_header: Vec<String>,

    /// Show only response cookie NAME; may be repeated
    #[arg(short = 'D', long, value_name = "NAME")]
    pub display_cookie: Vec<String>,
}

#[derive(Debug, Args)]
pub struct HeaderArgs {
    /// Target URL(s)
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Follow redirects and show headers of every hop
    #[arg(short, long)]
    pub follow: bool,

    /// Show only response header NAME; may be repeated
    #[arg(short = 'S', long, value_name = "NAME")]
    pub show_header: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ContentArgs {
    /// Target URL(s)
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Follow redirects and show content of every hop
    #[arg(short, long)]
    pub follow: bool,

    /// Write content to file
    #[arg(short, long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CookieArgs {
    /// Target URL(s)
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Follow redirects and show cookies of every hop
    #[arg(short, long)]
    pub follow: bool,

    /// Show only cookie NAME; may be repeated
    #[arg(short = 'D', long, value_name = "NAME")]
    pub show_cookie: Vec<String>,

    /// Save cookie(s) of the last hop to file
    #[arg(short = 'S', long, value_name = "FILE")]
    pub save_cookies: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CertificateArgs {
    /// Target URL(s)
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Follow redirects and show certificates of every hop
    #[arg(short, long)]
    pub follow: bool,

    /// Show certificate details
    #[arg(short, long)]
    pub show_details: bool,

    /// Display client side verified certificate chain
    #[arg(short = 'V', long)]
    pub validated_chain: bool,
}
