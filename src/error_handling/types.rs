//! Error type definitions.
//!
//! This module defines all error types used throughout the application and
//! the process exit code each of them maps to.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error building the TLS client configuration.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(String),
}

/// Errors produced while probing a target.
///
/// One variant per failure category; each maps to a distinct exit code via
/// [`ProbeError::exit_code`].
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The target could not be parsed as an http(s) URL.
    #[error("no valid URL: {url}")]
    NoUrl { url: String },

    /// Network, DNS, TLS or transport failure while sending a request.
    #[error("request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The response cannot be processed (e.g. a redirect without usable `Location`).
    #[error("invalid response from {url}: {reason}")]
    ResponseInvalid { url: String, reason: String },

    /// Host name resolution failed (`--resolve`).
    #[error("could not resolve {host}: {source}")]
    ResolveFailed {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// An input or output file could not be read or written.
    #[error("file error on {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file does not exist or cannot be opened.
    #[error("cannot open {}: {source}", .path.display())]
    NoFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested HTTP method is not in the allow-list.
    #[error("unknown http method: {0} (allowed: GET, HEAD, POST, PUT, PATCH, DELETE, CONNECT, OPTIONS, TRACE)")]
    UnknownMethod(String),

    /// An extra request header is not of the form `Name: Value`.
    #[error("invalid request header: {0}")]
    InvalidHeader(String),

    /// Writing the report to the output sink failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Process exit codes, one per failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ExitCode {
    Ok = 0,
    Undefined = 1,
    Request = 4,
    Response = 5,
    Resolve = 6,
    InvalidFlag = 7,
    NoUrl = 9,
    FileIo = 10,
    NoFile = 11,
    NoMethod = 12,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl ProbeError {
    /// Returns the category exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ProbeError::NoUrl { .. } => ExitCode::NoUrl,
            ProbeError::RequestFailed { .. } => ExitCode::Request,
            ProbeError::ResponseInvalid { .. } => ExitCode::Response,
            ProbeError::ResolveFailed { .. } => ExitCode::Resolve,
            ProbeError::FileIo { .. } | ProbeError::Output(_) => ExitCode::FileIo,
            ProbeError::NoFile { .. } => ExitCode::NoFile,
            ProbeError::UnknownMethod(_) => ExitCode::NoMethod,
            ProbeError::InvalidHeader(_) => ExitCode::InvalidFlag,
        }
    }

    /// Returns true if the error only affects the current target URL.
    ///
    /// Per-URL errors are reported and the run continues with the next URL.
    pub fn is_per_url(&self) -> bool {
        matches!(
            self,
            ProbeError::NoUrl { .. }
                | ProbeError::RequestFailed { .. }
                | ProbeError::ResponseInvalid { .. }
                | ProbeError::ResolveFailed { .. }
                | ProbeError::InvalidHeader(_)
        )
    }
}
