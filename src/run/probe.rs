//! Shared resources of a command run.

use std::collections::HashMap;
use std::io::Write;

use chrono::Utc;
use colored::Colorize;
use log::{debug, info};

use crate::app::check_url;
use crate::config::cli::GlobalArgs;
use crate::config::input::{build_connection_setup, build_request_template};
use crate::display::View;
use crate::dns::resolve_host;
use crate::error_handling::{ExitCode, ProbeError};
use crate::fetch::{walk, RequestExecutor, RequestTemplate, WebRequestResult};
use crate::tls::{analyze, CertificateReport};

/// Everything a command needs to probe its target URLs.
pub struct Probe {
    template: RequestTemplate,
    executor: RequestExecutor,
    view: View,
    resolve: bool,
}

impl Probe {
    /// Builds the request template, the connection policy and the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError` for invalid flags or unreadable input files and
    /// `InitializationError` if the HTTP client cannot be built.
    pub fn new(args: &GlobalArgs, follow_redirects: bool) -> anyhow::Result<Self> {
        let template = build_request_template(args)?;
        let setup = build_connection_setup(args, follow_redirects);
        debug!("Connection setup: {setup:?}");
        let executor = RequestExecutor::new(&setup)?;

        Ok(Self {
            template,
            executor,
            view: View::new(args.use_ascii(), args.full),
            resolve: args.resolve,
        })
    }

    pub fn follow_redirects(&self) -> bool {
        self.executor.setup().follow_redirects
    }

    pub fn accept_cookies(&self) -> bool {
        self.executor.setup().accept_cookies
    }

    /// Validates `raw`, walks its chain and, with `--resolve`, looks up the
    /// address of every host in the chain.
    pub async fn fetch(&self, raw: &str) -> Result<(View, Vec<WebRequestResult>), ProbeError> {
        let url = check_url(raw)?;
        info!("Probing {url}");
        let hops = walk(&self.executor, self.template.for_url(url), self.follow_redirects()).await?;

        let mut view = self.view.clone();
        if self.resolve {
            let mut addresses = HashMap::new();
            for hop in &hops {
                let host = hop.host();
                if !addresses.contains_key(host) {
                    addresses.insert(host.to_string(), resolve_host(host).await?);
                }
            }
            view.addresses = addresses;
        }
        Ok((view, hops))
    }

    /// Certificate analysis of every hop, in hop order.
    pub fn certificate_reports(&self, hops: &[WebRequestResult]) -> Vec<Option<CertificateReport>> {
        let trust_forced = self.executor.trust_forced();
        let now = Utc::now();
        hops.iter()
            .map(|hop| analyze(hop.response.tls.as_ref(), trust_forced, now))
            .collect()
    }
}

/// Collects per-URL failures so a run can continue with the next URL.
#[derive(Debug, Default)]
pub struct Failures {
    first: Option<ExitCode>,
    count: usize,
}

impl Failures {
    /// Reports a per-URL error on `err` and remembers its exit code.
    ///
    /// # Errors
    ///
    /// Hands back errors that end the whole run.
    pub fn record(
        &mut self,
        err: &mut dyn Write,
        raw: &str,
        error: ProbeError,
    ) -> Result<(), ProbeError> {
        if !error.is_per_url() {
            return Err(error);
        }
        debug!("{raw}: {error:?}");
        writeln!(err, "{}", format!("*** Error: {error}").as_str().red())?;
        self.count += 1;
        self.first.get_or_insert(error.exit_code());
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Exit code of the first failure, `Ok` if there was none.
    pub fn exit_code(&self) -> ExitCode {
        self.first.unwrap_or(ExitCode::Ok)
    }
}
