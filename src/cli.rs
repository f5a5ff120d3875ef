//! Terminal side of the checker: the interactive check form and report loading.

use std::io::{BufRead, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::check::{IntegrationRequest, check_integration};
use crate::error::CheckError;
use crate::report::normalize::{NormalizedReport, failure, normalize};
use crate::shopify::ShopApi;

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` and read one trimmed line. EOF reads as an empty answer.
    pub fn ask(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(question)?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Result of a terminal check.
#[derive(Debug)]
pub struct CheckOutcome {
    /// The response body the HTTP endpoint would have sent. `None` when the
    /// check never got an answer from the store.
    pub raw: Option<Value>,
    pub report: NormalizedReport,
}

/// Run the check form. Fields passed in are used for the first attempt only.
///
/// When the store cannot be reached the error is shown and, if `allow_retry`
/// is set, the user may try again with both fields asked for afresh.
pub async fn run_check<R: BufRead, W: Write>(
    api: &dyn ShopApi,
    api_version: &str,
    mut store: Option<String>,
    mut token: Option<String>,
    prompter: &mut Prompter<R, W>,
    allow_retry: bool,
) -> Result<CheckOutcome> {
    loop {
        let store_url = match store.take() {
            Some(store) => store,
            None => prompter.ask("Store URL: ")?,
        };
        let access_token = match token.take() {
            Some(token) => token,
            None => prompter.ask("Access token: ")?,
        };
        let request = IntegrationRequest::new(store_url, access_token);

        prompter.say(&format!(
            "Testing {}...",
            request.store_url.as_deref().unwrap_or_default()
        ))?;
        let raw = match check_integration(api, api_version, &request).await {
            Ok(report) => serde_json::to_value(&report)?,
            Err(CheckError::Unexpected(message)) => {
                prompter.say(&format!("\nerror testing integration: {message}"))?;
                if allow_retry && prompter.confirm("Try again? [y/N] ")? {
                    continue;
                }
                return Ok(CheckOutcome {
                    raw: None,
                    report: failure(message),
                });
            }
            Err(e) => e.body(),
        };

        let report = normalize(&raw)?;
        return Ok(CheckOutcome {
            raw: Some(raw),
            report,
        });
    }
}

/// Load a saved report from `path`, or from `stdin` when no path is given.
pub fn read_report<R: Read>(path: Option<&Path>, mut stdin: R) -> Result<NormalizedReport> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("failed to read report from stdin")?;
            buf
        }
    };
    let value: Value = serde_json::from_str(&raw).context("report is not JSON")?;
    normalize(&value)
}
