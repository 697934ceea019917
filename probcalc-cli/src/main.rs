//! probcalc CLI
//!
//! Reads `<distribution>: <query>` lines from stdin, for example
//! `B(20, 0.25): 3 < X <= 12`, and writes one JSON object per line to
//! stdout. Logs go to stderr.
//!
//! Environment:
//! - PROBCALC_SIG_FIGS: significant figures for results (default 10)
//! - RUST_LOG: log filter (default info)

use probcalc::{Calculation, QueryError, DEFAULT_SIG_FIGS};
use serde::Serialize;
use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SIG_FIGS_VAR: &str = "PROBCALC_SIG_FIGS";

#[derive(Debug, Serialize)]
struct Response<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    distribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl<'a> Response<'a> {
    fn success(input: &'a str, calculation: Calculation) -> Self {
        Self {
            input,
            distribution: Some(calculation.distribution.to_string()),
            bounds: Some(calculation.bounds),
            probability: Some(calculation.probability),
            error: None,
        }
    }

    fn failure(input: &'a str, err: QueryError) -> Self {
        Self {
            input,
            distribution: None,
            bounds: None,
            probability: None,
            error: Some(ErrorBody { code: err.code(), message: err.to_string() }),
        }
    }
}

/// Significant figures from the environment value, falling back to the default
fn parse_sig_figs(value: Option<&str>) -> u32 {
    let Some(text) = value else {
        return DEFAULT_SIG_FIGS;
    };
    match text.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            warn!(value = text, default = DEFAULT_SIG_FIGS, "ignoring invalid {}", SIG_FIGS_VAR);
            DEFAULT_SIG_FIGS
        }
    }
}

fn handle(line: &str) -> Response<'_> {
    let Some((distribution, query)) = line.split_once(':') else {
        return Response::failure(line, QueryError::parse("Expected '<distribution>: <query>'"));
    };

    match Calculation::evaluate(distribution, query) {
        Ok(calculation) => {
            debug!(input = line, probability = calculation.probability, "calculated");
            Response::success(line, calculation)
        }
        Err(err) => {
            debug!(input = line, code = err.code(), "rejected");
            Response::failure(line, err)
        }
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let sig_figs = parse_sig_figs(env::var(SIG_FIGS_VAR).ok().as_deref());
    if let Err(e) = probcalc::set_sig_figs(sig_figs) {
        warn!(error = %e, "keeping default significant figures");
    }

    let stdin = io::stdin();
    info!(
        version = VERSION,
        sig_figs = probcalc::sig_figs(),
        interactive = stdin.is_terminal(),
        "probcalc started"
    );

    let mut stdout = io::stdout().lock();
    let mut processed = 0usize;

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let response = handle(line);
        match serde_json::to_string(&response) {
            Ok(json) => {
                writeln!(stdout, "{}", json)?;
                stdout.flush()?;
            }
            Err(e) => error!(input = line, error = %e, "could not serialize response"),
        }
        processed += 1;
    }

    info!(processed, "input closed");
    Ok(())
}
