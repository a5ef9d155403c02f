//! Sonar contract harness - CLI entry point.
//!
//! Points the built-in cost-manager contract suite at a target service,
//! runs it, and writes the report to the selected sink.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use sonar::contract_suite;
use sonar_application::{Invoker, Runner, RunnerOptions};
use sonar_infrastructure::{ReqwestTransport, TextReporter};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "sonar",
    about = "Contract-verification harness for the cost-manager API"
)]
struct Args {
    /// Base URL of the target service, e.g. https://host/api
    #[arg(env = "SONAR_BASE_URL")]
    base_url: Url,

    /// Write the run report to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Stop after the first case that does not pass
    #[arg(long)]
    fail_fast: bool,

    /// Per-call timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "run did not complete");
            ExitCode::FAILURE
        }
    }
}

/// Runs the suite; returns whether every case passed.
async fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let now = Utc::now();
    let registry = contract_suite(now.year(), now.month())?;

    tracing::info!(
        base_url = %args.base_url,
        cases = registry.len(),
        "starting contract run"
    );

    let transport = ReqwestTransport::with_timeout(Duration::from_secs(args.timeout_secs))?;
    let invoker = Invoker::new(Arc::new(transport), args.base_url);
    let runner = Runner::new(invoker).with_options(RunnerOptions {
        fail_fast: args.fail_fast,
    });

    let report = runner.run(&registry).await;
    let summary = report.summary();

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    TextReporter::new(sink).finalize(&report)?;

    if let Some(path) = &args.output {
        tracing::info!(path = %path.display(), "report written");
    }
    tracing::info!(summary = %summary.line(), "contract run finished");

    Ok(summary.failed == 0 && summary.errored == 0)
}
