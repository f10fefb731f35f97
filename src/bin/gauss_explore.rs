//! Gauss Kernel Explorer Binary
//!
//! Runs one bounded exploration and prints the report as JSON on stdout.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `GAUSS_DEPTH`, `GAUSS_MAX_CHORDS`, `GAUSS_MODEL`, `GAUSS_SEED`,
//!   `GAUSS_FRONTIER`, `GAUSS_EXHAUSTIVE`, `GAUSS_R3_UNIFY`,
//!   `GAUSS_R3_UNIFY_LIMIT`, `GAUSS_AUDIT`, `GAUSS_AUDIT_LIMIT`: policy overrides
//! - `RUST_LOG`: Log level filter (default: gauss_kernel=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! Logs go to stderr.
//!
//! ## Exit status
//!
//! - `0`: consistent
//! - `1`: configuration or internal error
//! - `2`: contradiction found
//!
//! ## Usage
//!
//! ```bash
//! GAUSS_DEPTH=2 GAUSS_FRONTIER=complete LOG_FORMAT=pretty cargo run --release --bin gauss_explore
//! ```

use std::process::ExitCode;
use std::time::Instant;

use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use gauss_kernel::{explore, ExplorePolicyV1, PruneOutcome};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gauss_kernel=info,gauss_explore=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true)
            )
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Gauss explorer");

    let policy = match ExplorePolicyV1::from_env() {
        Ok(policy) => policy,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::from(1);
        }
    };

    info!(
        policy_id = %policy.policy_id(),
        params_hash = %policy.params_hash(),
        depth = policy.depth,
        max_chords = policy.max_chords,
        model = %policy.model,
        "Policy loaded"
    );

    let start = Instant::now();
    let report = match explore(&policy) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Exploration failed");
            return ExitCode::from(1);
        }
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!(error = %e, "Failed to serialize report");
            return ExitCode::from(1);
        }
    }

    match &report.outcome {
        PruneOutcome::Consistent { checks, removed } => {
            info!(checks, removed, elapsed_ms, nodes = report.stats.nodes, "Success");
            ExitCode::SUCCESS
        }
        PruneOutcome::Contradiction { code, node, .. } => {
            warn!(code = %code, node = %node, elapsed_ms, "Contradiction");
            ExitCode::from(2)
        }
    }
}
