use clap::Parser;
use report_cli::cli::Cli;
use report_core::config::load_config_with_fallback;
use report_core::error::AppError;
use report_core::report_api::{RunOutcome, generate_reports};
use report_core::storage::report_store::StoreOutcome;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    // RUST_LOG wins when it parses; otherwise warnings and errors only.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn outcome_label(outcome: &StoreOutcome) -> &'static str {
    match outcome {
        StoreOutcome::Created => "created",
        StoreOutcome::Replaced { .. } => "replaced",
        StoreOutcome::Overwritten => "overwritten",
    }
}

fn print_summary_plain(outcome: &RunOutcome) {
    for report in &outcome.reports {
        match &report.outcome {
            StoreOutcome::Replaced { archive } => println!(
                "{} | {} | {} (previous kept as {})",
                report.username,
                outcome_label(&report.outcome),
                report.path.display(),
                archive.display()
            ),
            other => println!(
                "{} | {} | {}",
                report.username,
                outcome_label(other),
                report.path.display()
            ),
        }
    }
    for failure in &outcome.failures {
        eprintln!("ERROR: {}: {}", failure.username, failure.error);
    }
    println!(
        "Reports written: {}, users skipped: {}, failures: {}",
        outcome.reports.len(),
        outcome.skipped_users,
        outcome.failures.len()
    );
}

fn print_summary_json(outcome: &RunOutcome) {
    let reports: Vec<serde_json::Value> = outcome
        .reports
        .iter()
        .map(|report| {
            serde_json::json!({
                "user_id": report.user_id,
                "username": report.username,
                "path": report.path.display().to_string(),
                "store": report.outcome,
            })
        })
        .collect();
    let failures: Vec<serde_json::Value> = outcome
        .failures
        .iter()
        .map(|failure| {
            serde_json::json!({
                "username": failure.username,
                "code": failure.error.code(),
                "message": failure.error.message(),
            })
        })
        .collect();
    let fetch_errors: Vec<serde_json::Value> = outcome
        .fetch_errors
        .iter()
        .map(|error| {
            serde_json::json!({
                "code": error.code(),
                "message": error.message(),
            })
        })
        .collect();

    let json = serde_json::json!({
        "reports": reports,
        "skipped_users": outcome.skipped_users,
        "failures": failures,
        "fetch_errors": fetch_errors,
    });
    println!("{}", json);
}

fn run(cli: &Cli) -> Result<RunOutcome, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(error = %err, "using default configuration");
    }
    let config = cli.resolve_config(&loaded.config)?;
    generate_reports(&config)
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    match run(&cli) {
        Ok(outcome) => {
            if cli.json {
                print_summary_json(&outcome);
            } else {
                print_summary_plain(&outcome);
            }
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    }
}
