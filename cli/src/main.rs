//! CLI for the GitHub Repository Searcher.
//!
//! Scans every repository of the given organizations for workflow files
//! containing the target strings and records matches in an hourly log file.

use chrono::Utc;
use clap::Parser;
use github_repo_searcher::{
    log_file_name, ConsoleReporter, FileMatchLog, RunSummary, Runner, RunnerConfig,
    RunnerError, DEFAULT_API_URL, DEFAULT_SEARCH_STRING,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// GitHub Repository Searcher - Find workflow files containing target strings across organizations.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_URL", default_value = DEFAULT_API_URL)]
    url: String,

    /// Organizations to scan.
    #[arg(long, num_args = 1..)]
    orgs: Vec<String>,

    /// Strings to search for in workflow files.
    #[arg(long, num_args = 1.., default_values_t = [DEFAULT_SEARCH_STRING.to_string()])]
    strings: Vec<String>,

    /// Directory the match log is written to.
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();
    install_crypto_provider();

    // Parse arguments
    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::from(0)
        }
        Err(RunnerError::Config(e)) => {
            // Printed directly so it survives RUST_LOG=off
            eprintln!("{e}");
            ExitCode::from(1)
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Installs aws-lc-rs as the process-wide rustls crypto provider.
///
/// octocrab enables rustls' ring backend while this binary enables aws-lc-rs,
/// so rustls cannot pick a provider on its own.
fn install_crypto_provider() {
    // Only fails when a provider is already installed
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output) on stderr, keeping the
///   transcript on stdout readable
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    // Validate before touching the network or the filesystem
    let config = RunnerConfig::new(&args.token, &args.url, args.orgs, args.strings)?;

    let log_path = args.log_dir.join(log_file_name(Utc::now()));
    let mut log = FileMatchLog::open(&log_path).map_err(|e| RunnerError::Log {
        path: log_path.display().to_string(),
        source: e,
    })?;
    info!(path = %log.path().display(), "Recording matches");

    let runner = Runner::new(config)?;
    let mut reporter = ConsoleReporter::stdout();
    Ok(runner.run(&mut reporter, &mut log).await)
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Organizations scanned: {}", summary.organizations_scanned);
    if summary.organizations_failed > 0 {
        println!("  Organizations failed: {}", summary.organizations_failed);
    }
    println!("  Repositories scanned: {}", summary.repositories_scanned);
    println!("  Empty repositories: {}", summary.empty_repositories);
    println!(
        "  Repositories with matches: {}",
        summary.repositories_with_matches
    );
    println!("  Files matched: {}", summary.files_matched);
}
