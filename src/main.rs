//! git-aicommit - CLI entry point.

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use git_aicommit::commit::{Outcome, run_workflow};
use git_aicommit::config::{init_config, load_config};
use git_aicommit::error::{ConfigError, EXIT_FAILURE, EXIT_INTERRUPTED, WorkflowError};
use git_aicommit::git::{ExcludePatterns, GitRepository};
use git_aicommit::llm::provider_from_settings;
use git_aicommit::terminal::ConsoleTerminal;

/// Generate commit messages for staged changes using an LLM.
#[derive(Parser, Debug)]
#[command(name = "git-aicommit")]
#[command(about = "Generate commit messages for staged changes using an LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Include lockfiles (package-lock.json, *.lock, ...) in the diff
    #[arg(long)]
    include_lockfiles: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a sample aicommit.yml in the current directory
    Init,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // SIGINT outside of raw-mode key reads ends the process immediately.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
    });

    match cli.command {
        Some(Command::Init) => match run_init() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report_error(&format!("{:#}", e));
                ExitCode::from(EXIT_FAILURE)
            }
        },
        None => run_commit(cli.include_lockfiles).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "git_aicommit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_init() -> Result<()> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let path = init_config(&cwd)?;
    println!(
        "{} {}",
        style("Configuration file created:").green().bold(),
        path.display()
    );
    Ok(())
}

async fn run_commit(include_lockfiles: bool) -> ExitCode {
    match commit_staged(include_lockfiles).await {
        Ok(Outcome::Aborted) => {
            println!("Aborted commit.");
            ExitCode::from(Outcome::Aborted.exit_code())
        }
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(WorkflowError::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            report_error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn commit_staged(include_lockfiles: bool) -> Result<Outcome, WorkflowError> {
    let cwd = env::current_dir().map_err(|source| ConfigError::Read {
        path: ".".into(),
        source,
    })?;

    let settings = load_config(&cwd)?;
    let provider = provider_from_settings(&settings);
    let repo = GitRepository::discover(&cwd)?;

    let exclude = if include_lockfiles {
        ExcludePatterns::none()
    } else {
        ExcludePatterns::default_lockfiles()
    };
    debug!("Exclude patterns: {:?}", exclude.patterns());

    let terminal = ConsoleTerminal::new();
    run_workflow(&repo, &provider, &terminal, &exclude).await
}

fn report_error(message: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}
