//! skillkit CLI binary entry point.

mod cli;
mod errors;

use std::io;

use clap::Parser;
use skillkit::error::SkillError;
use tracing_subscriber::EnvFilter;

use cli::prompt::LinePrompt;
use cli::skills::{self as handlers, BatchReport, CliResult};
use cli::{Cli, Commands};

const LOG_ENV: &str = "SKILLKIT_LOG";

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) if report.is_success() => {}
        Ok(report) => {
            if report.succeeded + report.failed > 1 {
                eprintln!("{} of {} failed", report.failed, report.succeeded + report.failed);
            }
            std::process::exit(1);
        }
        Err(e) => {
            // Try to downcast to SkillError for actionable help text
            let message = if let Some(skill_err) = e.downcast_ref::<SkillError>() {
                errors::format_error_help(skill_err)
            } else {
                format!("{e}")
            };
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<BatchReport> {
    let store = skillkit::default_config_store();
    let manager = skillkit::default_manager()?;
    let mut stdout = io::stdout().lock();
    tracing::debug!(command = ?cli.command, "dispatching command");

    match cli.command {
        Commands::Add(args) => {
            let mut prompt = LinePrompt::stdio();
            handlers::handle_add(&manager, &store, &mut prompt, &args, &mut stdout).await
        }
        Commands::Remove(args) => handlers::handle_remove(&manager, &store, &args, &mut stdout),
        Commands::List => {
            handlers::handle_list(&manager, &mut stdout)?;
            Ok(BatchReport::default())
        }
        Commands::Show(args) => handlers::handle_show(&manager, &args.name, &mut stdout),
        Commands::Config => {
            let mut prompt = LinePrompt::stdio();
            handlers::handle_config(&store, &mut prompt, &mut stdout)?;
            Ok(BatchReport::default())
        }
        Commands::Catalog => {
            handlers::handle_catalog(&manager, &mut stdout).await?;
            Ok(BatchReport::default())
        }
    }
}
