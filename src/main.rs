//! EduAutoFE - Main Entry Point

use clap::Parser;
use eduautofe::cli::{cmd_demo, cmd_search, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eduautofe=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search { data, target, max_results, max_minutes, seed, output } => {
            cmd_search(&data, &target, max_results, max_minutes, seed, output.as_deref())?;
        }
        Commands::Demo { task, seed } => {
            cmd_demo(task, seed)?;
        }
    }

    Ok(())
}
