mod cli;
mod prompt;

use anyhow::Result;
use cli::{Cli, Commands};
use jdfix_core::Config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting jdfix");

    match cli.command {
        Commands::Fix { root, yes, config } => {
            handle_fix_command(root, yes, config)?;
        }
        Commands::Index { root, config } => {
            handle_index_command(root, config)?;
        }
    }

    info!("jdfix completed successfully");
    Ok(())
}

fn handle_fix_command(root: PathBuf, yes: bool, config_path: Option<PathBuf>) -> Result<()> {
    let root = validate_root(root)?;
    let config = Config::discover(&root, config_path.as_deref())?;

    info!("Root directory: {:?}", root);
    info!("Auto-approve: {}", yes);
    info!("Wiki link updates: {}", config.update_wiki_links);

    let report = if yes {
        jdfix_core::fix_tree(&root, &config)?
    } else {
        jdfix_core::fix_tree_interactive(&root, &config, |proposal, siblings| {
            prompt::confirm_rename(proposal, siblings)
        })?
    };

    if report.aborted {
        println!("Run stopped at the operator's request.");
        println!("  Renames applied before stopping: {}", report.renames_applied);
        return Ok(());
    }

    let index_files = jdfix_core::generate_index_files(&root, &config)?;

    println!("Index repair complete!");
    println!("  Files scanned: {}", report.files_scanned);
    println!("  Renames proposed: {}", report.renames_proposed);
    println!("  Renames applied: {}", report.renames_applied);
    if config.update_wiki_links {
        println!("  References updated: {}", report.references_updated);
    }
    println!("  Index files written: {index_files}");

    Ok(())
}

fn handle_index_command(root: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let root = validate_root(root)?;
    let config = Config::discover(&root, config_path.as_deref())?;

    info!("Root directory: {:?}", root);

    let index_files = jdfix_core::generate_index_files(&root, &config)?;

    println!("Index files updated!");
    println!("  Index files written: {index_files}");

    Ok(())
}

fn validate_root(root: PathBuf) -> Result<PathBuf> {
    let root = std::path::absolute(&root)?;

    if !root.exists() {
        anyhow::bail!("Root directory does not exist: {:?}", root);
    }

    if !root.is_dir() {
        anyhow::bail!("Root must be a directory: {:?}", root);
    }

    Ok(root)
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .with(filter)
        .init();

    Ok(())
}
