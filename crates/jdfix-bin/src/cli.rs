use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jdfix")]
#[command(version)]
#[command(about = "Keep a Johnny-Decimal file tree consistently numbered")]
#[command(
    long_about = "A CLI tool that classifies every name in a hierarchically indexed directory tree, renumbers indexes so each one agrees with its parent and its position among siblings, and regenerates the markdown index files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Repair indexes under a root directory, then refresh its index files")]
    Fix {
        #[arg(help = "Root of the indexed tree")]
        root: PathBuf,

        #[arg(long, help = "Approve every proposed rename without prompting")]
        yes: bool,

        #[arg(long, help = "Path to a config file (defaults to <root>/.jdfix.yaml)")]
        config: Option<PathBuf>,
    },

    #[command(about = "Regenerate the markdown index files without touching any name")]
    Index {
        #[arg(help = "Root of the indexed tree")]
        root: PathBuf,

        #[arg(long, help = "Path to a config file (defaults to <root>/.jdfix.yaml)")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
