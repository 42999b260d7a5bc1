use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod util;

#[derive(Parser)]
#[command(name = "javacc-build", about = "Generate Java sources with JavaCC and JJTree")]
struct Cli {
    /// Path to Javacc.toml (default: search upward from the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log generator arguments and source set changes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run code generation for all or the named configurations
    Generate(commands::generate::Args),
    /// Print the generator arguments of a configuration
    Args(commands::args::Args),
    /// List configurations and their output directories
    List(commands::list::Args),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let project = util::Project::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate(args) => commands::generate::run(args, &project),
        Commands::Args(args) => commands::args::run(args, &project),
        Commands::List(args) => commands::list::run(args, &project),
    }
}
