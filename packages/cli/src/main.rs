mod commands;
mod config;
mod script;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{init, run, InitArgs, RunArgs};
use tracing_subscriber::EnvFilter;

/// Studio CLI - replay edit scripts against the visual editor core
#[derive(Parser, Debug)]
#[command(name = "studio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log editor activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new studio project
    Init(InitArgs),

    /// Replay an edit script and print the resulting document
    Run(RunArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Run(args) => run(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
