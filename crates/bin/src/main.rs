use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod document;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("docmodel=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Mask(args) => commands::mask::run(args, cli.format),
        Commands::Get(args) => commands::get::run(args, cli.format),
        Commands::Set(args) => commands::edit::set(args, cli.format),
        Commands::Delete(args) => commands::edit::delete(args, cli.format),
        Commands::Merge(args) => commands::merge::run(args, cli.format),
    }
}
