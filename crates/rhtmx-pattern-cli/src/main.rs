mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "rhtmx-pattern")]
#[command(version, about = "Check, match and resolve route templates", long_about = None)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile templates and show their expression and parameters
    Check {
        /// Route templates, e.g. "/users/{id:int}"
        #[arg(required = true)]
        templates: Vec<String>,
    },

    /// Match a path against a template and print the parameters as JSON
    Match {
        template: String,
        path: String,
    },

    /// Build a path from NAME=VALUE pairs (repeat a name to pass a list)
    Resolve {
        template: String,
        values: Vec<String>,
    },

    /// Match a path against the routes of a configuration file
    Route {
        /// Routes file (TOML)
        #[arg(short, long, default_value = "routes.toml")]
        config: PathBuf,

        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { templates } => commands::check::execute(&templates)?,
        Commands::Match { template, path } => commands::matches::execute(&template, &path)?,
        Commands::Resolve { template, values } => commands::resolve::execute(&template, &values)?,
        Commands::Route { config, path } => commands::route::execute(&config, &path)?,
    }

    Ok(())
}
