//! simprov CLI — identify the simulators and interpreters behind a run.

mod commands;
mod settings;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "simprov", version, about = "Simulation provenance: program identification")]
struct Cli {
    /// Configuration file (default: nearest simprov.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify a program by executable path, script file, or registered name
    Identify {
        /// Path to an executable
        path: Option<PathBuf>,
        /// Script file whose extension selects the program
        #[arg(long, conflicts_with = "name")]
        script: Option<PathBuf>,
        /// Registered program name (e.g., NEURON, Python, NEST)
        #[arg(long, conflicts_with_all = ["path", "script"])]
        name: Option<String>,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List registered programs
    Programs,
    /// Check discovery of every registered program
    Doctor,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simprov=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = settings::Settings::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Identify {
            path,
            script,
            name,
            format,
        } => {
            let query = match name {
                Some(name) => commands::identify::Query::Name(name),
                None => commands::identify::Query::Resolve { path, script },
            };
            commands::identify::run(&settings, query, &format)
        }
        Commands::Programs => commands::programs::run(&settings),
        Commands::Doctor => commands::doctor::run(&settings),
    }
}
