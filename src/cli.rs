use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config;
use crate::router::RouteOutcome;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Route table inspection CLI", long_about = None)]
pub struct Cli {
    /// Verbose diagnostics (sets the log filter to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a routes file and report what it registers
    Check {
        /// Routes file (.yaml, .yml or .json)
        config: PathBuf,
    },
    /// Print the compiled route table
    Routes {
        /// Routes file (.yaml, .yml or .json)
        config: PathBuf,
    },
    /// Match a path against a routes file
    Match {
        /// Routes file (.yaml, .yml or .json)
        config: PathBuf,
        /// Request path, e.g. /Forum/Show/123
        path: String,
    },
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Check { config: file } => {
            let table = config::load_table(&file.to_string_lossy())?;
            println!(
                "✅ {} route(s), {} ignore(s)",
                table.len(),
                table.ignore_count()
            );
        }
        Commands::Routes { config: file } => {
            let table = config::load_table(&file.to_string_lossy())?;
            table.dump();
        }
        Commands::Match {
            config: file,
            path,
        } => {
            let table = config::load_table(&file.to_string_lossy())?;
            match table.recognize(path) {
                RouteOutcome::Matched(matched) => {
                    let mut values: Vec<String> = matched
                        .values
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect();
                    values.sort();
                    println!("✅ {} → {} | {}", path, matched.route.name, values.join(" "));
                }
                RouteOutcome::Ignored => {
                    println!("⏭ {} → ignored", path);
                }
                RouteOutcome::NoMatch => {
                    println!("❌ {} → no match", path);
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
