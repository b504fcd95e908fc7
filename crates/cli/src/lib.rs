mod graph;
mod scan;

use beanscope_core::logging::{LoggingConfig, init_logging_with};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "beanscope",
    version,
    about = "Dependency-ordered bean discovery over deployment archive graphs",
    long_about = "Beanscope loads a deployment descriptor describing archives, their class-loading \
                  scopes and which archives can see each other, then scans every archive after the \
                  archives it depends on and reports the candidate bean classes each one owns."
)]
pub struct Cli {
    /// Directory for log files (defaults to $BEANSCOPE_LOG_DIR or ~/.beanscope/logs)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan every archive of a deployment and report candidate classes
    #[command(
        long_about = "Builds the archive graph from a JSON deployment descriptor, scans every \
                            archive in dependency order and prints the owned candidate classes."
    )]
    Scan {
        /// Path to the deployment descriptor
        #[arg(value_name = "DESCRIPTOR")]
        descriptor: PathBuf,
        /// Print the full discovery report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the archive graph without scanning it
    Graph {
        /// Path to the deployment descriptor
        #[arg(value_name = "DESCRIPTOR")]
        descriptor: PathBuf,
    },
    /// Print the JSON schema of deployment descriptors
    Schema,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        dir: cli.log_dir.clone(),
        to_stderr: true,
        ..Default::default()
    };
    let _guard = init_logging_with("cli", &logging);

    match cli.command {
        Commands::Scan { descriptor, json } => scan::run(&descriptor, json),
        Commands::Graph { descriptor } => graph::run(&descriptor),
        Commands::Schema => {
            let schema = beanscope_core::DeploymentDescriptor::schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}
