//! The `hawser` command line: apply a service definition file against a
//! swarm-enabled docker daemon.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use hawser::{Docker, Error, Reconciler, ServiceDefinition};

#[derive(Parser)]
#[command(name = "hawser", version, about = "Reconcile docker swarm services against declared state")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Converge a service towards a definition file
    Apply {
        /// Path to the YAML service definition
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        /// Report the action without issuing any mutating call
        #[arg(long)]
        dry_run: bool,
        /// Emit the full outcome as JSON instead of a one-line message
        #[arg(long)]
        json: bool,
        /// Docker host address (unix://, tcp:// or http://); defaults to the
        /// local daemon
        #[arg(long)]
        host: Option<String>,
    },
}

async fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Apply {
            file,
            dry_run,
            json,
            host,
        } => {
            let definition = ServiceDefinition::load(&file)?;
            let docker = match host {
                Some(host) => Docker::connect_with_host(&host)?,
                None => Docker::connect_with_local_defaults()?,
            };
            let outcome = Reconciler::new(docker)
                .dry_run(dry_run)
                .converge(&definition)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{} (changed: {})", outcome.message, outcome.changed);
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("hawser: {err}");
        process::exit(1);
    }
}
