//! aircraft-ingest: entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use aircraft_ingest::{Acquirer, IngestConfig, DEFAULT_FILE_LIMIT};
use aircraft_ingest_server::config::{load_env_file, resolve_listen_addr};
use aircraft_ingest_server::{HttpTransport, ServerState};

#[derive(Parser)]
#[command(
    name = "aircraft-ingest",
    about = "Acquire aircraft-tracking snapshots into object storage and stage them locally",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Path to a .env file (defaults to ./.env when present).
    #[arg(long, global = true)]
    env_file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default).
    Serve {
        /// Listen address (host:port). Also reads BDI_LISTEN_ADDR.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Run one download and print the run summary as JSON.
    Download {
        /// Limits the number of files to download.
        #[arg(long, default_value_t = DEFAULT_FILE_LIMIT, allow_negative_numbers = true)]
        file_limit: i64,
    },

    /// Stage stored snapshots into the local prepared directory.
    Prepare,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_loaded = load_env_file(cli.env_file.as_deref())?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if env_loaded {
        tracing::debug!("Loaded environment file");
    }

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let addr = resolve_listen_addr(addr.as_deref());
            let state = ServerState::from_config(IngestConfig::from_env()?)?;
            HttpTransport::new(state).run(&addr).await?;
        }

        Commands::Download { file_limit } => {
            let state = ServerState::from_config(IngestConfig::from_env()?)?;
            let summary = Acquirer::new(&state.config, &state.client, &state.store)
                .run(file_limit)
                .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Prepare => {
            let state = ServerState::from_config(IngestConfig::from_env()?)?;
            let summary = aircraft_ingest::prepare(&state.config, &state.store).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "aircraft-ingest", &mut std::io::stdout());
        }
    }

    Ok(())
}
