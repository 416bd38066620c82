//! livechess - DGT LiveChess command line tool.
//!
//! This is the main binary entry point. See the `livechess` library for the
//! core functionality.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use livechess::api::{autodetect, ApiClient, EBoardSerial, EBoardSource};
use livechess::constants::INITIAL_FEN;
use livechess::{Config, FeedError, FeedSession};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

/// Global allocator configured per M-MIMALLOC-APPS guideline.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// CLI
#[derive(Parser)]
#[command(name = "livechess")]
#[command(version)]
#[command(about = "DGT LiveChess command line tool")]
struct Cli {
    /// LiveChess `host:port` (overrides LIVECHESS_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List eboards
    Eboards,
    /// Watch selected eboard, printing each event as a JSON line
    Watch {
        /// Board selection by serial number, or "auto"
        #[arg(long, default_value = "auto")]
        serial: String,
        /// Board start FEN position for setup, or "none"
        #[arg(long, default_value = INITIAL_FEN)]
        start: String,
    },
}

/// Prints every eboard known to LiveChess as one JSON line.
async fn list_eboards(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let boards = client.eboards().await.context("Failed to list eboards")?;
    for board in boards {
        println!("{}", serde_json::to_string(&board)?);
    }
    Ok(())
}

/// Streams events of one eboard until the feed ends or Ctrl-C.
async fn watch(config: &Config, serial: &str, start: &str) -> Result<()> {
    let serial = if serial == "auto" {
        let client = ApiClient::from_config(config)?;
        autodetect(&client)
            .await
            .context("Watch failed to autodetect board")?
    } else {
        EBoardSerial::from(serial)
    };

    let quit = CancellationToken::new();
    tokio::spawn({
        let quit = quit.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Interrupted");
                quit.cancel();
            }
        }
    });

    let connected = tokio::select! {
        res = FeedSession::connect(config.ws_url(), serial.clone()) => res,
        () = quit.cancelled() => return Ok(()),
    };
    let (mut session, mut events) =
        connected.with_context(|| format!("Watch {serial} failed"))?;

    if start != "none" {
        match session.setup(&quit, start).await {
            Ok(()) => {}
            Err(FeedError::Cancelled) => {
                session.close().await;
                return Ok(());
            }
            Err(e) => {
                if e.is_fatal() {
                    log::warn!("Feed for eboard {} lost during setup", serial);
                }
                session.close().await;
                return Err(e).with_context(|| format!("Failed to setup {start}"));
            }
        }
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => println!("{}", serde_json::to_string(&event)?),
                None => {
                    log::warn!("Feed for eboard {} closed", serial);
                    break;
                }
            },
            () = quit.cancelled() => break,
        }
    }

    session.close().await;
    Ok(())
}

fn init_logging() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp_secs();

    // Stdout carries JSON lines; logs go to stderr or LIVECHESS_LOG_FILE
    if let Ok(path) = std::env::var("LIVECHESS_LOG_FILE") {
        let log_file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create log file at {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }

    match cli.command {
        Commands::Eboards => list_eboards(&config).await?,
        Commands::Watch { serial, start } => watch(&config, &serial, &start).await?,
    }

    Ok(())
}
