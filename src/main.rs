//! Linkdigest CLI - summarise articles, videos and PDFs by URL
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{Parser, Subcommand};
use colored::Colorize;
use linkdigest::{classify, server, Config, Pipeline};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "linkdigest")]
#[command(author, version, about = "Summarise web articles, videos and PDFs by URL", long_about = None)]
struct Cli {
    /// Path to a configuration file (defaults to linkdigest.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise the content behind a URL
    Summarise {
        /// URL to summarise
        url: String,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
    },
    /// Print the source kind a URL is classified as
    Classify {
        url: String,
    },
    /// Serve the summarize endpoint over HTTP
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkdigest=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Summarise { url, raw } => {
            let pipeline = Pipeline::from_config(&config)?;

            if raw {
                let extracted = pipeline.extract(&url).await?;
                println!("\n=== {} ({}) ===\n", url.bold(), extracted.kind);
                println!("{}", extracted.text);
                println!(
                    "\n--- Extracted {} characters ---",
                    extracted.text.chars().count()
                );
            } else {
                println!("Summarising {} ({})...\n", url, classify(&url));
                let summary = pipeline.summarize_url(&url).await?;

                println!("{}", "💡 Summary:".bold().green());
                println!("  {}", summary.summary);
            }
        }
        Commands::Classify { url } => {
            println!("{}", classify(&url));
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr: SocketAddr = format!("{host}:{port}").parse()?;

            let pipeline = Pipeline::from_config(&config)?;
            server::start_server(pipeline, addr).await?;
        }
    }

    Ok(())
}
