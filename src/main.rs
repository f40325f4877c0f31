use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use pcguide::aggregator::Aggregator;
use pcguide::api::create_router;
use pcguide::config::{CONFIG, Config};
use pcguide::query::SearchRequest;

#[derive(Parser)]
#[command(name = "pcguide", version, about = "Find installation guides for PC components")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the search API and the static UI (default)
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Run a single search and print the results
    Search {
        #[arg(long)]
        component_type: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: Option<String>,
        /// Print the raw JSON envelope
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut config: Config = CONFIG.clone();
    config.validate()?;

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        static_dir: None,
    }) {
        Command::Serve { port, static_dir } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(static_dir) = static_dir {
                config.static_dir = static_dir;
            }
            serve(config).await
        }
        Command::Search {
            component_type,
            brand,
            model,
            json,
        } => {
            let request = SearchRequest::new(&component_type, &brand, model.as_deref());
            search_once(&config, request, json).await
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if config.youtube.api_key.is_none() {
        tracing::warn!("YOUTUBE_API_KEY not set, video results are disabled");
    }

    let aggregator = Aggregator::from_config(&config).context("failed to build sources")?;
    let app = create_router(Arc::new(aggregator), &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, static_dir = %config.static_dir.display(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn search_once(config: &Config, request: SearchRequest, json: bool) -> anyhow::Result<()> {
    let aggregator = Aggregator::from_config(config).context("failed to build sources")?;
    let response = aggregator.search(&request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.query);
    for item in response.items() {
        println!("{}", item.summary_line());
    }
    Ok(())
}
