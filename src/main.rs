use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use litmus::config::{Config, OracleBackend};
use litmus::models::ContentRecord;
use litmus::oracle::{NoopOracle, RemoteOracle, SemanticOracle};
use litmus::probe::HeuristicProbe;
use litmus::service::AnalysisService;

/// Litmus: content quality and fraud risk assessment for creator platforms.
///
/// Scores content on engagement, educational value, creativity, safety,
/// and production quality, and screens it for fraud signals — before it
/// reaches the monetization pipeline.
#[derive(Parser)]
#[command(name = "litmus", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP analysis service
    Serve {
        /// Port to listen on (overrides LITMUS_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (overrides LITMUS_BIND)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Assess a single content record from a JSON file
    Analyze {
        /// Path to a JSON content record
        file: PathBuf,
    },

    /// Show service configuration status
    Status,
}

fn build_service(config: &Config) -> Result<Arc<AnalysisService>> {
    let oracle: Arc<dyn SemanticOracle> = match config.oracle_backend {
        OracleBackend::Remote => Arc::new(RemoteOracle::new(
            config.oracle_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.oracle_timeout,
        )?),
        OracleBackend::Disabled => Arc::new(NoopOracle),
    };

    let service = AnalysisService::new(Arc::new(HeuristicProbe), oracle, config.cache_ttl)?;
    Ok(Arc::new(service))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("litmus=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let service = build_service(&config)?;

            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());

            if config.oracle_backend == OracleBackend::Disabled {
                info!("no OPENAI_API_KEY set; semantic features run with defaults");
            }

            litmus::web::run_server(config, service, port, &bind).await?;
        }

        Commands::Analyze { file } => {
            let config = Config::load()?;
            let service = build_service(&config)?;

            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let record: ContentRecord = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {} as a content record", file.display()))?;

            let assessment = service
                .analyze(&record)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            litmus::output::display_assessment(&assessment);
        }

        Commands::Status => {
            let config = Config::load()?;

            println!("\n{}", "=== Litmus Status ===".bold());
            println!("  Bind address: {}:{}", config.bind, config.port);
            println!("  Cache TTL: {}s", config.cache_ttl.as_secs());
            match config.oracle_backend {
                OracleBackend::Remote => {
                    println!("  Semantic oracle: {}", "configured".green());
                    println!("    Endpoint: {}", config.oracle_url);
                    println!("    Model: {}", config.openai_model);
                    println!("    Timeout: {}s", config.oracle_timeout.as_secs());
                }
                OracleBackend::Disabled => {
                    println!("  Semantic oracle: {}", "not configured".yellow());
                    println!(
                        "    {}",
                        "Set OPENAI_API_KEY to enable semantic features.".dimmed()
                    );
                }
            }
            println!();
        }
    }

    Ok(())
}
