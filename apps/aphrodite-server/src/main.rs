//! aphrodite HTTP server.
//!
//! - `APHRODITE_CONFIG`: engine configuration file (default: search `configs/aphrodite.toml`)
//! - `APHRODITE_PROVIDER`: `swiss` (default) or `analytic`
//! - `SWISS_EPHEMERIS_PATH`: ephemeris data directory when neither `--ephemeris-path`
//!   nor `[ephemeris] path` is set
//! - `HOST`: bind host (default: 0.0.0.0)
//! - `PORT`: bind port (default: 8080)
//! - `RUST_LOG`: log filter (default: info)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use aphrodite::ephemeris::{AnalyticEphemeris, SwissEphemeris};
use aphrodite::EngineConfig;
use aphrodite_server::{create_router, AppState, SharedProvider};
use clap::{Parser, ValueEnum};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderKind {
    /// Swiss Ephemeris data files
    Swiss,
    /// Built-in low-precision theory, for running without data files
    Analytic,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Engine configuration (TOML)
    #[arg(long, env = "APHRODITE_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, env = "APHRODITE_PROVIDER", default_value_t = ProviderKind::Swiss)]
    provider: ProviderKind,

    /// Swiss Ephemeris data directory, overrides `[ephemeris] path`
    #[arg(long)]
    ephemeris_path: Option<PathBuf>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Number of built charts kept for lookup by id
    #[arg(long, default_value_t = 1024)]
    chart_cache: usize,
}

fn open_provider(args: &Args, config: &EngineConfig) -> anyhow::Result<SharedProvider> {
    match args.provider {
        ProviderKind::Swiss => {
            let path = args
                .ephemeris_path
                .clone()
                .or_else(|| config.ephemeris.path.clone());
            let swiss = SwissEphemeris::new(path).context(
                "Swiss Ephemeris data unavailable (pass --provider analytic to run without it)",
            )?;
            let provider: SharedProvider = Arc::new(swiss);
            Ok(provider)
        }
        ProviderKind::Analytic => {
            warn!("Using the analytic ephemeris; Moon positions are good to a few tenths of a degree");
            let provider: SharedProvider = Arc::new(AnalyticEphemeris::new());
            Ok(provider)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (path, config) = match &args.config {
        Some(path) => (
            path.clone(),
            EngineConfig::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
        ),
        None => EngineConfig::discover().context("Failed to load engine configuration")?,
    };
    info!(
        "Loaded {} ({} bodies, {} aspect kinds)",
        path.display(),
        config.bodies.len(),
        config.aspects.rules().len()
    );

    let provider = open_provider(&args, &config)?;
    let state = AppState::new(provider, &config, args.chart_cache)
        .context("Configuration cannot serve comparisons")?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
