//! Map tile server.
//!
//! Serves slippy-map PNG tiles of a 2D scalar field, a map page and a field
//! catalog.

use anyhow::{Context, Result};
use clap::Parser;
use std::{env, net::SocketAddr, sync::Arc};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dataset::{Dataset, InMemoryDataset};
use map_server::config::Args;
use map_server::state::AppState;

/// Refinement levels of the synthetic dataset when no dataset is given.
const DEFAULT_SYNTHETIC_LEVELS: u32 = 4;

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    } else if let Ok(threads_str) = env::var("TOKIO_WORKER_THREADS") {
        if let Ok(threads) = threads_str.parse::<usize>() {
            runtime_builder.worker_threads(threads);
        }
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))?;
    Ok(())
}

async fn async_main(args: Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let config = args.resolve()?;
    let dataset = load_dataset(&args)?;
    info!(
        field = %config.default_field,
        colormap = %config.default_colormap,
        take_log = config.take_log,
        tile_size = config.tile_size,
        route_prefix = %config.route_prefix,
        "Starting map server"
    );

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen))?;

    let state = Arc::new(AppState::new(config, dataset)?.with_prometheus(prometheus_handle));
    let app = map_server::build_router(state);

    info!(address = %addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn load_dataset(args: &Args) -> Result<Box<dyn Dataset>> {
    if let Some(path) = &args.dataset {
        let dataset = InMemoryDataset::from_file(path)
            .with_context(|| format!("Failed to load dataset {}", path.display()))?;
        return Ok(Box::new(dataset));
    }
    let levels = args.synthetic.unwrap_or(DEFAULT_SYNTHETIC_LEVELS);
    info!(levels, "Serving synthetic dataset");
    Ok(Box::new(dataset::synthetic(levels)?))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
