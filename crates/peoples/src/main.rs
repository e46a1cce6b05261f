mod app;
mod cache;
mod config;
mod handlers;
#[cfg_attr(not(feature = "kafka"), allow(dead_code, unused_imports))]
mod inference;
#[cfg_attr(not(feature = "kafka"), allow(dead_code, unused_imports))]
mod pipeline;
mod queue;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use peoples_core::storage::PersonRepository;

use crate::{
    app::create_app,
    config::{AppEnv, Config},
    state::AppState,
    storage::{CachedPersonRepository, SqliteRepository},
};

/// Peoples - person records enriched with inferred age, sex and nationality
#[derive(Parser, Debug)]
#[command(name = "peoples")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        /// Host address to bind the server to
        #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
        host: String,

        /// Port to listen on
        #[arg(long, short, default_value = "8080", env = "PORT")]
        port: u16,
    },
    /// Consume enrichment requests from Kafka
    #[cfg(feature = "kafka")]
    Ingest,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    init_tracing(config.app_env);
    tracing::debug!(app_env = %config.app_env, "Configuration loaded");

    match cli.command {
        Command::Serve { host, port } => serve(config, &host, port).await,
        #[cfg(feature = "kafka")]
        Command::Ingest => ingest(config).await,
    }
}

/// Initialize the tracing subscriber for the deployment profile.
///
/// `RUST_LOG` overrides the default filter in every profile.
fn init_tracing(app_env: AppEnv) {
    let default_filter = match app_env {
        AppEnv::Prod => "peoples=info,tower_http=info",
        AppEnv::Local | AppEnv::Dev => "peoples=debug,tower_http=debug",
    };
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()));

    match app_env {
        AppEnv::Local => registry.with(fmt::layer()).init(),
        AppEnv::Dev | AppEnv::Prod => registry.with(fmt::layer().json()).init(),
    }
}

/// Build the durable store wrapped in the compiled-in cache backend.
async fn build_repository(config: &Config) -> Result<Arc<dyn PersonRepository>> {
    ensure!(
        config.db_driver == "sqlite",
        "unsupported DB_DRIVER `{}`: only `sqlite` is available",
        config.db_driver
    );

    let store = SqliteRepository::new(&config.db_url)
        .await
        .with_context(|| format!("failed to open database at {}", config.db_url))?;

    #[cfg(feature = "memory")]
    let cache = crate::cache::MemoryCache::new(config.cache_max_entries);

    #[cfg(feature = "redis")]
    let cache = crate::cache::RedisCache::new(&config.redis_url())
        .await
        .with_context(|| format!("failed to connect to Redis at {}", config.redis_address))?;

    tracing::info!(
        db = %config.db_url,
        cache_ttl_seconds = config.cache_ttl_seconds,
        "Repository ready"
    );

    Ok(Arc::new(CachedPersonRepository::new(
        Arc::new(store),
        Arc::new(cache),
        config.cache_ttl(),
    )))
}

async fn serve(config: Config, host: &str, port: u16) -> Result<()> {
    let repository = build_repository(&config).await?;
    let app = create_app(AppState::new(repository));

    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    let stop = CancellationToken::new();
    let server_stop = stop.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_stop.cancelled().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("server task panicked")??;
            tracing::info!("Server stopped");
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    stop.cancel();
    match tokio::time::timeout(config.shutdown_timeout(), server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Server stopped"),
        Ok(Ok(Err(err))) => tracing::error!(error = %err, "Server failed while shutting down"),
        Ok(Err(err)) => tracing::error!(error = %err, "Server task panicked"),
        Err(_) => tracing::error!(
            deadline = ?config.shutdown_timeout(),
            "Server did not stop before the shutdown deadline"
        ),
    }
    Ok(())
}

#[cfg(feature = "kafka")]
async fn ingest(config: Config) -> Result<()> {
    use crate::inference::{InferenceClient, InferenceEndpoints};
    use crate::pipeline::Ingester;
    use crate::queue::{KafkaConsumer, KafkaFailureProducer};

    let repository = build_repository(&config).await?;

    let consumer = KafkaConsumer::new(
        &config.kafka_address,
        &config.kafka_consumer_group,
        &config.kafka_consumer_topic,
    )
    .context("failed to create Kafka consumer")?;
    let failures = KafkaFailureProducer::new(&config.kafka_address, config.kafka_producer_topic.clone())
        .context("failed to create Kafka producer")?;

    let endpoints = InferenceEndpoints {
        age_url: config.age_api_url.clone(),
        gender_url: config.gender_api_url.clone(),
        nation_url: config.nation_api_url.clone(),
    };
    let enricher = InferenceClient::new(endpoints, config.inference_timeout())
        .context("failed to create inference client")?;

    let mut ingester = Ingester::new(
        Arc::new(consumer),
        Arc::new(failures),
        Arc::new(enricher),
        repository,
        config.poll_timeout(),
    );
    if let Some(limit) = config.ingest_max_in_flight {
        ingester = ingester.with_max_in_flight(limit);
    }

    let handle = ingester.start();
    shutdown_signal().await;

    match handle.shutdown(config.shutdown_timeout()).await {
        Ok(()) => tracing::info!("Ingestion stopped"),
        Err(err) => tracing::error!(error = %err, "Graceful shutdown failed"),
    }
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
