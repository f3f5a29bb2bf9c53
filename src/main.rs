use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use articles_api::auth::TokenDecoder;
use articles_api::config::AppConfig;
use articles_api::database::{ArticleBackend, ArticleRepository, DatabaseManager, MemoryBackend, PgBackend};
use articles_api::{app, AppState};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreKind {
    /// PostgreSQL table reached through DATABASE_URL
    Postgres,
    /// Process-local table, lost on exit
    Memory,
}

#[derive(Parser)]
#[command(name = "articles-api")]
#[command(about = "HTTP CRUD service for articles")]
#[command(version)]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[arg(long, env = "ARTICLES_STORE", value_enum, default_value_t = StoreKind::Postgres)]
    store: StoreKind,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_JWKS_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting articles API in {:?} mode", config.environment);

    let backend: Arc<dyn ArticleBackend> = match args.store {
        StoreKind::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            let backend = PgBackend::new(pool, &config.database.table_name)?;
            backend.ensure_table().await?;
            Arc::new(backend)
        }
        StoreKind::Memory => {
            Arc::new(MemoryBackend::with_page_size(config.database.scan_page_size))
        }
    };

    let repository = ArticleRepository::new(
        backend,
        config.database.scan_page_size,
        Duration::from_millis(config.database.operation_timeout_ms),
    );
    let decoder = TokenDecoder::from_config(&config.security)
        .await
        .context("failed to initialise token verification")?;

    let app = app(AppState::new(repository, decoder), &config.api);

    let bind_addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("Articles API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
