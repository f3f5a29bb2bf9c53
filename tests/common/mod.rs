#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use articles_api::auth::TokenDecoder;
use articles_api::config::AppConfig;
use articles_api::database::{ArticleRepository, MemoryBackend};
use articles_api::{app, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serves the API in-process on a free port, backed by an in-memory table
/// whose scan pages hold at most `page_size` articles.
pub async fn spawn_server(decoder: TokenDecoder, page_size: usize) -> Result<TestServer> {
    init_tracing();
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let repository = ArticleRepository::new(
        Arc::new(MemoryBackend::with_page_size(page_size)),
        page_size,
        Duration::from_secs(5),
    );
    let router = app(AppState::new(repository, decoder), &AppConfig::development().api);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server stopped: {e}");
        }
    });

    Ok(TestServer { port, base_url })
}

// Honors RUST_LOG; output is captured per test
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Server that reads group claims without verifying signatures.
pub async fn spawn_unverified(page_size: usize) -> Result<TestServer> {
    spawn_server(TokenDecoder::InsecureUnverified, page_size).await
}

/// Token carrying the given groups, signed with a throwaway key. Only a
/// server that skips signature checks accepts it.
pub fn token_for(groups: &[&str]) -> String {
    encode(
        &Header::default(),
        &json!({ "cognito:groups": groups }),
        &EncodingKey::from_secret(b"test-only"),
    )
    .expect("encode test token")
}

pub fn admin_token() -> String {
    token_for(&["Admin"])
}

pub fn user_token() -> String {
    token_for(&["User"])
}
