use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::TokenDecoder;
use crate::config::ApiConfig;
use crate::database::ArticleRepository;
use crate::handlers;

/// Long-lived handles shared by all requests. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub repository: ArticleRepository,
    pub decoder: Arc<TokenDecoder>,
}

impl AppState {
    pub fn new(repository: ArticleRepository, decoder: TokenDecoder) -> Self {
        Self {
            repository,
            decoder: Arc::new(decoder),
        }
    }
}

pub fn app(state: AppState, config: &ApiConfig) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/articles", any(handlers::articles_collection))
        .route("/articles/:id", any(handlers::articles_member))
        .layer(DefaultBodyLimit::max(config.max_request_size_bytes))
        .with_state(state);

    if config.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
