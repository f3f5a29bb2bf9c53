use axum::http::Method;
use tracing::debug;

use crate::app::AppState;
use crate::database::Article;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /articles
pub async fn list(state: &AppState) -> ApiResult<Vec<Article>> {
    debug!("Received GET articles request");
    let articles = state.repository.list().await?;
    debug!("Successfully fetched {} articles", articles.len());
    Ok(ApiResponse::success(Method::GET, articles))
}

/// GET /articles/:id
pub async fn by_id(state: &AppState, id: &str) -> ApiResult<Article> {
    debug!("Received GET article request with ID = {}", id);
    let article = state
        .repository
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("article {id}")))?;
    Ok(ApiResponse::success(Method::GET, article))
}

/// GET /articles?tag=
pub async fn by_tag(state: &AppState, tag: &str) -> ApiResult<Article> {
    debug!("Received GET article request with Tag = {}", tag);
    let article = state
        .repository
        .find_by_tag(tag)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("article tagged {tag}")))?;
    Ok(ApiResponse::success(Method::GET, article))
}
