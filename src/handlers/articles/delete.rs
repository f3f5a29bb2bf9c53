use axum::http::Method;
use tracing::info;

use crate::app::AppState;
use crate::database::Article;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// DELETE /articles/:id - the admin gate has already run.
pub async fn delete(state: &AppState, id: Option<&str>) -> ApiResult<Article> {
    let id = id.ok_or_else(|| ApiError::bad_request("article id is required"))?;

    let article = state
        .repository
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("article {id}")))?;
    info!("Deleted article {}", article.id);

    Ok(ApiResponse::success(Method::DELETE, article))
}
