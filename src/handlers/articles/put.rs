use axum::http::Method;
use tracing::info;

use crate::app::AppState;
use crate::database::Article;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::input::ArticleInput;
use super::location;

/// PUT /articles/:id
pub async fn update(state: &AppState, id: Option<&str>, body: &[u8]) -> ApiResult<Article> {
    let id = id.ok_or_else(|| ApiError::bad_request("article id is required"))?;
    let fields = ArticleInput::parse(body)?;

    let article = state
        .repository
        .update(id, fields)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("article {id}")))?;
    info!("Updated article {}", article.id);

    let location = location(&article.id);
    Ok(ApiResponse::success(Method::PUT, article).with_location(location))
}
