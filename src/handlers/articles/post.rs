use axum::http::Method;
use tracing::info;

use crate::app::AppState;
use crate::database::Article;
use crate::middleware::{ApiResponse, ApiResult};

use super::input::ArticleInput;
use super::location;

/// POST /articles - the admin gate has already run.
pub async fn create(state: &AppState, body: &[u8]) -> ApiResult<Article> {
    let fields = ArticleInput::parse(body)?;
    let article = state.repository.create(fields).await?;
    info!("Inserted new article {}", article.id);

    let location = location(&article.id);
    Ok(ApiResponse::created(Method::POST, article).with_location(location))
}
