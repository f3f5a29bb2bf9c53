//! Request dispatcher for the articles collection.
//!
//! Both `/articles` and `/articles/:id` are bound for every method; the
//! dispatcher decides the operation from method, path id and `tag` query
//! parameter, runs the admin gate for create and delete, and renders the
//! outcome.

pub mod delete;
pub mod get;
pub mod input;
pub mod post;
pub mod put;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::app::AppState;
use crate::auth::Role;
use crate::error::ApiError;
use crate::middleware::require_role;
use crate::types::Operation;

/// Query parameters the dispatcher looks at.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub tag: Option<String>,
}

impl ArticleQuery {
    /// Reads the first `tag` value from a raw query string. Unknown or
    /// repeated parameters are ignored, so parsing never rejects a request.
    pub fn parse(raw: Option<&str>) -> Self {
        let tag = raw.and_then(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .find(|(key, _)| key == "tag")
                .map(|(_, value)| value.into_owned())
        });
        Self { tag }
    }
}

/// Everything the dispatcher needs from an inbound request.
#[derive(Debug)]
pub struct ArticleRequest {
    pub method: Method,
    pub id: Option<String>,
    pub tag: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Any method on /articles
pub async fn collection(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let tag = ArticleQuery::parse(query.as_deref()).tag;
    let request = ArticleRequest { method, id: None, tag, headers, body };
    dispatch(&state, request).await
}

/// Any method on /articles/:id
pub async fn member(
    State(state): State<AppState>,
    method: Method,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let tag = ArticleQuery::parse(query.as_deref()).tag;
    let request = ArticleRequest { method, id: Some(id), tag, headers, body };
    dispatch(&state, request).await
}

pub async fn dispatch(state: &AppState, request: ArticleRequest) -> Response {
    let operation = Operation::resolve(&request.method, request.id.is_some(), request.tag.is_some());
    debug!("Received {} request routed to {:?}", request.method, operation);

    match run(state, operation, &request).await {
        Ok(response) => response,
        Err(e) => {
            debug!("{} request failed: {}", request.method, e);
            e.into_response()
        }
    }
}

async fn run(state: &AppState, operation: Option<Operation>, request: &ArticleRequest) -> Result<Response, ApiError> {
    let operation = operation
        .ok_or_else(|| ApiError::method_not_allowed(format!("method {} not supported", request.method)))?;

    if operation.requires_admin() {
        require_role(&state.decoder, &request.headers, Role::Admin)?;
    }

    let id = request.id.as_deref();
    let response = match operation {
        Operation::List => get::list(state).await?.into_response(),
        Operation::GetByTag => get::by_tag(state, request.tag.as_deref().unwrap_or_default())
            .await?
            .into_response(),
        Operation::GetById => get::by_id(state, id.unwrap_or_default()).await?.into_response(),
        Operation::Create => post::create(state, &request.body).await?.into_response(),
        Operation::Update => put::update(state, id, &request.body).await?.into_response(),
        Operation::Delete => delete::delete(state, id).await?.into_response(),
    };
    Ok(response)
}

/// `Location` header value for a stored article.
pub fn location(id: &str) -> String {
    format!("/articles/{id}")
}
