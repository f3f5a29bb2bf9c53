use serde::Deserialize;

use crate::database::ArticleFields;
use crate::error::ApiError;

/// JSON body accepted by create and update.
///
/// Absent `Title` or `Content` keys read as empty strings so that they fail
/// validation (400) rather than parsing (422).
#[derive(Debug, Deserialize)]
pub struct ArticleInput {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Content", default)]
    pub content: String,
    #[serde(rename = "Tag", default)]
    pub tag: Option<String>,
}

impl ArticleInput {
    /// Parses and validates a request body.
    pub fn parse(body: &[u8]) -> Result<ArticleFields, ApiError> {
        let input: ArticleInput = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Can't unmarshal body: {}", e);
            ApiError::unprocessable_entity(e.to_string())
        })?;
        input.validate()?;
        Ok(input.into())
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.is_empty() {
            return Err(ApiError::bad_request("Title is required"));
        }
        if self.content.is_empty() {
            return Err(ApiError::bad_request("Content is required"));
        }
        Ok(())
    }
}

impl From<ArticleInput> for ArticleFields {
    fn from(input: ArticleInput) -> Self {
        ArticleFields {
            title: input.title,
            content: input.content,
            tag: input.tag.filter(|tag| !tag.is_empty()),
        }
    }
}
