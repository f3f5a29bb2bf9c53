use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single article as stored in the articles table.
///
/// `id` is assigned once by the repository at creation time and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Article {
    pub fn new(id: impl Into<String>, fields: ArticleFields) -> Self {
        Self {
            id: id.into(),
            title: fields.title,
            content: fields.content,
            tag: fields.tag,
        }
    }
}

/// The mutable attributes of an article, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFields {
    pub title: String,
    pub content: String,
    pub tag: Option<String>,
}

impl ArticleFields {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}
