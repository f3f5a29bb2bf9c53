use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Article, ArticleFields};

/// Errors surfaced by an [`ArticleBackend`].
///
/// `ConditionalCheckFailed` is not a fault: it reports that the precondition
/// of a conditional write did not hold, and the repository turns it into an
/// absent result.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conditional check failed")]
    ConditionalCheckFailed,

    #[error("invalid table name: {0}")]
    InvalidTableName(String),

    #[error("failed to decode stored record: {0}")]
    Decode(String),

    #[error("backend call exceeded deadline of {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

/// One bounded page of a table scan.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Article>,
    /// Continuation token: the key to resume after, or `None` when the scan
    /// is exhausted.
    pub last_evaluated_key: Option<String>,
}

/// Raw key-value primitives over the articles table.
///
/// Implementations must be safe to share between concurrently running
/// requests; per-record consistency comes from `update_item_if_exists`
/// being a single atomic write.
#[async_trait]
pub trait ArticleBackend: Send + Sync {
    async fn get_item(&self, id: &str) -> Result<Option<Article>, StoreError>;

    async fn put_item(&self, article: &Article) -> Result<Article, StoreError>;

    /// Removes the item and returns its previous attributes, if it existed.
    async fn delete_item(&self, id: &str) -> Result<Option<Article>, StoreError>;

    /// Sets the mutable attributes on `id` only if that key exists. A `None`
    /// tag leaves the stored tag untouched. Returns the updated item, or
    /// `StoreError::ConditionalCheckFailed` when the key does not exist.
    async fn update_item_if_exists(
        &self,
        id: &str,
        fields: &ArticleFields,
    ) -> Result<Article, StoreError>;

    /// Reads at most `limit` items whose key sorts after
    /// `exclusive_start_key`.
    async fn scan_page(
        &self,
        exclusive_start_key: Option<&str>,
        limit: usize,
    ) -> Result<Page, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
