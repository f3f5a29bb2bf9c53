use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::{pin_mut, stream, Stream, TryStreamExt};
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{Article, ArticleFields};
use crate::database::store::{ArticleBackend, Page, StoreError};

/// Domain operations over the articles table.
///
/// "Not found" is reported as `Ok(None)` and never as an error, so callers
/// only see `Err` for genuine backend faults. Each backend round trip is
/// bounded by `operation_timeout`; dropping a returned future cancels the
/// call in flight.
#[derive(Clone)]
pub struct ArticleRepository {
    backend: Arc<dyn ArticleBackend>,
    page_size: usize,
    operation_timeout: Duration,
}

impl ArticleRepository {
    pub fn new(backend: Arc<dyn ArticleBackend>, page_size: usize, operation_timeout: Duration) -> Self {
        Self {
            backend,
            page_size: page_size.max(1),
            operation_timeout,
        }
    }

    async fn call<T>(&self, op: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        tokio::time::timeout(self.operation_timeout, op)
            .await
            .map_err(|_| StoreError::Timeout(self.operation_timeout))?
    }

    pub async fn get(&self, id: &str) -> Result<Option<Article>, StoreError> {
        debug!("Fetching article {}", id);
        self.call(self.backend.get_item(id)).await
    }

    /// Stores a new article under a freshly generated id.
    pub async fn create(&self, fields: ArticleFields) -> Result<Article, StoreError> {
        let article = Article::new(Uuid::new_v4().to_string(), fields);
        debug!("Inserting article {}", article.id);
        self.call(self.backend.put_item(&article)).await
    }

    /// Removes the article and returns what was stored before the delete.
    pub async fn delete(&self, id: &str) -> Result<Option<Article>, StoreError> {
        debug!("Deleting article {}", id);
        self.call(self.backend.delete_item(id)).await
    }

    /// Overwrites title and content of an existing article, and its tag when
    /// one is given. Never creates one: a missing id yields `Ok(None)` with
    /// nothing written.
    pub async fn update(&self, id: &str, fields: ArticleFields) -> Result<Option<Article>, StoreError> {
        debug!("Updating article {}", id);
        match self.call(self.backend.update_item_if_exists(id, &fields)).await {
            Ok(article) => Ok(Some(article)),
            Err(StoreError::ConditionalCheckFailed) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lazily pulls scan pages from the backend, following continuation
    /// tokens until the backend reports no further pages.
    pub fn pages(&self) -> impl Stream<Item = Result<Page, StoreError>> + Send + '_ {
        enum Cursor {
            Start,
            After(String),
            Done,
        }

        stream::try_unfold(Cursor::Start, move |cursor| async move {
            let start = match cursor {
                Cursor::Start => None,
                Cursor::After(key) => Some(key),
                Cursor::Done => return Ok(None),
            };

            let page = self
                .call(self.backend.scan_page(start.as_deref(), self.page_size))
                .await?;
            let next = match &page.last_evaluated_key {
                Some(key) => Cursor::After(key.clone()),
                None => Cursor::Done,
            };
            Ok::<_, StoreError>(Some((page, next)))
        })
    }

    /// Every article in the table, in no particular order.
    pub async fn list(&self) -> Result<Vec<Article>, StoreError> {
        let articles = self
            .pages()
            .try_fold(Vec::new(), |mut acc, page| async move {
                acc.extend(page.items);
                Ok(acc)
            })
            .await?;
        debug!("Listed {} articles", articles.len());
        Ok(articles)
    }

    /// First article carrying `tag`, found by filtering the scan. Stops
    /// paging as soon as a match is seen.
    pub async fn find_by_tag(&self, tag: &str) -> Result<Option<Article>, StoreError> {
        debug!("Scanning for article with tag {}", tag);
        let pages = self.pages();
        pin_mut!(pages);

        while let Some(page) = pages.try_next().await? {
            if let Some(article) = page
                .items
                .into_iter()
                .find(|article| article.tag.as_deref() == Some(tag))
            {
                return Ok(Some(article));
            }
        }
        Ok(None)
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.call(self.backend.ping()).await
    }
}
