use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::{Article, ArticleFields};
use crate::database::store::{ArticleBackend, Page, StoreError};

/// In-process articles table, ordered by key.
///
/// Pages are capped at `page_size` items regardless of the limit the caller
/// asks for, so callers see the same bounded paging a remote table imposes.
pub struct MemoryBackend {
    items: RwLock<BTreeMap<String, Article>>,
    page_size: usize,
}

impl MemoryBackend {
    pub const DEFAULT_PAGE_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_page_size(Self::DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleBackend for MemoryBackend {
    async fn get_item(&self, id: &str) -> Result<Option<Article>, StoreError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn put_item(&self, article: &Article) -> Result<Article, StoreError> {
        let mut items = self.items.write().await;
        items.insert(article.id.clone(), article.clone());
        Ok(article.clone())
    }

    async fn delete_item(&self, id: &str) -> Result<Option<Article>, StoreError> {
        Ok(self.items.write().await.remove(id))
    }

    async fn update_item_if_exists(
        &self,
        id: &str,
        fields: &ArticleFields,
    ) -> Result<Article, StoreError> {
        // Check and write under one lock so a racing delete is observed.
        let mut items = self.items.write().await;
        let article = items.get_mut(id).ok_or(StoreError::ConditionalCheckFailed)?;
        article.title = fields.title.clone();
        article.content = fields.content.clone();
        if let Some(tag) = &fields.tag {
            article.tag = Some(tag.clone());
        }
        Ok(article.clone())
    }

    async fn scan_page(
        &self,
        exclusive_start_key: Option<&str>,
        limit: usize,
    ) -> Result<Page, StoreError> {
        let limit = limit.clamp(1, self.page_size);
        let items = self.items.read().await;

        let lower = match exclusive_start_key {
            Some(key) => Bound::Excluded(key.to_string()),
            None => Bound::Unbounded,
        };
        let page: Vec<Article> = items
            .range((lower, Bound::Unbounded))
            .take(limit)
            .map(|(_, article)| article.clone())
            .collect();

        // A full page always carries a continuation key, even when nothing
        // follows it; the next call then returns an empty final page.
        let last_evaluated_key = if page.len() == limit {
            page.last().map(|article| article.id.clone())
        } else {
            None
        };

        Ok(Page { items: page, last_evaluated_key })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
