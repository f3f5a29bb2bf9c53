use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::database::models::{Article, ArticleFields};
use crate::database::store::{ArticleBackend, Page, StoreError};

const COLUMNS: &str = "id, title, content, tag";

/// Articles table in PostgreSQL, keyed by `id`.
pub struct PgBackend {
    pool: PgPool,
    table: String,
}

impl PgBackend {
    pub fn new(pool: PgPool, table_name: &str) -> Result<Self, StoreError> {
        if !Self::is_valid_table_name(table_name) {
            return Err(StoreError::InvalidTableName(table_name.to_string()));
        }
        Ok(Self {
            pool,
            table: Self::quote_identifier(table_name),
        })
    }

    /// Creates the table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                tag TEXT
            )",
            self.table
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        info!("Ensured articles table {}", self.table);
        Ok(())
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Table names are limited to [a-zA-Z_][a-zA-Z0-9_]*
    fn is_valid_table_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

#[async_trait]
impl ArticleBackend for PgBackend {
    async fn get_item(&self, id: &str) -> Result<Option<Article>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table);
        let article = sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(article)
    }

    async fn put_item(&self, article: &Article) -> Result<Article, StoreError> {
        let sql = format!(
            "INSERT INTO {} ({COLUMNS}) VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE
             SET title = EXCLUDED.title, content = EXCLUDED.content, tag = EXCLUDED.tag
             RETURNING {COLUMNS}",
            self.table
        );
        let stored = sqlx::query_as::<_, Article>(&sql)
            .bind(&article.id)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.tag)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn delete_item(&self, id: &str) -> Result<Option<Article>, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING {COLUMNS}", self.table);
        let removed = sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(removed)
    }

    async fn update_item_if_exists(
        &self,
        id: &str,
        fields: &ArticleFields,
    ) -> Result<Article, StoreError> {
        // The WHERE clause is the existence predicate: no row matched means
        // the condition failed and nothing was written. A NULL tag keeps the
        // stored one.
        let sql = format!(
            "UPDATE {} SET title = $2, content = $3, tag = COALESCE($4, tag)
             WHERE id = $1 RETURNING {COLUMNS}",
            self.table
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.content)
            .bind(&fields.tag)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ConditionalCheckFailed)
    }

    async fn scan_page(
        &self,
        exclusive_start_key: Option<&str>,
        limit: usize,
    ) -> Result<Page, StoreError> {
        let limit = limit.max(1);
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE ($1::text IS NULL OR id > $1) ORDER BY id LIMIT $2",
            self.table
        );
        let items = sqlx::query_as::<_, Article>(&sql)
            .bind(exclusive_start_key)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let last_evaluated_key = if items.len() == limit {
            items.last().map(|article| article.id.clone())
        } else {
            None
        };
        debug!("Scanned {} articles from {}", items.len(), self.table);

        Ok(Page { items, last_evaluated_key })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
