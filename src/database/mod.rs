pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryBackend;
pub use models::{Article, ArticleFields};
pub use postgres::PgBackend;
pub use repository::ArticleRepository;
pub use store::{ArticleBackend, Page, StoreError};
