// handlers/mod.rs - HTTP entry points
//
// articles: every method on /articles and /articles/:id goes through the
//           dispatcher, which owns routing by method, path id and query.
// health:   liveness and record store reachability.

pub mod articles;
pub mod health;

pub use articles::{collection as articles_collection, member as articles_member};
pub use health::health;
