pub mod auth;
pub mod response;

pub use auth::{authorization_token, require_role};
pub use response::{ApiResponse, ApiResult};
