//! Shared types used across the codebase

use axum::http::Method;

/// Article operations the dispatcher can route a request to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    GetById,
    GetByTag,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Maps method and request shape to an operation; `None` means the
    /// method is not supported.
    ///
    /// A `tag` query parameter wins over a path id for GET. Missing ids for
    /// update and delete are reported by the operation itself, after any
    /// authorization check.
    pub fn resolve(method: &Method, has_id: bool, has_tag: bool) -> Option<Self> {
        match *method {
            Method::GET if has_tag => Some(Operation::GetByTag),
            Method::GET if has_id => Some(Operation::GetById),
            Method::GET => Some(Operation::List),
            Method::POST => Some(Operation::Create),
            Method::PUT => Some(Operation::Update),
            Method::DELETE => Some(Operation::Delete),
            _ => None,
        }
    }

    /// Only create and delete are gated on the admin role.
    pub fn requires_admin(&self) -> bool {
        matches!(self, Operation::Create | Operation::Delete)
    }
}
