use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            CONTENT_TYPE, LOCATION,
        },
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// Successful JSON response carrying cross-origin headers scoped to the
/// method that produced it.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub method: Method,
    pub status_code: StatusCode,
    pub location: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK
    pub fn success(method: Method, data: T) -> Self {
        Self {
            data,
            method,
            status_code: StatusCode::OK,
            location: None,
        }
    }

    /// 201 Created
    pub fn created(method: Method, data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(method, data)
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self.data) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::internal_server_error(e.to_string()).into_response();
            }
        };

        let mut response = (self.status_code, body).into_response();
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
        if let Ok(method) = HeaderValue::from_str(self.method.as_str()) {
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, method);
        }
        if let Some(location) = self.location {
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    headers.insert(LOCATION, value);
                }
                Err(e) => {
                    tracing::error!("Invalid Location header '{}': {}", location, e);
                    return ApiError::internal_server_error(e.to_string()).into_response();
                }
            }
        }
        response
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
