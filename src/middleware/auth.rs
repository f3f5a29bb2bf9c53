use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::warn;

use crate::auth::{Role, TokenDecoder};
use crate::error::ApiError;

/// Raw `Authorization` header value, or an empty string when it is missing
/// or not valid UTF-8. The decoder turns either case into `Role::Error`.
pub fn authorization_token(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// Allows the request only if the caller's role equals `required`.
pub fn require_role(decoder: &TokenDecoder, headers: &HeaderMap, required: Role) -> Result<Role, ApiError> {
    let role = decoder.extract_role(authorization_token(headers));
    if role != required {
        warn!("Authorization denied: role '{}' but '{}' required", role, required);
        return Err(ApiError::unauthorized(format!("role '{role}' is not '{required}'")));
    }
    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn headers_with(groups: &[&str]) -> HeaderMap {
        let token = encode(
            &Header::default(),
            &json!({ "cognito:groups": groups }),
            &EncodingKey::from_secret(b"k"),
        )
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
        headers
    }

    #[test]
    fn admin_passes_admin_gate() {
        let decoder = TokenDecoder::InsecureUnverified;
        let role = require_role(&decoder, &headers_with(&["Admin"]), Role::Admin).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn user_is_denied_with_401() {
        let decoder = TokenDecoder::InsecureUnverified;
        let err = require_role(&decoder, &headers_with(&["User"]), Role::Admin).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.body(), "Unauthorized");
    }

    #[test]
    fn missing_header_is_denied() {
        let decoder = TokenDecoder::InsecureUnverified;
        let err = require_role(&decoder, &HeaderMap::new(), Role::Admin).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
