use std::time::Duration;

use jsonwebtoken::{decode, decode_header, jwk::JwkSet, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SecurityConfig;

/// Multi-valued claim listing the caller's groups.
pub const GROUPS_CLAIM: &str = "cognito:groups";

/// Role derived from the group claim of a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
    /// The token could not be decoded or carries neither known group.
    Error,
}

impl Role {
    /// `Admin` takes precedence over `User` when both groups are present.
    /// Group names are matched case-sensitively.
    pub fn from_groups(groups: &[String]) -> Self {
        if groups.iter().any(|g| g == "Admin") {
            Role::Admin
        } else if groups.iter().any(|g| g == "User") {
            Role::User
        } else {
            Role::Error
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Error => "error",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct GroupClaims {
    #[serde(rename = "cognito:groups", default)]
    groups: Vec<String>,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("failed to fetch JWKS: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("no key in the key set matches kid {0:?}")]
    UnknownKey(Option<String>),

    #[error("token verification is not configured")]
    NotConfigured,

    #[error(transparent)]
    Decode(#[from] jsonwebtoken::errors::Error),
}

/// Decodes bearer tokens into their group claim.
pub enum TokenDecoder {
    /// Signatures are verified against a JSON Web Key Set.
    Jwks {
        keys: JwkSet,
        issuer: Option<String>,
        audience: Option<String>,
    },
    /// Claims are read without checking signature or expiry. Anyone can
    /// forge a token that passes; only for local development.
    InsecureUnverified,
    /// No verification source configured: every token is rejected.
    Disabled,
}

impl TokenDecoder {
    pub fn jwks(keys: JwkSet, issuer: Option<String>, audience: Option<String>) -> Self {
        TokenDecoder::Jwks { keys, issuer, audience }
    }

    /// Picks the decoding mode from configuration, fetching the key set
    /// when a JWKS URL is configured. The key set is read once; a rotated
    /// signing key is picked up on the next restart.
    pub async fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        if let Some(url) = &security.jwks_url {
            let keys = fetch_jwks(url, Duration::from_millis(security.jwks_timeout_ms)).await?;
            info!("Loaded {} signing keys from {}", keys.keys.len(), url);
            return Ok(Self::jwks(keys, security.issuer.clone(), security.audience.clone()));
        }
        if security.allow_unverified_tokens {
            warn!("Token signatures are NOT verified (AUTH_ALLOW_UNVERIFIED_TOKENS=true)");
            return Ok(TokenDecoder::InsecureUnverified);
        }
        warn!("No token verification configured; admin operations will be denied");
        Ok(TokenDecoder::Disabled)
    }

    /// Extracts the caller's role. Never fails: anything that cannot be
    /// decoded yields `Role::Error`.
    pub fn extract_role(&self, token: &str) -> Role {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        match self.decode_groups(token) {
            Ok(groups) => Role::from_groups(&groups),
            Err(e) => {
                debug!("Token rejected: {}", e);
                Role::Error
            }
        }
    }

    fn decode_groups(&self, token: &str) -> Result<Vec<String>, JwtError> {
        match self {
            TokenDecoder::Jwks { keys, issuer, audience } => {
                let header = decode_header(token)?;
                let jwk = header
                    .kid
                    .as_deref()
                    .and_then(|kid| keys.find(kid))
                    .ok_or_else(|| JwtError::UnknownKey(header.kid.clone()))?;
                let key = DecodingKey::from_jwk(jwk)?;

                let mut validation = Validation::new(header.alg);
                if let Some(issuer) = issuer {
                    validation.set_issuer(&[issuer]);
                }
                match audience {
                    Some(audience) => validation.set_audience(&[audience]),
                    None => validation.validate_aud = false,
                }

                let data = decode::<GroupClaims>(token, &key, &validation)?;
                Ok(data.claims.groups)
            }
            TokenDecoder::InsecureUnverified => {
                let mut validation = Validation::default();
                validation.insecure_disable_signature_validation();
                validation.validate_exp = false;
                validation.validate_aud = false;
                validation.required_spec_claims.clear();

                let data = decode::<GroupClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
                Ok(data.claims.groups)
            }
            TokenDecoder::Disabled => Err(JwtError::NotConfigured),
        }
    }
}

async fn fetch_jwks(url: &str, timeout: Duration) -> Result<JwkSet, JwtError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let keys = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await?;
    Ok(keys)
}
