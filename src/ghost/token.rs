//! Self-issued Ghost Admin API tokens.
//!
//! An admin key is `<key id>:<hex secret>`. Each request carries a JWT
//! signed with HS256 over the decoded secret, naming the key id in the
//! header and expiring five minutes after issue.

use crate::constants::{GHOST_TOKEN_AUDIENCE, GHOST_TOKEN_TTL_SECS};
use crate::error::AppError;
use crate::types::ValidationError;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::fmt;

/// A Ghost admin API key, split into its id and decoded secret.
#[derive(Clone, PartialEq, Eq)]
pub struct GhostAdminKey {
    id: String,
    secret: Vec<u8>,
}

impl GhostAdminKey {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let (id, secret_hex) =
            raw.trim()
                .split_once(':')
                .ok_or_else(|| ValidationError::InvalidAdminKey {
                    reason: "expected '<id>:<secret>'".to_string(),
                })?;

        if id.is_empty() {
            return Err(ValidationError::InvalidAdminKey {
                reason: "key id is empty".to_string(),
            });
        }

        let secret = decode_hex(secret_hex).ok_or_else(|| ValidationError::InvalidAdminKey {
            reason: "secret must be a non-empty hex string".to_string(),
        })?;

        Ok(Self {
            id: id.to_string(),
            secret,
        })
    }

    /// The key id, sent as the token's `kid` header.
    pub fn id(&self) -> &str {
        &self.id
    }

    #[cfg(test)]
    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for GhostAdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhostAdminKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AdminClaims {
    iat: i64,
    exp: i64,
    aud: &'static str,
}

/// Issues a token valid from `issued_at` (unix seconds) for five minutes.
pub fn issue_token(key: &GhostAdminKey, issued_at: i64) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(key.id.clone());

    let claims = AdminClaims {
        iat: issued_at,
        exp: issued_at + GHOST_TOKEN_TTL_SECS,
        aud: GHOST_TOKEN_AUDIENCE,
    };

    Ok(jsonwebtoken::encode(
        &header,
        &claims,
        &EncodingKey::from_secret(&key.secret),
    )?)
}

/// Issues a token valid from now.
pub fn issue_token_now(key: &GhostAdminKey) -> Result<String, AppError> {
    issue_token(key, chrono::Utc::now().timestamp())
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.is_empty() || input.len() % 2 != 0 {
        return None;
    }
    (0..input.len())
        .step_by(2)
        .map(|i| {
            input
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
    use serde::Deserialize;

    const KEY: &str = "6489f3a1c2b3d4e5f6a7b8c9:0123456789abcdef0123456789abcdef";

    #[derive(Debug, Deserialize)]
    struct DecodedClaims {
        iat: i64,
        exp: i64,
        aud: String,
    }

    #[test]
    fn test_parse_splits_id_and_secret() {
        let key = GhostAdminKey::parse(KEY).unwrap();
        assert_eq!(key.id(), "6489f3a1c2b3d4e5f6a7b8c9");
        assert_eq!(key.secret().len(), 16);
        assert_eq!(key.secret()[0], 0x01);
        assert_eq!(key.secret()[15], 0xef);
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(GhostAdminKey::parse("no-separator").is_err());
        assert!(GhostAdminKey::parse(":abcdef").is_err());
        assert!(GhostAdminKey::parse("id:").is_err());
        assert!(GhostAdminKey::parse("id:xyz0").is_err());
        assert!(GhostAdminKey::parse("id:abc").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = GhostAdminKey::parse(KEY).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("6489f3a1c2b3d4e5f6a7b8c9"));
        assert!(!debug.contains("0123456789abcdef"));
    }

    #[test]
    fn test_token_header_and_claims() {
        let key = GhostAdminKey::parse(KEY).unwrap();
        let now = chrono::Utc::now().timestamp();
        let token = issue_token(&key, now).unwrap();

        assert_eq!(token.split('.').count(), 3);

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.kid.as_deref(), Some("6489f3a1c2b3d4e5f6a7b8c9"));
        assert_eq!(header.typ.as_deref(), Some("JWT"));

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["/admin/"]);
        let decoded =
            decode::<DecodedClaims>(&token, &DecodingKey::from_secret(key.secret()), &validation)
                .unwrap();

        assert_eq!(decoded.claims.iat, now);
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 300);
        assert_eq!(decoded.claims.aud, "/admin/");
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let key = GhostAdminKey::parse(KEY).unwrap();
        let token = issue_token_now(&key).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["/admin/"]);
        let result = decode::<DecodedClaims>(
            &token,
            &DecodingKey::from_secret(b"not the secret"),
            &validation,
        );
        assert!(result.is_err());
    }
}
