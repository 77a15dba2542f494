use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Fixed lifetime of an issued access token.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// Claims carried by an access token. The subject is the member's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates HS256 bearer tokens against a server-held secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn from_secret(secret: &str) -> Result<Self> {
        if secret.len() < 32 {
            return Err(anyhow!("JWT secret must be at least 32 characters"));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
        })
    }

    /// Secret from JWT_SECRET, or a random per-process one. Tokens issued
    /// against a generated secret do not survive a restart.
    pub fn from_env() -> Result<Self> {
        match std::env::var("JWT_SECRET") {
            Ok(secret) => Self::from_secret(&secret),
            Err(_) => {
                warn!("JWT_SECRET not set, using a generated secret");
                let secret = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
                Self::from_secret(&secret)
            }
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("Failed to encode access token: {e}"))
    }

    /// Rejects malformed tokens, bad signatures and expired timestamps.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| anyhow!("Token validation failed: {e}"))
    }
}

pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> TokenService {
        TokenService::from_secret("this-is-a-very-long-secret-key-for-testing-purposes-only")
            .expect("Failed to create service")
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = create_test_service();

        let token = service.issue("a@x.com").expect("Failed to issue");
        let claims = service.validate(&token).expect("Validation failed");

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(
            claims.exp - claims.iat,
            ACCESS_TOKEN_TTL_MINUTES * 60,
            "TTL is fixed at {ACCESS_TOKEN_TTL_MINUTES} minutes"
        );
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = create_test_service();
        assert!(service.validate("invalid.token.here").is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = create_test_service();
        let other = TokenService::from_secret("another-secret-that-is-also-long-enough-here")
            .expect("Failed to create service");

        let token = other.issue("a@x.com").expect("Failed to issue");
        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: "a@x.com".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &service.encoding_key,
        )
        .expect("Failed to encode");

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(TokenService::from_secret("too-short").is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }
}
