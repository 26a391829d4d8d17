//! HS256 bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AuthError;

/// A century; keeps `now + ttl` inside chrono's range.
const MAX_TTL_SECONDS: i64 = 100 * 365 * 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Without a configured secret a random one is generated, so tokens do
    /// not survive a restart.
    pub fn new(secret: Option<&str>, ttl_seconds: u64) -> Self {
        let secret = match secret {
            Some(secret) if !secret.is_empty() => secret.to_owned(),
            _ => {
                warn!("auth.jwt_secret is not set; generated an ephemeral signing secret");
                rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(64)
                    .map(char::from)
                    .collect()
            }
        };
        let ttl = Duration::seconds(
            i64::try_from(ttl_seconds)
                .unwrap_or(i64::MAX)
                .min(MAX_TTL_SECONDS),
        );

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: i64, role: &str) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_round_trip_their_claims() {
        let issuer = TokenIssuer::new(Some("secret"), 3_600);
        let (token, expires_at) = issuer.issue(42, "tenant").unwrap();

        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "tenant");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 3_600);
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let ours = TokenIssuer::new(Some("ours"), 3_600);
        let theirs = TokenIssuer::new(Some("theirs"), 3_600);
        let (token, _) = theirs.issue(1, "admin").unwrap();

        assert!(matches!(ours.validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_tokens_are_reported_as_expired() {
        let issuer = TokenIssuer::new(Some("secret"), 3_600);
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: "7".into(),
            role: "tenant".into(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(issuer.validate(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn generated_secrets_differ_between_issuers() {
        let first = TokenIssuer::new(None, 60);
        let second = TokenIssuer::new(None, 60);
        let (token, _) = first.issue(1, "admin").unwrap();
        assert!(second.validate(&token).is_err());
    }
}
