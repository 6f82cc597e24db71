use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::ports::{SecretHasher, TokenIssuer};

/// bcrypt password hashing. The salt and cost live in the stored string.
pub struct BcryptSecretHasher {
    cost: u32,
}

impl BcryptSecretHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptSecretHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl SecretHasher for BcryptSecretHasher {
    fn hash(&self, secret: &str) -> Result<String, DomainError> {
        bcrypt::hash(secret, self.cost).map_err(|e| DomainError::Internal(e.to_string()))
    }

    fn verify(&self, secret: &str, stored: &str) -> bool {
        // Malformed stored hashes count as a mismatch.
        bcrypt::verify(secret, stored).unwrap_or(false)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues HS256 JWTs signed with the server secret.
pub struct JwtTokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, subject: &str) -> Result<String, DomainError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| DomainError::Internal("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.key)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}
