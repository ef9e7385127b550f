//! Session token codec
//!
//! Issues and verifies HS256-signed tokens that bind a client identity (`id`, `email`)
//! for a limited time. The signing secret is process-wide configuration: it is read once
//! at startup and handed to [`JwtCodec::new`], and every token issued with it stays
//! verifiable only while the same secret is in use.
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::JwtCodec;
//!
//! let codec = JwtCodec::new("change-me", chrono::Duration::days(1)).unwrap();
//! let token = codec.issue(7, "ana@example.com").unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.id, 7);
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default token lifetime: one day from issuance
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("failed to sign token: {0}")]
    Encode(String),

    /// Bad signature, expired, or malformed token
    #[error("token verification failed: {0}")]
    Invalid(String),
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Client id
    pub id: i32,
    /// Client login email
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Signs and verifies session tokens with a single injected secret
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtCodec")
            .field("algorithm", &JWT_ALGORITHM)
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl JwtCodec {
    /// Build a codec from the shared secret and the lifetime of issued tokens
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Lifetime applied by [`JwtCodec::issue`]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for a client, expiring `ttl` from now
    pub fn issue(&self, id: i32, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims. `issue` is the normal entry point; this exists for callers
    /// that need to control `iat`/`exp` directly.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
