//! JWT service for scoped token generation and validation
//!
//! Every scope (access, refresh, security) is signed with its own HS256
//! secret and carries its own lifetime, so a token minted for one scope never
//! verifies under another.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for signing access tokens
    pub access_secret: String,
    /// Secret for signing refresh tokens
    pub refresh_secret: String,
    /// Secret for signing security tokens
    pub security_secret: String,
    /// Access token expiration time in seconds (default: 30 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
    /// Security token expiration time in seconds (default: 10 minutes)
    pub security_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_ACCESS_SECRET`: Secret for access tokens
    /// - `JWT_REFRESH_SECRET`: Secret for refresh tokens
    /// - `JWT_SECURITY_SECRET`: Secret for security tokens
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 1800)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    /// - `JWT_SECURITY_TOKEN_EXPIRY`: Security token expiry in seconds (default: 600)
    pub fn from_env() -> Result<Self> {
        let secret = |name: &str| {
            std::env::var(name)
                .map_err(|_| anyhow::anyhow!("{} environment variable not set", name))
        };
        let expiry = |name: &str, default: u64| {
            std::env::var(name)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        Ok(JwtConfig {
            access_secret: secret("JWT_ACCESS_SECRET")?,
            refresh_secret: secret("JWT_REFRESH_SECRET")?,
            security_secret: secret("JWT_SECURITY_SECRET")?,
            access_token_expiry: expiry("JWT_ACCESS_TOKEN_EXPIRY", 1800),
            refresh_token_expiry: expiry("JWT_REFRESH_TOKEN_EXPIRY", 604800),
            security_token_expiry: expiry("JWT_SECURITY_TOKEN_EXPIRY", 600),
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Unique token id
    pub jti: Uuid,
    /// Token scope
    pub scope: TokenScope,
}

/// Token scope enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    /// Authorizes ordinary requests
    Access,
    /// Exchanges for a new token pair
    Refresh,
    /// Authorizes a sensitive account change after password re-verification
    Security,
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Expected a {expected:?} token, got {actual:?}")]
    WrongScope {
        expected: TokenScope,
        actual: TokenScope,
    },

    #[error("System clock is before the Unix epoch")]
    Clock,
}

#[derive(Clone)]
struct ScopeKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: u64,
}

impl ScopeKeys {
    fn new(secret: &str, expiry: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct TokenService {
    access: ScopeKeys,
    refresh: ScopeKeys,
    security: ScopeKeys,
    validation: Validation,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        TokenService {
            access: ScopeKeys::new(&config.access_secret, config.access_token_expiry),
            refresh: ScopeKeys::new(&config.refresh_secret, config.refresh_token_expiry),
            security: ScopeKeys::new(&config.security_secret, config.security_token_expiry),
            validation,
        }
    }

    fn keys(&self, scope: TokenScope) -> &ScopeKeys {
        match scope {
            TokenScope::Access => &self.access,
            TokenScope::Refresh => &self.refresh,
            TokenScope::Security => &self.security,
        }
    }

    /// Mint a token of `scope` for `user_id`
    pub fn issue(&self, user_id: Uuid, scope: TokenScope) -> Result<String, TokenError> {
        let keys = self.keys(scope);
        let now = now()?;

        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + keys.expiry,
            jti: Uuid::new_v4(),
            scope,
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.keys(claims.scope).encoding_key,
        )
        .map_err(TokenError::Encode)
    }

    /// Validate a token against `scope` and return the claims
    pub fn verify(&self, token: &str, scope: TokenScope) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.keys(scope).decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;

        let claims = token_data.claims;
        if claims.scope != scope {
            return Err(TokenError::WrongScope {
                expected: scope,
                actual: claims.scope,
            });
        }

        Ok(claims)
    }
}

fn now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::Clock)
}

#[cfg(test)]
pub(crate) fn test_config() -> JwtConfig {
    JwtConfig {
        access_secret: "access-secret-for-tests".to_string(),
        refresh_secret: "refresh-secret-for-tests".to_string(),
        security_secret: "security-secret-for-tests".to_string(),
        access_token_expiry: 1800,
        refresh_token_expiry: 604800,
        security_token_expiry: 600,
    }
}
