//! JWT service for token generation, validation, and management
//!
//! This module provides functionality for creating and validating JWT tokens
//! using the RS256 algorithm, as well as refresh token rotation and
//! token blacklisting through the shared cache store.

use anyhow::Result;
use common::{
    cache::CacheBackend,
    token::{Claims, TokenType, TokenVerifier, blacklist_key, read_key_material},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::models::User;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Private key for signing tokens
    pub private_key: String,
    /// Public key for verifying tokens
    pub public_key: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PRIVATE_KEY`: Private key for signing tokens (PEM format) or path to private key file
    /// - `JWT_PUBLIC_KEY`: Public key for verifying tokens (PEM format) or path to public key file
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let private_key = std::env::var("JWT_PRIVATE_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_PRIVATE_KEY environment variable not set"))?;
        let public_key = std::env::var("JWT_PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_PUBLIC_KEY environment variable not set"))?;

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string()) // 15 minutes
            .parse()
            .unwrap_or(900);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse()
            .unwrap_or(604800);

        Ok(JwtConfig {
            private_key: read_key_material(&private_key)?,
            public_key: read_key_material(&public_key)?,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}

fn now_seconds() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    verifier: TokenVerifier,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())?;
        let verifier = TokenVerifier::from_public_key_pem(&config.public_key)?;

        Ok(JwtService {
            encoding_key,
            verifier,
            config,
        })
    }

    fn sign(&self, user: &User, token_type: TokenType, lifetime: u64) -> Result<String> {
        let now = now_seconds()?;

        let roles = match token_type {
            TokenType::Access => vec!["user".to_string()],
            TokenType::Refresh => vec![],
        };

        let claims = Claims {
            sub: user.id,
            jti: Uuid::new_v4(),
            email: user.email.clone(),
            roles,
            iat: now,
            exp: now + lifetime,
            token_type,
        };

        let token = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user: &User) -> Result<String> {
        self.sign(user, TokenType::Access, self.config.access_token_expiry)
    }

    /// Generate a refresh token for a user
    pub fn generate_refresh_token(&self, user: &User) -> Result<String> {
        self.sign(user, TokenType::Refresh, self.config.refresh_token_expiry)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        Ok(self.verifier.verify(token)?)
    }

    /// Validate a token that must be a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        Ok(self.verifier.verify_as(token, TokenType::Refresh)?)
    }

    /// Check if a token is blacklisted
    pub async fn is_token_blacklisted(&self, cache: &CacheBackend, token: &str) -> Result<bool> {
        let result = cache.get(&blacklist_key(token)).await?;
        Ok(result.is_some())
    }

    /// Blacklist a token for `expiry` seconds
    pub async fn blacklist_token(&self, cache: &CacheBackend, token: &str, expiry: u64) -> Result<()> {
        cache.set(&blacklist_key(token), "1", Some(expiry.max(1))).await?;
        Ok(())
    }

    /// Seconds until the given claims expire
    pub fn remaining_lifetime(&self, claims: &Claims) -> Result<u64> {
        Ok(claims.exp.saturating_sub(now_seconds()?))
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Get the refresh token expiry time
    pub fn refresh_token_expiry(&self) -> u64 {
        self.config.refresh_token_expiry
    }

    /// Rotate a refresh token
    ///
    /// This function blacklists the old refresh token and generates a new one
    pub async fn rotate_refresh_token(
        &self,
        cache: &CacheBackend,
        user: &User,
        old_refresh_token: &str,
    ) -> Result<String> {
        let claims = self.validate_refresh_token(old_refresh_token)?;

        if claims.sub != user.id {
            return Err(anyhow::anyhow!("Token does not belong to user"));
        }

        // Blacklisted for its remaining lifetime to prevent reuse
        let expiry = self.remaining_lifetime(&claims)?;
        self.blacklist_token(cache, old_refresh_token, expiry).await?;

        self.generate_refresh_token(user)
    }
}
