//! JWT claims shared between the auth and api services
//!
//! The auth service signs tokens with its RSA private key; every service
//! verifies them with [`TokenVerifier`] and the matching public key.

use crate::error::TokenError;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Unique token ID, so two tokens minted in the same second differ
    pub jti: Uuid,
    /// User email
    pub email: String,
    /// User roles
    pub roles: Vec<String>,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// Authenticated user information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

/// Cache key under which a revoked token is remembered until it expires
pub fn blacklist_key(token: &str) -> String {
    format!("blacklisted_token:{}", token)
}

/// Resolve a PEM value that is either inline or a path to a key file
///
/// Paths are tried relative to the working directory, then to the crate
/// manifest directory.
pub fn read_key_material(value: &str) -> Result<String, TokenError> {
    if value.starts_with("-----BEGIN") {
        return Ok(value.to_string());
    }

    std::fs::read_to_string(value)
        .or_else(|_| {
            let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            path.push(value);
            std::fs::read_to_string(path)
        })
        .map(|pem| pem.trim().to_string())
        .map_err(|e| TokenError::KeyMaterial(format!("Failed to read key file {}: {}", value, e)))
}

/// Verifies RS256 tokens issued by the auth service
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier from a PEM encoded RSA public key
    pub fn from_public_key_pem(public_key: &str) -> Result<Self, TokenError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Build a verifier from `JWT_PUBLIC_KEY` (inline PEM or file path)
    pub fn from_env() -> Result<Self, TokenError> {
        let public_key = std::env::var("JWT_PUBLIC_KEY").map_err(|_| {
            TokenError::KeyMaterial("JWT_PUBLIC_KEY environment variable not set".to_string())
        })?;
        Self::from_public_key_pem(&read_key_material(&public_key)?)
    }

    /// Validate a token and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Validate a token and require it to be of the given type
    pub fn verify_as(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_pem_is_returned_untouched() {
        let pem = "-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----";
        assert_eq!(read_key_material(pem).unwrap(), pem);
    }

    #[test]
    fn test_key_file_is_resolved_from_manifest_dir() {
        let pem = read_key_material("../../fixtures/jwt/public.pem").unwrap();
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));
        assert!(TokenVerifier::from_public_key_pem(&pem).is_ok());
    }

    #[test]
    fn test_missing_key_file_is_reported() {
        let result = read_key_material("does/not/exist.pem");
        assert!(matches!(result, Err(TokenError::KeyMaterial(_))));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let pem = read_key_material("../../fixtures/jwt/public.pem").unwrap();
        let verifier = TokenVerifier::from_public_key_pem(&pem).unwrap();
        assert!(matches!(
            verifier.verify("not-a-token"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_blacklist_key_format() {
        assert_eq!(blacklist_key("abc"), "blacklisted_token:abc");
    }
}
