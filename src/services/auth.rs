use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// Issues and verifies signed access tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            ttl_hours,
        }
    }

    /// Token lifetime in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_hours * 3600
    }

    pub fn create_token(&self, user_id: i64, username: &str, role: Role) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.ttl_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            username: username.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Decode a token, checking signature, issuer and expiry
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

/// bcrypt password hashing
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// False for a wrong password or a malformed stored hash
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Stored password hash could not be checked: {}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string(), 24);
        let token = service.create_token(7, "kofi", Role::Landlord).unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "kofi");
        assert_eq!(claims.role, Role::Landlord);
        assert_eq!(claims.iss, "test_issuer");

        let expires_in = claims.exp - chrono::Utc::now().timestamp();
        assert!(expires_in > 23 * 3600);
        assert!(expires_in <= 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let first = JwtService::new("secret1", "test_issuer".to_string(), 24);
        let second = JwtService::new("secret2", "test_issuer".to_string(), 24);
        let token = first.create_token(1, "ama", Role::Tenant).unwrap();
        assert!(second.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let first = JwtService::new("secret", "one".to_string(), 24);
        let second = JwtService::new("secret", "two".to_string(), 24);
        let token = first.create_token(1, "ama", Role::Tenant).unwrap();
        assert!(second.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = JwtService::new("secret", "issuer".to_string(), 24);
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("secret123").unwrap();
        assert_ne!(hash, "secret123");
        assert!(hasher.verify("secret123", &hash));
        assert!(!hasher.verify("wrong", &hash));
        assert!(!hasher.verify("secret123", "not-a-hash"));
    }
}
