use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Decoded token payload. Wire names: `jti` username, `name` given name,
/// `email`, `phone`, `role`, `x-auth` session id.
/// Identity claims are optional so that a token missing one of them still
/// decodes and the session gate can reject it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "jti", default)]
    pub user_name: Option<String>,
    #[serde(rename = "name", default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(rename = "x-auth", default)]
    pub session_id: Option<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Who a token is minted for
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub session_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("Token lifetime of {0} hours is out of range")]
    InvalidExpiry(u64),
}

/// Mints and verifies HS256 tokens for one issuer/audience pair
pub struct TokenService {
    issuer: String,
    audience: String,
    expiry: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Result<Self, JwtError> {
        if security.jwt_secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        // Rejects lifetimes whose expiry date would overflow
        let expiry = i64::try_from(security.jwt_expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .filter(|lifetime| Utc::now().checked_add_signed(*lifetime).is_some())
            .ok_or(JwtError::InvalidExpiry(security.jwt_expiry_hours))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[security.jwt_issuer.as_str()]);
        validation.set_audience(&[security.jwt_audience.as_str()]);

        Ok(Self {
            issuer: security.jwt_issuer.clone(),
            audience: security.jwt_audience.clone(),
            expiry,
            encoding_key: EncodingKey::from_secret(security.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, subject: &TokenSubject) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.expiry)
            .ok_or(JwtError::InvalidExpiry(self.expiry.num_hours().unsigned_abs()))?;

        let claims = Claims {
            user_name: Some(subject.user_name.clone()),
            given_name: Some(subject.user_name.clone()),
            email: Some(subject.email.clone()),
            phone: Some(subject.phone.clone()),
            role: Some(subject.role.clone()),
            session_id: Some(subject.session_id.to_string()),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, expiry, issuer and audience
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}
