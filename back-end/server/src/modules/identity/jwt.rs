use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT operation failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("JWT secret must not be empty")]
    EmptySecret,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account email
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(email: &str, role: &str, expiry_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expiry_minutes)).timestamp(),
        }
    }
}

/// Issues and validates HS256 access tokens.
#[derive(Clone)]
pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_minutes: i64,
}

impl JwtIssuer {
    pub fn new(secret: &str, expiry_minutes: i64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_minutes,
        })
    }

    pub fn issue(&self, email: &str, role: &str) -> Result<String, JwtError> {
        let claims = Claims::new(email, role, self.expiry_minutes);
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn validate(&self, token: &str) -> Result<TokenData<Claims>, JwtError> {
        Ok(decode::<Claims>(token, &self.decoding, &Validation::default())?)
    }
}
