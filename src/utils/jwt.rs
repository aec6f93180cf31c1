use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::user::Role;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,      // 用户邮箱
    pub roles: Vec<Role>, // 用户角色
    pub iat: i64,         // 签发时间
    pub exp: i64,         // 过期时间
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token algorithm is not supported")]
    Unsupported,
}

/// 签发与校验 HS256 令牌, 无任何存储副作用
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl,
        }
    }

    pub fn from_hours(secret: &str, hours: u64) -> Self {
        Self::new(secret, Duration::hours(hours as i64))
    }

    pub fn issue(&self, subject: &str, roles: &[Role]) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            roles: roles.to_vec(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|_| TokenError::Malformed)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Empty);
        }

        // 过期判断不留余量
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::Unsupported
            }
            _ => TokenError::Malformed,
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::from_hours("test-secret", 24)
    }

    #[test]
    fn round_trip_preserves_subject_and_roles() {
        let token = issuer().issue("a@b.com", &[Role::Admin]).unwrap();
        let claims = issuer().verify(&token).unwrap();

        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.roles, vec![Role::Admin]);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = TokenIssuer::new("test-secret", Duration::seconds(-10));
        let token = expired.issue("a@b.com", &[Role::User]).unwrap();

        assert_eq!(issuer().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn empty_token_is_rejected() {
        assert_eq!(issuer().verify(""), Err(TokenError::Empty));
        assert_eq!(issuer().verify("   "), Err(TokenError::Empty));
    }

    #[test]
    fn garbage_token_is_malformed() {
        assert_eq!(
            issuer().verify("not-a-jwt-at-all"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn differently_signed_token_is_rejected() {
        let other = TokenIssuer::from_hours("another-secret", 24);
        let token = other.issue("a@b.com", &[Role::User]).unwrap();

        assert_eq!(issuer().verify(&token), Err(TokenError::BadSignature));
    }
}
