use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// JWT payload. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(
    user_id: Uuid,
    email: &str,
    secret: &str,
    ttl_days: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let expires_at = Duration::try_days(ttl_days)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(AuthError::TokenLifetime(ttl_days))?;
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Verifies signature and expiry (HS256).
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_verifies() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "ada@example.com", "s3cret", 7).unwrap();
        let claims = verify_token(&token, "s3cret").unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(Uuid::new_v4(), "ada@example.com", "s3cret", 7).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(Uuid::new_v4(), "ada@example.com", "s3cret", -2).unwrap();
        assert!(verify_token(&token, "s3cret").is_err());
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let err = issue_token(Uuid::nil(), "a@b.c", "s", i64::MAX / 1000).unwrap_err();
        assert!(matches!(err, AuthError::TokenLifetime(_)));
        assert!(issue_token(Uuid::nil(), "a@b.c", "s", i64::MIN).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verify_token("not.a.jwt", "s3cret").is_err());
    }
}
