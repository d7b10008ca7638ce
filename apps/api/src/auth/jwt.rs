// JWT issuing and verification for API sessions
// HS256 tokens carrying the user id in `sub`

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Issues a signed token for `user_id`, valid for `expiry_hours`
///
/// # Example
/// ```
/// use todo_assistant_api::auth::jwt::{create_token, verify_token};
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(user_id, "secret", 8).expect("valid token");
/// assert_eq!(verify_token(&token, "secret").unwrap().sub, user_id);
/// ```
pub fn create_token(user_id: Uuid, secret: &str, expiry_hours: i64) -> Result<String, String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies signature and expiry, returning the decoded claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn create_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, TEST_SECRET, 8).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = create_token(Uuid::new_v4(), TEST_SECRET, 8).expect("valid token");
        assert!(verify_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn garbage_token_fails() {
        assert!(verify_token("invalid.token.string", TEST_SECRET).is_err());
    }

    #[test]
    fn expired_token_fails() {
        // Well past the default 60s leeway
        let token = create_token(Uuid::new_v4(), TEST_SECRET, -1).expect("valid token");
        assert!(verify_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn expiry_follows_configuration() {
        let token = create_token(Uuid::new_v4(), TEST_SECRET, 2).expect("valid token");
        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");

        assert_eq!(claims.exp - claims.iat, 2 * 3600);
        assert!(claims.iat <= Utc::now().timestamp());
    }
}
