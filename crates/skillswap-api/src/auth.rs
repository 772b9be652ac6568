//! Authentication — argon2id password hashing and JWT token pairs.
//!
//! The original marketplace "logged in" by matching an email against the
//! roster. That is not a security contract; accounts here carry a real
//! password hash and sessions are short-lived bearer tokens.
//!
//! Token kind (access vs refresh) is a typed claim and is checked inside
//! [`validate_token`], so no caller can accidentally accept a refresh token
//! where an access token is required.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use skillswap_common::{
    config::AuthConfig,
    error::{SkillSwapError, SkillSwapResult},
    models::user::User,
};
use uuid::Uuid;

/// Which of the two tokens in a pair this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name, so handlers can log/label without a roster lookup
    pub name: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// Access or refresh
    pub kind: TokenKind,
}

impl Claims {
    /// The subject as a user id.
    pub fn user_id(&self) -> SkillSwapResult<Uuid> {
        self.sub.parse().map_err(|_| SkillSwapError::InvalidToken)
    }
}

/// Token pair returned on login/register.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> SkillSwapResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SkillSwapError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

/// Verify a password against a stored Argon2id hash. A malformed stored hash
/// verifies as false rather than surfacing a distinct error, so login cannot
/// leak which part of the check failed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn issue_token(user: &User, kind: TokenKind, auth: &AuthConfig) -> SkillSwapResult<String> {
    let ttl_secs = match kind {
        TokenKind::Access => auth.access_token_ttl_secs,
        TokenKind::Refresh => auth.refresh_token_ttl_secs,
    };
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
        kind,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| SkillSwapError::Internal(e.into()))
}

/// Issue the access/refresh pair for a user.
pub fn generate_token_pair(user: &User, auth: &AuthConfig) -> SkillSwapResult<TokenPair> {
    Ok(TokenPair {
        access_token: issue_token(user, TokenKind::Access, auth)?,
        refresh_token: issue_token(user, TokenKind::Refresh, auth)?,
        expires_in: auth.access_token_ttl_secs,
        token_type: "Bearer".to_string(),
    })
}

/// Decode a token and require it to be of the expected kind. Bad signatures,
/// expired tokens, and kind mismatches all come back as `InvalidToken`.
pub fn validate_token(token: &str, secret: &str, expected: TokenKind) -> SkillSwapResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| SkillSwapError::InvalidToken)?;

    if data.claims.kind != expected {
        return Err(SkillSwapError::InvalidToken);
    }

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 3600,
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::now_v7(),
            name: "Priya".into(),
            email: "priya@example.com".into(),
            password_hash: String::new(),
            bio: String::new(),
            location: String::new(),
            avatar: None,
            joined_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_verification_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn malformed_stored_hash_verifies_false() {
        assert!(!verify_password("anything", "not-an-argon2-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn token_pair_round_trips_claims() {
        let auth = test_auth_config();
        let user = test_user();
        let pair = generate_token_pair(&user, &auth).unwrap();

        let access = validate_token(&pair.access_token, &auth.jwt_secret, TokenKind::Access).unwrap();
        assert_eq!(access.user_id().unwrap(), user.id);
        assert_eq!(access.name, user.name);

        let refresh =
            validate_token(&pair.refresh_token, &auth.jwt_secret, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
    }

    #[test]
    fn wrong_kind_or_secret_is_rejected() {
        let auth = test_auth_config();
        let pair = generate_token_pair(&test_user(), &auth).unwrap();

        // A refresh token is not an access token and vice versa
        assert!(validate_token(&pair.refresh_token, &auth.jwt_secret, TokenKind::Access).is_err());
        assert!(validate_token(&pair.access_token, &auth.jwt_secret, TokenKind::Refresh).is_err());

        assert!(validate_token(&pair.access_token, "other-secret", TokenKind::Access).is_err());
    }
}
