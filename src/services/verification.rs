// Email verification token service.
// Issues random tokens for the verification link, storing only a SHA-256
// hash; consumption is single-use with a 24-hour expiry.

use chrono::{Duration, Utc};
use diesel_async::AsyncPgConnection;
use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{EmailVerificationToken, NewEmailVerificationToken, User};

const TOKEN_LEN: usize = 32;
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Invalid or unknown token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token already used")]
    TokenUsed,
}

/// Outcome of a successful verification
#[derive(Debug)]
pub struct VerifiedUser {
    pub user_id: Uuid,
    pub already_verified: bool,
}

pub struct VerificationService;

impl VerificationService {
    /// Generate a fresh token for the user and persist its hash.
    /// Returns the plaintext token for the email link.
    pub async fn issue_token(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        ttl_secs: u64,
    ) -> Result<String, VerificationError> {
        let token = Self::random_token();
        let new_token = NewEmailVerificationToken {
            user_id,
            token_hash: Self::hash_token(&token),
            expires_at: Utc::now() + Duration::seconds(ttl_secs as i64),
        };

        EmailVerificationToken::create(conn, new_token).await?;
        Ok(token)
    }

    /// Validate and consume a token, marking the user verified.
    pub async fn consume_token(
        conn: &mut AsyncPgConnection,
        token: &str,
    ) -> Result<VerifiedUser, VerificationError> {
        let record = EmailVerificationToken::find_by_hash(conn, &Self::hash_token(token))
            .await?
            .ok_or(VerificationError::InvalidToken)?;

        if record.is_used() {
            return Err(VerificationError::TokenUsed);
        }
        if record.is_expired(Utc::now()) {
            return Err(VerificationError::TokenExpired);
        }

        let user = User::find_by_id(conn, record.user_id)
            .await
            .map_err(|_| VerificationError::InvalidToken)?;

        EmailVerificationToken::mark_used(conn, record.id).await?;

        if user.is_verified {
            return Ok(VerifiedUser {
                user_id: user.id,
                already_verified: true,
            });
        }

        User::mark_verified(conn, user.id).await?;

        Ok(VerifiedUser {
            user_id: user.id,
            already_verified: false,
        })
    }

    fn random_token() -> String {
        let mut rng = rand::thread_rng();
        (0..TOKEN_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..ALPHANUMERIC.len());
                ALPHANUMERIC[idx] as char
            })
            .collect()
    }

    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hash_is_stable_and_hex() {
        let h1 = VerificationService::hash_token("abc");
        let h2 = VerificationService::hash_token("abc");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_tokens_hash_differently() {
        assert_ne!(
            VerificationService::hash_token("abc"),
            VerificationService::hash_token("abd")
        );
    }

    #[test]
    fn test_random_token_shape() {
        let token = VerificationService::random_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
