// Email verification token model.
// Only the SHA-256 hash of the emailed token is stored; tokens are
// single-use with a 24-hour expiry.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::email_verification_tokens;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = email_verification_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmailVerificationToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = email_verification_tokens)]
pub struct NewEmailVerificationToken {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl EmailVerificationToken {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_token: NewEmailVerificationToken,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::email_verification_tokens::dsl::*;

        diesel::insert_into(email_verification_tokens)
            .values(&new_token)
            .get_result(conn)
            .await
    }

    pub async fn find_by_hash(
        conn: &mut AsyncPgConnection,
        hash: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::email_verification_tokens::dsl::*;

        email_verification_tokens
            .filter(token_hash.eq(hash))
            .first::<EmailVerificationToken>(conn)
            .await
            .optional()
    }

    pub async fn mark_used(
        conn: &mut AsyncPgConnection,
        token_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::email_verification_tokens::dsl::*;

        diesel::update(email_verification_tokens.filter(id.eq(token_id)))
            .set(used_at.eq(diesel::dsl::now))
            .execute(conn)
            .await
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_token(expires_in: i64, used: bool) -> EmailVerificationToken {
        let now = Utc::now();
        EmailVerificationToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "a".repeat(64),
            expires_at: now + Duration::seconds(expires_in),
            used_at: if used { Some(now) } else { None },
            created_at: now,
        }
    }

    #[test]
    fn test_expiry_check() {
        let now = Utc::now();
        assert!(!sample_token(3600, false).is_expired(now));
        assert!(sample_token(-1, false).is_expired(now));
    }

    #[test]
    fn test_used_check() {
        assert!(sample_token(3600, true).is_used());
        assert!(!sample_token(3600, false).is_used());
    }
}
