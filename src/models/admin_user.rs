// Admin-portal staff database model.
// Permissions are not stored; they are derived from the role at login.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::config::AdminRole;
use crate::schema::admin_users;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = admin_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdminUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admin_users)]
pub struct NewAdminUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
}

/// Update changeset; None fields are left untouched
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = admin_users)]
pub struct AdminUserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        admin_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::admin_users::dsl::*;

        admin_users
            .filter(id.eq(admin_id))
            .first::<AdminUser>(conn)
            .await
            .optional()
    }

    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::admin_users::dsl::*;
        use diesel::PgTextExpressionMethods;

        admin_users
            .filter(email.ilike(email_str))
            .first::<AdminUser>(conn)
            .await
            .optional()
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_admin: NewAdminUser,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::admin_users::dsl::*;

        diesel::insert_into(admin_users)
            .values(&new_admin)
            .get_result(conn)
            .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        admin_id: Uuid,
        changes: AdminUserUpdate,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::admin_users::dsl::*;

        diesel::update(admin_users.filter(id.eq(admin_id)))
            .set(&changes)
            .get_result::<AdminUser>(conn)
            .await
            .optional()
    }

    pub async fn delete(
        conn: &mut AsyncPgConnection,
        admin_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::admin_users::dsl::*;

        diesel::delete(admin_users.filter(id.eq(admin_id)))
            .execute(conn)
            .await
    }

    pub async fn list_all(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::admin_users::dsl::*;

        admin_users
            .order(created_at.desc())
            .load::<AdminUser>(conn)
            .await
    }

    pub fn role_enum(&self) -> AdminRole {
        AdminRole::from_str(&self.role).unwrap_or_else(|e| {
            tracing::warn!(
                "Invalid admin role '{}' for {}, downgrading to readonly: {}",
                self.role,
                self.id,
                e
            );
            AdminRole::Readonly
        })
    }
}
