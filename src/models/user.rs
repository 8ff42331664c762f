// Tenant user database model (company admins and hosts)

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::config::Role;
use crate::schema::users;

/// User database model - queryable from database
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub mobile_number: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user for insertion
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub mobile_number: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
}

/// Errors for user operations
#[derive(thiserror::Error, Debug)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("User not found")]
    NotFound,

    #[error("Connection pool error")]
    Pool(String),
}

impl User {
    /// Find user by ID
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .first::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UserError::NotFound,
                _ => UserError::Database(e),
            })
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;
        use diesel::PgTextExpressionMethods;

        users
            .filter(email.ilike(email_str))
            .first::<User>(conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => UserError::NotFound,
                _ => UserError::Database(e),
            })
    }

    /// Find a host or admin by display name within a company.
    /// Unknown names are the caller's problem - there is no fallback to an
    /// arbitrary company employee.
    pub async fn find_host_by_name(
        conn: &mut AsyncPgConnection,
        company: Uuid,
        name: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::users::dsl::*;

        users
            .filter(company_id.eq(company))
            .filter(full_name.eq(name))
            .filter(role.eq_any(vec!["host", "admin"]))
            .first::<User>(conn)
            .await
            .optional()
    }

    /// Create a new user
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_user: NewUser,
    ) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        diesel::insert_into(users)
            .values(&new_user)
            .get_result::<User>(conn)
            .await
            .map_err(UserError::Database)
    }

    /// Mark the user's email as verified
    pub async fn mark_verified(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set((is_verified.eq(true), updated_at.eq(diesel::dsl::now)))
            .execute(conn)
            .await
    }

    /// Record a successful login
    pub async fn touch_last_login(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set(last_login_at.eq(diesel::dsl::now))
            .execute(conn)
            .await
    }

    pub async fn list_by_company(
        conn: &mut AsyncPgConnection,
        company: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::users::dsl::*;

        users
            .filter(company_id.eq(company))
            .order((role.asc(), full_name.asc()))
            .load::<User>(conn)
            .await
    }

    /// Get the user's role as an enum
    pub fn role_enum(&self) -> Result<Role, String> {
        Role::from_str(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin.as_str()
    }
}
