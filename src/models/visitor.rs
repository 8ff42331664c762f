// Visitor database model.
// A new row is inserted on every check-in; rows sharing an email represent
// the same person, which is why blacklisting always updates by email.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::visitors;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = visitors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Visitor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub photo: Option<String>,
    pub id_card_photo: Option<String>,
    pub id_card_number: Option<String>,
    pub id_card_type: Option<String>,
    pub company_tel: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub is_blacklisted: bool,
    pub reason_for_blacklist: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visitors)]
pub struct NewVisitor {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub photo: Option<String>,
    pub id_card_photo: Option<String>,
    pub id_card_number: Option<String>,
    pub id_card_type: Option<String>,
    pub company_tel: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl Visitor {
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        visitor_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::visitors::dsl::*;

        visitors
            .filter(id.eq(visitor_id))
            .first::<Visitor>(conn)
            .await
            .optional()
    }

    /// Blacklist enforcement is global by email, not scoped to a company
    pub async fn is_email_blacklisted(
        conn: &mut AsyncPgConnection,
        email_str: &str,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::visitors::dsl::*;

        let count: i64 = visitors
            .filter(email.eq(email_str))
            .filter(is_blacklisted.eq(true))
            .count()
            .get_result(conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_visitor: NewVisitor,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::visitors::dsl::*;

        diesel::insert_into(visitors)
            .values(&new_visitor)
            .get_result(conn)
            .await
    }

    /// Flag or unflag every visitor row sharing this email address.
    /// Returns the number of rows updated.
    pub async fn set_blacklist_by_email(
        conn: &mut AsyncPgConnection,
        email_str: &str,
        blacklisted: bool,
        reason: Option<String>,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::visitors::dsl::*;

        diesel::update(visitors.filter(email.eq(email_str)))
            .set((
                is_blacklisted.eq(blacklisted),
                reason_for_blacklist.eq(reason),
            ))
            .execute(conn)
            .await
    }

    /// Distinct blacklisted visitors, newest row per email first
    pub async fn list_blacklisted(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::visitors::dsl::*;

        visitors
            .filter(is_blacklisted.eq(true))
            .order(created_at.desc())
            .load::<Visitor>(conn)
            .await
    }
}
