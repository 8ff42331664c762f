// Support ticket database model, raised by tenants and worked from the
// admin portal

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::support_tickets;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Rejected,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
            TicketStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            "rejected" => Ok(TicketStatus::Rejected),
            _ => Err(format!("Invalid ticket status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }
}

impl FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            _ => Err(format!("Invalid ticket priority: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = support_tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SupportTicket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub category: Option<String>,
    pub created_by_company: String,
    pub created_by_email: Option<String>,
    pub assigned_admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = support_tickets)]
pub struct NewSupportTicket {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub category: Option<String>,
    pub created_by_company: String,
    pub created_by_email: Option<String>,
}

impl SupportTicket {
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        ticket_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::support_tickets::dsl::*;

        support_tickets
            .filter(id.eq(ticket_id))
            .first::<SupportTicket>(conn)
            .await
            .optional()
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_ticket: NewSupportTicket,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::support_tickets::dsl::*;

        diesel::insert_into(support_tickets)
            .values(&new_ticket)
            .get_result(conn)
            .await
    }

    /// Latest tickets for the admin portal, newest first
    pub async fn list_latest(
        conn: &mut AsyncPgConnection,
        limit: i64,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::support_tickets::dsl::*;

        support_tickets
            .order(created_at.desc())
            .limit(limit)
            .load::<SupportTicket>(conn)
            .await
    }

    /// Non-closed tickets raised by this email
    pub async fn list_open_by_email(
        conn: &mut AsyncPgConnection,
        email: &str,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::support_tickets::dsl::*;

        support_tickets
            .filter(status.ne(TicketStatus::Closed.as_str()))
            .filter(created_by_email.eq(email))
            .order(created_at.desc())
            .limit(200)
            .load::<SupportTicket>(conn)
            .await
    }

    pub async fn count_open(conn: &mut AsyncPgConnection) -> Result<i64, diesel::result::Error> {
        use crate::schema::support_tickets::dsl::*;

        support_tickets
            .filter(status.eq(TicketStatus::Open.as_str()))
            .count()
            .get_result(conn)
            .await
    }

    pub async fn update_triage(
        conn: &mut AsyncPgConnection,
        ticket_id: Uuid,
        changes: TicketUpdate,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::support_tickets::dsl::*;

        diesel::update(support_tickets.filter(id.eq(ticket_id)))
            .set(&changes)
            .get_result::<SupportTicket>(conn)
            .await
            .optional()
    }
}

/// Triage changeset; None fields are left untouched
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = support_tickets)]
pub struct TicketUpdate {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_admin_id: Option<Option<Uuid>>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_status_round_trip() {
        for status in [
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
            TicketStatus::Closed,
            TicketStatus::Rejected,
        ] {
            assert_eq!(TicketStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(TicketStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_ticket_priority_round_trip() {
        assert_eq!(TicketPriority::from_str("low"), Ok(TicketPriority::Low));
        assert_eq!(
            TicketPriority::from_str("medium"),
            Ok(TicketPriority::Medium)
        );
        assert_eq!(TicketPriority::from_str("high"), Ok(TicketPriority::High));
        assert!(TicketPriority::from_str("urgent").is_err());
    }
}
