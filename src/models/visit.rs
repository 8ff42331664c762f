// Visit database model - one check-in/check-out event.
// Visitor identity is denormalized onto the row for resilience against
// visitor record issues; reads COALESCE from the joined visitor first.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::visits;

/// Visit status state machine: checked-in -> checked-out (terminal)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VisitStatus {
    CheckedIn,
    CheckedOut,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::CheckedIn => "checked-in",
            VisitStatus::CheckedOut => "checked-out",
        }
    }
}

impl FromStr for VisitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checked-in" => Ok(VisitStatus::CheckedIn),
            "checked-out" => Ok(VisitStatus::CheckedOut),
            _ => Err(format!("Invalid visit status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Visit {
    pub id: Uuid,
    pub visitor_id: Uuid,
    pub host_id: Uuid,
    pub company_id: Uuid,
    pub pre_registration_id: Option<Uuid>,
    pub purpose_of_visit: String,
    pub items_carried: Option<String>,
    pub status: String,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub visit_date: NaiveDate,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: Option<String>,
    pub visitor_company: Option<String>,
    pub host_name: String,
    pub host_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visits)]
pub struct NewVisit {
    pub visitor_id: Uuid,
    pub host_id: Uuid,
    pub company_id: Uuid,
    pub pre_registration_id: Option<Uuid>,
    pub purpose_of_visit: String,
    pub items_carried: Option<String>,
    pub status: String,
    pub visit_date: NaiveDate,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: Option<String>,
    pub visitor_company: Option<String>,
    pub host_name: String,
    pub host_email: String,
}

/// Dashboard aggregate counts
#[derive(Debug, Clone, Serialize)]
pub struct VisitCounts {
    pub total_visits: i64,
    pub checked_in: i64,
    pub checked_out: i64,
    pub today_visits: i64,
}

impl Visit {
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        visit_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        visits
            .filter(id.eq(visit_id))
            .first::<Visit>(conn)
            .await
            .optional()
    }

    /// Row-locked lookup for the checkout state machine
    pub async fn find_by_id_for_update(
        conn: &mut AsyncPgConnection,
        visit_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        visits
            .filter(id.eq(visit_id))
            .for_update()
            .first::<Visit>(conn)
            .await
            .optional()
    }

    /// Duplicate check-in guard: find an open visit for this visitor email,
    /// this company, today. Runs with a row lock inside the check-in
    /// transaction; the partial unique index is the backstop.
    pub async fn find_open_checkin_for_update(
        conn: &mut AsyncPgConnection,
        email: &str,
        company: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        visits
            .filter(visitor_email.eq(email))
            .filter(company_id.eq(company))
            .filter(visit_date.eq(date))
            .filter(status.eq(VisitStatus::CheckedIn.as_str()))
            .for_update()
            .first::<Visit>(conn)
            .await
            .optional()
    }

    /// Same-day open-visit check used by QR redemption (read-only)
    pub async fn has_open_checkin_today(
        conn: &mut AsyncPgConnection,
        email: &str,
        date: NaiveDate,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        let count: i64 = visits
            .filter(visitor_email.eq(email))
            .filter(visit_date.eq(date))
            .filter(status.eq(VisitStatus::CheckedIn.as_str()))
            .count()
            .get_result(conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_visit: NewVisit,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        diesel::insert_into(visits)
            .values(&new_visit)
            .get_result(conn)
            .await
    }

    /// Close the visit: set check_out_time and flip status
    pub async fn mark_checked_out(
        conn: &mut AsyncPgConnection,
        visit_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        diesel::update(visits.filter(id.eq(visit_id)))
            .set((
                check_out_time.eq(at),
                status.eq(VisitStatus::CheckedOut.as_str()),
            ))
            .execute(conn)
            .await
    }

    /// Company-scoped listing with optional status and date filters
    pub async fn list_by_company(
        conn: &mut AsyncPgConnection,
        company: Uuid,
        status_filter: Option<&str>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        let mut query = visits.filter(company_id.eq(company)).into_boxed();

        if let Some(s) = status_filter {
            query = query.filter(status.eq(s.to_string()));
        }
        if let Some(from) = date_from {
            query = query.filter(visit_date.ge(from));
        }
        if let Some(to) = date_to {
            query = query.filter(visit_date.le(to));
        }

        query
            .order((visit_date.desc(), check_in_time.desc()))
            .load::<Visit>(conn)
            .await
    }

    /// Paginated listing for a single host
    pub async fn list_by_host(
        conn: &mut AsyncPgConnection,
        host: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        visits
            .filter(host_id.eq(host))
            .order(check_in_time.desc())
            .limit(limit)
            .offset(offset)
            .load::<Visit>(conn)
            .await
    }

    pub async fn count_by_host(
        conn: &mut AsyncPgConnection,
        host: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        visits.filter(host_id.eq(host)).count().get_result(conn).await
    }

    pub async fn counts_for_company(
        conn: &mut AsyncPgConnection,
        company: Uuid,
        today: NaiveDate,
    ) -> Result<VisitCounts, diesel::result::Error> {
        use crate::schema::visits::dsl::*;

        let total_visits: i64 = visits
            .filter(company_id.eq(company))
            .count()
            .get_result(conn)
            .await?;
        let checked_in: i64 = visits
            .filter(company_id.eq(company))
            .filter(status.eq(VisitStatus::CheckedIn.as_str()))
            .count()
            .get_result(conn)
            .await?;
        let checked_out: i64 = visits
            .filter(company_id.eq(company))
            .filter(status.eq(VisitStatus::CheckedOut.as_str()))
            .count()
            .get_result(conn)
            .await?;
        let today_visits: i64 = visits
            .filter(company_id.eq(company))
            .filter(visit_date.eq(today))
            .count()
            .get_result(conn)
            .await?;

        Ok(VisitCounts {
            total_visits,
            checked_in,
            checked_out,
            today_visits,
        })
    }

    pub fn status_enum(&self) -> VisitStatus {
        VisitStatus::from_str(&self.status).unwrap_or_else(|e| {
            tracing::warn!("Invalid visit status for visit {}: {}", self.id, e);
            VisitStatus::CheckedOut
        })
    }

    /// A visit may be checked out exactly once
    pub fn is_closed(&self) -> bool {
        self.status == VisitStatus::CheckedOut.as_str() || self.check_out_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_status_round_trip() {
        assert_eq!(
            VisitStatus::from_str("checked-in"),
            Ok(VisitStatus::CheckedIn)
        );
        assert_eq!(
            VisitStatus::from_str("checked-out"),
            Ok(VisitStatus::CheckedOut)
        );
        assert!(VisitStatus::from_str("pending").is_err());
    }

    fn sample_visit(status: &str, check_out: Option<DateTime<Utc>>) -> Visit {
        let now = Utc::now();
        Visit {
            id: Uuid::new_v4(),
            visitor_id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            pre_registration_id: None,
            purpose_of_visit: "Meeting".to_string(),
            items_carried: None,
            status: status.to_string(),
            check_in_time: now,
            check_out_time: check_out,
            visit_date: now.date_naive(),
            visitor_name: "Jane Visitor".to_string(),
            visitor_email: "jane@visitor.test".to_string(),
            visitor_phone: None,
            visitor_company: None,
            host_name: "Hosty Host".to_string(),
            host_email: "host@acme.test".to_string(),
            created_at: now,
        }
    }

    #[test]
    fn test_is_closed_by_status() {
        let visit = sample_visit("checked-out", None);
        assert!(visit.is_closed());
    }

    #[test]
    fn test_is_closed_by_checkout_time() {
        // check_out_time set but status still open counts as closed; a
        // second checkout must be rejected either way
        let visit = sample_visit("checked-in", Some(Utc::now()));
        assert!(visit.is_closed());
    }

    #[test]
    fn test_open_visit_is_not_closed() {
        let visit = sample_visit("checked-in", None);
        assert!(!visit.is_closed());
    }
}
