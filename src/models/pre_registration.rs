// Pre-registration database model - an expected future visit redeemable
// via QR token at actual arrival.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::pre_registrations;

/// Lifecycle: pending -> approved -> checked-in -> checked_out.
/// Redemption is only valid while status is pending or approved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PreRegistrationStatus {
    Pending,
    Approved,
    CheckedIn,
    CheckedOut,
}

impl PreRegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreRegistrationStatus::Pending => "pending",
            PreRegistrationStatus::Approved => "approved",
            PreRegistrationStatus::CheckedIn => "checked-in",
            // Historical spelling kept for API compatibility
            PreRegistrationStatus::CheckedOut => "checked_out",
        }
    }

    pub fn is_redeemable(&self) -> bool {
        matches!(
            self,
            PreRegistrationStatus::Pending | PreRegistrationStatus::Approved
        )
    }
}

impl FromStr for PreRegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PreRegistrationStatus::Pending),
            "approved" => Ok(PreRegistrationStatus::Approved),
            "checked-in" => Ok(PreRegistrationStatus::CheckedIn),
            "checked_out" => Ok(PreRegistrationStatus::CheckedOut),
            _ => Err(format!("Invalid pre-registration status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = pre_registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PreRegistration {
    pub id: Uuid,
    pub company_id: Uuid,
    pub host_id: Option<Uuid>,
    pub host_name: Option<String>,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: Option<String>,
    pub visitor_company: Option<String>,
    pub company_to_visit: String,
    pub visit_date: NaiveDate,
    pub visit_time: Option<String>,
    pub purpose: String,
    pub duration: Option<String>,
    pub special_requirements: Option<String>,
    pub emergency_contact: Option<String>,
    pub vehicle_number: Option<String>,
    pub number_of_visitors: i32,
    pub qr_code: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pre_registrations)]
pub struct NewPreRegistration {
    pub company_id: Uuid,
    pub host_id: Option<Uuid>,
    pub host_name: Option<String>,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: Option<String>,
    pub visitor_company: Option<String>,
    pub company_to_visit: String,
    pub visit_date: NaiveDate,
    pub visit_time: Option<String>,
    pub purpose: String,
    pub duration: Option<String>,
    pub special_requirements: Option<String>,
    pub emergency_contact: Option<String>,
    pub vehicle_number: Option<String>,
    pub number_of_visitors: i32,
    pub qr_code: String,
    pub status: String,
}

impl PreRegistration {
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        pre_reg_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::pre_registrations::dsl::*;

        pre_registrations
            .filter(id.eq(pre_reg_id))
            .first::<PreRegistration>(conn)
            .await
            .optional()
    }

    /// Exact QR token lookup among still-redeemable registrations
    pub async fn find_redeemable_by_qr(
        conn: &mut AsyncPgConnection,
        code: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::pre_registrations::dsl::*;

        pre_registrations
            .filter(qr_code.eq(code))
            .filter(status.eq_any(vec![
                PreRegistrationStatus::Pending.as_str(),
                PreRegistrationStatus::Approved.as_str(),
            ]))
            .first::<PreRegistration>(conn)
            .await
            .optional()
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_pre_reg: NewPreRegistration,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::pre_registrations::dsl::*;

        diesel::insert_into(pre_registrations)
            .values(&new_pre_reg)
            .get_result(conn)
            .await
    }

    pub async fn set_status(
        conn: &mut AsyncPgConnection,
        pre_reg_id: Uuid,
        new_status: PreRegistrationStatus,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::pre_registrations::dsl::*;

        diesel::update(pre_registrations.filter(id.eq(pre_reg_id)))
            .set((
                status.eq(new_status.as_str()),
                updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)
            .await
    }

    pub async fn list_by_company(
        conn: &mut AsyncPgConnection,
        company: Uuid,
        status_filter: Option<PreRegistrationStatus>,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::pre_registrations::dsl::*;

        let mut query = pre_registrations
            .filter(company_id.eq(company))
            .into_boxed();

        if let Some(s) = status_filter {
            query = query.filter(status.eq(s.as_str()));
        }

        query
            .order(created_at.desc())
            .load::<PreRegistration>(conn)
            .await
    }

    pub fn status_enum(&self) -> Result<PreRegistrationStatus, String> {
        PreRegistrationStatus::from_str(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            PreRegistrationStatus::Pending,
            PreRegistrationStatus::Approved,
            PreRegistrationStatus::CheckedIn,
            PreRegistrationStatus::CheckedOut,
        ] {
            assert_eq!(
                PreRegistrationStatus::from_str(status.as_str()),
                Ok(status)
            );
        }
        assert!(PreRegistrationStatus::from_str("cancelled").is_err());
    }

    #[test]
    fn test_redeemable_states() {
        assert!(PreRegistrationStatus::Pending.is_redeemable());
        assert!(PreRegistrationStatus::Approved.is_redeemable());
        assert!(!PreRegistrationStatus::CheckedIn.is_redeemable());
        assert!(!PreRegistrationStatus::CheckedOut.is_redeemable());
    }

    #[test]
    fn test_checked_out_keeps_historical_spelling() {
        // The stored value is underscore-spelled, unlike visit status
        assert_eq!(PreRegistrationStatus::CheckedOut.as_str(), "checked_out");
    }
}
