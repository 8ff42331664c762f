// Company database model - the tenant root

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::companies;

/// Company subscription status lifecycle: trial -> active -> expired.
/// Status is always written explicitly, never re-derived from dates at
/// read time; the background reconciler owns the expiry transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompanyStatus {
    Trial,
    Active,
    Expired,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Trial => "trial",
            CompanyStatus::Active => "active",
            CompanyStatus::Expired => "expired",
        }
    }
}

impl FromStr for CompanyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(CompanyStatus::Trial),
            "active" => Ok(CompanyStatus::Active),
            "expired" => Ok(CompanyStatus::Expired),
            _ => Err(format!("Invalid company status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Company {
    pub id: Uuid,
    pub company_name: String,
    pub contact_first_name: String,
    pub contact_last_name: String,
    pub contact_email: String,
    pub mobile_number: Option<String>,
    pub subscription_status: String,
    pub plan_name: Option<String>,
    pub subscription_plan: Option<String>,
    pub trial_start_date: NaiveDate,
    pub trial_end_date: NaiveDate,
    pub subscription_start_date: Option<NaiveDate>,
    pub subscription_end_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub billing_contact_email: Option<String>,
    pub admin_company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = companies)]
pub struct NewCompany {
    pub company_name: String,
    pub contact_first_name: String,
    pub contact_last_name: String,
    pub contact_email: String,
    pub mobile_number: Option<String>,
    pub subscription_status: String,
    pub trial_start_date: NaiveDate,
    pub trial_end_date: NaiveDate,
}

impl Company {
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        company_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::companies::dsl::*;

        companies
            .filter(id.eq(company_id))
            .first::<Company>(conn)
            .await
            .optional()
    }

    pub async fn name_exists(
        conn: &mut AsyncPgConnection,
        name: &str,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::companies::dsl::*;

        let count: i64 = companies
            .filter(company_name.eq(name))
            .count()
            .get_result(conn)
            .await?;
        Ok(count > 0)
    }

    /// Create the tenant root and set the admin_company_id self-reference
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_company: NewCompany,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::companies::dsl::*;

        let company: Company = diesel::insert_into(companies)
            .values(&new_company)
            .get_result(conn)
            .await?;

        diesel::update(companies.filter(id.eq(company.id)))
            .set(admin_company_id.eq(company.id))
            .get_result::<Company>(conn)
            .await
    }

    pub fn status_enum(&self) -> CompanyStatus {
        CompanyStatus::from_str(&self.subscription_status).unwrap_or_else(|e| {
            tracing::warn!(
                "Invalid subscription status '{}' for company {}, treating as expired: {}",
                self.subscription_status,
                self.id,
                e
            );
            CompanyStatus::Expired
        })
    }

    pub async fn list_all(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::companies::dsl::*;

        companies
            .order(created_at.desc())
            .load::<Company>(conn)
            .await
    }

    pub async fn count_all(conn: &mut AsyncPgConnection) -> Result<i64, diesel::result::Error> {
        use crate::schema::companies::dsl::*;
        companies.count().get_result(conn).await
    }

    pub async fn count_by_status(
        conn: &mut AsyncPgConnection,
        status_value: &str,
    ) -> Result<i64, diesel::result::Error> {
        use crate::schema::companies::dsl::*;
        companies
            .filter(subscription_status.eq(status_value))
            .count()
            .get_result(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(CompanyStatus::from_str("trial"), Ok(CompanyStatus::Trial));
        assert_eq!(CompanyStatus::from_str("active"), Ok(CompanyStatus::Active));
        assert_eq!(
            CompanyStatus::from_str("expired"),
            Ok(CompanyStatus::Expired)
        );
        assert!(CompanyStatus::from_str("inactive").is_err());
        assert_eq!(CompanyStatus::Trial.as_str(), "trial");
    }
}
