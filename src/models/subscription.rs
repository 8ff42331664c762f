// Subscription database model - one billing period for a company.
// At most one active row per company; the activation path expires the
// previous row and inserts the new one inside a single transaction.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::subscriptions;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "expired" => Ok(SubscriptionStatus::Expired),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

/// Billing plan. Enterprise overrides the plan label only; its term is a
/// monthly-length period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingPlan {
    Monthly,
    Yearly,
    Enterprise,
}

impl BillingPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPlan::Monthly => "monthly",
            BillingPlan::Yearly => "yearly",
            BillingPlan::Enterprise => "enterprise",
        }
    }

    /// Subscription term in days
    pub fn duration_days(&self) -> i64 {
        match self {
            BillingPlan::Monthly => 30,
            BillingPlan::Yearly => 365,
            BillingPlan::Enterprise => 30,
        }
    }

    /// Resolve the stored plan value from the billing cycle and plan name.
    /// An "enterprise" plan name overrides whatever cycle was supplied.
    pub fn resolve(billing_cycle: &str, plan_name: &str) -> Self {
        if plan_name.eq_ignore_ascii_case("enterprise") {
            return BillingPlan::Enterprise;
        }
        match billing_cycle.to_lowercase().as_str() {
            "yearly" | "annual" => BillingPlan::Yearly,
            _ => BillingPlan::Monthly,
        }
    }
}

impl FromStr for BillingPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BillingPlan::Monthly),
            "yearly" => Ok(BillingPlan::Yearly),
            "enterprise" => Ok(BillingPlan::Enterprise),
            _ => Err(format!("Invalid billing plan: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscription {
    pub id: Uuid,
    pub company_id: Uuid,
    pub plan: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct NewSubscription {
    pub company_id: Uuid,
    pub plan: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_reference: Option<String>,
}

impl Subscription {
    pub async fn find_active_by_company(
        conn: &mut AsyncPgConnection,
        company: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::subscriptions::dsl::*;

        subscriptions
            .filter(company_id.eq(company))
            .filter(status.eq(SubscriptionStatus::Active.as_str()))
            .first::<Subscription>(conn)
            .await
            .optional()
    }

    /// Expire any currently-active subscription, closing it as of `today`.
    /// Returns the number of rows expired.
    pub async fn expire_active_for_company(
        conn: &mut AsyncPgConnection,
        company: Uuid,
        today: NaiveDate,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::subscriptions::dsl::*;

        diesel::update(
            subscriptions
                .filter(company_id.eq(company))
                .filter(status.eq(SubscriptionStatus::Active.as_str())),
        )
        .set((
            status.eq(SubscriptionStatus::Expired.as_str()),
            end_date.eq(today),
            updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_subscription: NewSubscription,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::subscriptions::dsl::*;

        diesel::insert_into(subscriptions)
            .values(&new_subscription)
            .get_result(conn)
            .await
    }

    /// Reconciliation sweep: expire every active subscription whose term
    /// has ended. Returns the number of rows written.
    pub async fn expire_lapsed(
        conn: &mut AsyncPgConnection,
        today: NaiveDate,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::subscriptions::dsl::*;

        diesel::update(
            subscriptions
                .filter(status.eq(SubscriptionStatus::Active.as_str()))
                .filter(end_date.lt(today)),
        )
        .set((
            status.eq(SubscriptionStatus::Expired.as_str()),
            updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await
    }

    pub async fn list_all(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::subscriptions::dsl::*;

        subscriptions
            .order(created_at.desc())
            .load::<Subscription>(conn)
            .await
    }

    pub fn status_enum(&self) -> Result<SubscriptionStatus, String> {
        SubscriptionStatus::from_str(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_plan_resolution() {
        assert_eq!(BillingPlan::resolve("monthly", "Growth"), BillingPlan::Monthly);
        assert_eq!(BillingPlan::resolve("yearly", "Growth"), BillingPlan::Yearly);
        assert_eq!(BillingPlan::resolve("annual", "Growth"), BillingPlan::Yearly);
        assert_eq!(BillingPlan::resolve("", "Growth"), BillingPlan::Monthly);
        // Enterprise plan name overrides the cycle
        assert_eq!(
            BillingPlan::resolve("yearly", "Enterprise"),
            BillingPlan::Enterprise
        );
    }

    #[test]
    fn test_plan_durations() {
        assert_eq!(BillingPlan::Monthly.duration_days(), 30);
        assert_eq!(BillingPlan::Yearly.duration_days(), 365);
        assert_eq!(BillingPlan::Enterprise.duration_days(), 30);
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            SubscriptionStatus::from_str("active"),
            Ok(SubscriptionStatus::Active)
        );
        assert_eq!(
            SubscriptionStatus::from_str("expired"),
            Ok(SubscriptionStatus::Expired)
        );
        assert!(SubscriptionStatus::from_str("inactive").is_err());
    }
}
