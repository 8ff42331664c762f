// Subscription lifecycle service.
// Activation runs expire -> insert -> payment -> company update as one
// transaction; reconciliation writes `expired` so read paths never derive
// status from dates.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    BillingPlan, CompanyStatus, NewPayment, NewSubscription, Payment, PaymentStatus, Subscription,
    SubscriptionStatus,
};

#[derive(Error, Debug)]
pub enum SubscriptionError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

/// Everything needed to activate a company's subscription after payment
#[derive(Debug, Clone)]
pub struct ActivationRequest {
    pub company_id: Uuid,
    /// Display label, e.g. "Growth"
    pub plan_name: String,
    pub plan: BillingPlan,
    pub payment_id: String,
    pub order_reference: String,
    pub payment_method: String,
    pub billing_email: String,
    /// Minor units
    pub amount: i32,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct ActivationResult {
    pub subscription: Subscription,
    pub payment: Payment,
}

pub struct SubscriptionService;

impl SubscriptionService {
    /// Activate a subscription for a company.
    /// Any previously active row ends today; the company row flips to
    /// active with the new plan and term.
    pub async fn activate(
        conn: &mut AsyncPgConnection,
        request: ActivationRequest,
    ) -> Result<ActivationResult, SubscriptionError> {
        let today = Utc::now().date_naive();
        let end = today + Duration::days(request.plan.duration_days());

        let result = conn
            .transaction::<ActivationResult, diesel::result::Error, _>(|conn| {
                async move {
                    Subscription::expire_active_for_company(conn, request.company_id, today)
                        .await?;

                    let subscription = Subscription::create(
                        conn,
                        NewSubscription {
                            company_id: request.company_id,
                            plan: request.plan.as_str().to_string(),
                            status: SubscriptionStatus::Active.as_str().to_string(),
                            start_date: today,
                            end_date: end,
                            payment_reference: Some(request.payment_id.clone()),
                        },
                    )
                    .await?;

                    let payment = Payment::create(
                        conn,
                        NewPayment {
                            company_id: request.company_id,
                            subscription_id: subscription.id,
                            order_reference: request.order_reference.clone(),
                            payment_reference: request.payment_id.clone(),
                            status: request.payment_status.as_str().to_string(),
                            amount: request.amount,
                            currency: request.currency.clone(),
                            payment_method: Some(request.payment_method.clone()),
                            paid_at: request.paid_at,
                        },
                    )
                    .await?;

                    {
                        use crate::schema::companies::dsl::*;
                        diesel::update(companies.filter(id.eq(request.company_id)))
                            .set((
                                subscription_status.eq(CompanyStatus::Active.as_str()),
                                plan_name.eq(request.plan_name.clone()),
                                subscription_plan.eq(request.plan.as_str()),
                                subscription_start_date.eq(today),
                                subscription_end_date.eq(end),
                                payment_method.eq(request.payment_method.clone()),
                                billing_contact_email.eq(request.billing_email.clone()),
                                updated_at.eq(diesel::dsl::now),
                            ))
                            .execute(conn)
                            .await?;
                    }

                    Ok(ActivationResult {
                        subscription,
                        payment,
                    })
                }
                .scope_boxed()
            })
            .await?;

        Ok(result)
    }

    /// Reconciliation sweep: write `expired` on lapsed subscriptions, then
    /// downgrade companies whose windows have ended. Returns the number of
    /// subscription and company rows written.
    pub async fn reconcile_expired(
        conn: &mut AsyncPgConnection,
        today: NaiveDate,
    ) -> Result<(usize, usize), SubscriptionError> {
        let expired_subs = Subscription::expire_lapsed(conn, today).await?;

        let mut expired_companies = 0;

        // Trials that ran out
        {
            use crate::schema::companies::dsl::*;
            expired_companies += diesel::update(
                companies
                    .filter(subscription_status.eq(CompanyStatus::Trial.as_str()))
                    .filter(trial_end_date.lt(today)),
            )
            .set((
                subscription_status.eq(CompanyStatus::Expired.as_str()),
                updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)
            .await?;
        }

        // Active companies whose term ended and that have no live
        // subscription left after the sweep above
        let lapsed: Vec<Uuid> = {
            use crate::schema::companies::dsl::*;
            companies
                .filter(subscription_status.eq(CompanyStatus::Active.as_str()))
                .filter(subscription_end_date.lt(today))
                .select(id)
                .load::<Uuid>(conn)
                .await?
        };

        for company in lapsed {
            if Subscription::find_active_by_company(conn, company)
                .await?
                .is_none()
            {
                use crate::schema::companies::dsl::*;
                expired_companies += diesel::update(companies.filter(id.eq(company)))
                    .set((
                        subscription_status.eq(CompanyStatus::Expired.as_str()),
                        updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(conn)
                    .await?;
            }
        }

        Ok((expired_subs, expired_companies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_end_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(
            start + Duration::days(BillingPlan::Monthly.duration_days()),
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
        );
        assert_eq!(
            start + Duration::days(BillingPlan::Yearly.duration_days()),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
    }
}
