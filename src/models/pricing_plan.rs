// Pricing plan database model, managed from the admin portal

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::pricing_plans;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = pricing_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PricingPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub currency: String,
    pub billing_cycle: String,
    pub max_users: Option<i32>,
    pub max_visitors_per_month: Option<i32>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pricing_plans)]
pub struct NewPricingPlan {
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub currency: String,
    pub billing_cycle: String,
    pub max_users: Option<i32>,
    pub max_visitors_per_month: Option<i32>,
    pub is_active: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pricing_plans)]
pub struct PricingPlanUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<i32>,
    pub currency: Option<String>,
    pub billing_cycle: Option<String>,
    pub max_users: Option<Option<i32>>,
    pub max_visitors_per_month: Option<Option<i32>>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl PricingPlan {
    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        plan_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        use crate::schema::pricing_plans::dsl::*;

        pricing_plans
            .filter(id.eq(plan_id))
            .first::<PricingPlan>(conn)
            .await
            .optional()
    }

    /// Publicly listed plans, in display order
    pub async fn list_active(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::pricing_plans::dsl::*;

        pricing_plans
            .filter(is_active.eq(true))
            .order((display_order.asc(), price.asc()))
            .load::<PricingPlan>(conn)
            .await
    }

    pub async fn list_all(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::pricing_plans::dsl::*;

        pricing_plans
            .order((display_order.asc(), price.asc()))
            .load::<PricingPlan>(conn)
            .await
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_plan: NewPricingPlan,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::pricing_plans::dsl::*;

        diesel::insert_into(pricing_plans)
            .values(&new_plan)
            .get_result(conn)
            .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        plan_id: Uuid,
        changes: PricingPlanUpdate,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::pricing_plans::dsl::*;

        diesel::update(pricing_plans.filter(id.eq(plan_id)))
            .set(&changes)
            .get_result(conn)
            .await
    }

    pub async fn delete(
        conn: &mut AsyncPgConnection,
        plan_id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::pricing_plans::dsl::*;

        diesel::delete(pricing_plans.filter(id.eq(plan_id)))
            .execute(conn)
            .await
    }
}
