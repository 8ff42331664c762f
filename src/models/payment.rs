// Payment database model - one payment attempt/result tied to a
// subscription and company. Amounts are stored in minor units.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::payments;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Payment {
    pub id: Uuid,
    pub company_id: Uuid,
    pub subscription_id: Uuid,
    pub order_reference: String,
    pub payment_reference: String,
    pub status: String,
    pub amount: i32,
    pub currency: String,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub company_id: Uuid,
    pub subscription_id: Uuid,
    pub order_reference: String,
    pub payment_reference: String,
    pub status: String,
    pub amount: i32,
    pub currency: String,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Failed,
    Created,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Created => "created",
        }
    }

    /// Map a gateway status string onto the local taxonomy
    pub fn from_gateway(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "captured" | "paid" => PaymentStatus::Paid,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Created,
        }
    }
}

impl Payment {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_payment: NewPayment,
    ) -> Result<Self, diesel::result::Error> {
        use crate::schema::payments::dsl::*;

        diesel::insert_into(payments)
            .values(&new_payment)
            .get_result(conn)
            .await
    }

    pub async fn list_all(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        use crate::schema::payments::dsl::*;

        payments.order(created_at.desc()).load::<Payment>(conn).await
    }

    /// Sum of paid amounts since `from`, in minor units
    pub async fn paid_amount_since(
        conn: &mut AsyncPgConnection,
        from: DateTime<Utc>,
    ) -> Result<i64, diesel::result::Error> {
        use crate::schema::payments::dsl::*;
        use diesel::dsl::sum;

        let total: Option<i64> = payments
            .filter(status.eq(PaymentStatus::Paid.as_str()))
            .filter(created_at.ge(from))
            .select(sum(amount))
            .get_result(conn)
            .await?;
        Ok(total.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_status_mapping() {
        assert_eq!(PaymentStatus::from_gateway("captured"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_gateway("paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_gateway("failed"), PaymentStatus::Failed);
        assert_eq!(
            PaymentStatus::from_gateway("authorized"),
            PaymentStatus::Created
        );
        assert_eq!(PaymentStatus::from_gateway(""), PaymentStatus::Created);
    }
}
