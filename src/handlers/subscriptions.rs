// Subscription handlers: post-payment activation and public pricing plans

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    app::AppState,
    models::{BillingPlan, PaymentStatus, PricingPlan, User, UserError},
    services::razorpay::order_reference_or_placeholder,
    services::subscription::{ActivationRequest, SubscriptionService},
    utils::ServiceError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub email: Option<String>,
    pub plan_name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    pub payment_id: Option<String>,
    #[serde(default, alias = "payment_method")]
    pub payment_method: Option<String>,
    #[serde(default, alias = "billing_cycle")]
    pub billing_cycle: Option<String>,
    #[serde(default, alias = "billing_contact_email")]
    pub billing_contact_email: Option<String>,
}

/// POST /api/subscription/create - Activate a company subscription after
/// an external payment event.
///
/// The gateway lookup is a soft dependency: activation proceeds with
/// client-supplied values whenever it fails.
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_lowercase();
    let plan_name = request
        .plan_name
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();
    let payment_id = request
        .payment_id
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();

    if email.is_empty() || plan_name.is_empty() || payment_id.is_empty() {
        return Err(ServiceError::ValidationError(
            "Email, planName and paymentId are required".to_string(),
        ));
    }

    let mut conn = state.diesel_pool.get().await?;

    let user = match User::find_by_email(&mut conn, &email).await {
        Ok(user) if user.is_active => user,
        Ok(_) | Err(UserError::NotFound) => return Err(ServiceError::NotFound("User")),
        Err(e) => return Err(ServiceError::DatabaseError(e.to_string())),
    };
    let company_id = user.company_id;

    // Best-effort enrichment from the payment gateway
    let gateway = state.razorpay_client.fetch_payment(&payment_id).await;

    let billing_cycle = request
        .billing_cycle
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_lowercase();
    let plan = BillingPlan::resolve(&billing_cycle, &plan_name);

    let payment_method = request
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .or_else(|| gateway.as_ref().and_then(|g| g.method_label()))
        .unwrap_or_else(|| "razorpay".to_string());

    let billing_email = request
        .billing_contact_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(String::from)
        .or_else(|| gateway.as_ref().and_then(|g| g.email.clone()))
        .unwrap_or_else(|| email.clone());

    let order_reference = order_reference_or_placeholder(
        gateway.as_ref().and_then(|g| g.order_id.clone()),
        &payment_id,
    );

    // Gateway amounts are already in minor units; client amounts are major
    let amount = gateway
        .as_ref()
        .and_then(|g| g.amount)
        .map(|a| a as i32)
        .or_else(|| request.amount.map(|a| (a * 100.0).round() as i32))
        .unwrap_or(0);

    let currency = gateway
        .as_ref()
        .and_then(|g| g.currency.clone())
        .unwrap_or_else(|| "INR".to_string());

    let payment_status = gateway
        .as_ref()
        .and_then(|g| g.status.as_deref())
        .map(PaymentStatus::from_gateway)
        .unwrap_or(PaymentStatus::Paid);

    let paid_at: Option<DateTime<Utc>> = gateway
        .as_ref()
        .and_then(|g| g.created_at)
        .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
        .or_else(|| Some(Utc::now()));

    let result = SubscriptionService::activate(
        &mut conn,
        ActivationRequest {
            company_id,
            plan_name: plan_name.clone(),
            plan,
            payment_id,
            order_reference,
            payment_method,
            billing_email,
            amount,
            currency,
            payment_status,
            paid_at,
        },
    )
    .await
    .map_err(|e| {
        tracing::error!("Error creating subscription: {}", e);
        ServiceError::InternalError
    })?;

    tracing::info!(
        company_id = %company_id,
        subscription_id = %result.subscription.id,
        plan = %result.subscription.plan,
        "Subscription activated"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Subscription created successfully",
            "subscriptionId": result.subscription.id,
        })),
    ))
}

/// GET /api/pricing/plans - Publicly visible pricing plans
pub async fn get_pricing_plans(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let plans = PricingPlan::list_active(&mut conn).await?;

    Ok(Json(serde_json::json!({
        "plans": plans,
        "total": plans.len(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_both_naming_styles() {
        let json = serde_json::json!({
            "email": "ada@acme.test",
            "planName": "Growth",
            "paymentId": "pay_123",
            "billing_cycle": "yearly",
            "billing_contact_email": "billing@acme.test"
        });
        let request: CreateSubscriptionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.billing_cycle.as_deref(), Some("yearly"));
        assert_eq!(
            request.billing_contact_email.as_deref(),
            Some("billing@acme.test")
        );
    }

    #[test]
    fn test_major_unit_amount_conversion() {
        let amount = Some(499.0_f64).map(|a| (a * 100.0).round() as i32);
        assert_eq!(amount, Some(49900));
    }
}
