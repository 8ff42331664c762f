// Billing plan resolution and subscription term tests

use chrono::{Duration, NaiveDate};
use vms_backend_core::models::{BillingPlan, PaymentStatus};
use vms_backend_core::services::razorpay::order_reference_or_placeholder;

#[test]
fn test_cycle_resolution() {
    assert_eq!(
        BillingPlan::resolve("monthly", "Starter"),
        BillingPlan::Monthly
    );
    assert_eq!(
        BillingPlan::resolve("yearly", "Starter"),
        BillingPlan::Yearly
    );
    assert_eq!(
        BillingPlan::resolve("annual", "Starter"),
        BillingPlan::Yearly
    );
    // Unknown cycles default to a monthly term
    assert_eq!(BillingPlan::resolve("weekly", "Starter"), BillingPlan::Monthly);
}

#[test]
fn test_enterprise_overrides_cycle_label_only() {
    let plan = BillingPlan::resolve("yearly", "Enterprise");
    assert_eq!(plan, BillingPlan::Enterprise);
    // Enterprise is a label override; the term stays monthly-length
    assert_eq!(plan.duration_days(), 30);
}

#[test]
fn test_monthly_term_is_thirty_days() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let end = start + Duration::days(BillingPlan::Monthly.duration_days());
    assert_eq!(end, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
}

#[test]
fn test_yearly_term_is_365_days() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let end = start + Duration::days(BillingPlan::Yearly.duration_days());
    assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
}

#[test]
fn test_order_reference_never_null() {
    assert_eq!(
        order_reference_or_placeholder(Some("order_7".to_string()), "pay_1"),
        "order_7"
    );
    assert_eq!(
        order_reference_or_placeholder(None, "pay_1"),
        "NO_ORDER_pay_1"
    );
    assert_eq!(order_reference_or_placeholder(None, ""), "NO_ORDER_UNKNOWN");
}

#[test]
fn test_gateway_status_taxonomy() {
    assert_eq!(PaymentStatus::from_gateway("captured"), PaymentStatus::Paid);
    assert_eq!(PaymentStatus::from_gateway("failed"), PaymentStatus::Failed);
    assert_eq!(
        PaymentStatus::from_gateway("authorized"),
        PaymentStatus::Created
    );
    assert_eq!(PaymentStatus::Paid.as_str(), "paid");
    assert_eq!(PaymentStatus::Created.as_str(), "created");
}
