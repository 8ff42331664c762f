// Visit and pre-registration state machine tests (no database required)

use chrono::Utc;
use uuid::Uuid;
use vms_backend_core::models::{PreRegistrationStatus, Visit, VisitStatus};

fn sample_visit(status: VisitStatus, checked_out: bool) -> Visit {
    let now = Utc::now();
    Visit {
        id: Uuid::new_v4(),
        visitor_id: Uuid::new_v4(),
        host_id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
        pre_registration_id: None,
        purpose_of_visit: "Interview".to_string(),
        items_carried: Some("Laptop".to_string()),
        status: status.as_str().to_string(),
        check_in_time: now,
        check_out_time: if checked_out { Some(now) } else { None },
        visit_date: now.date_naive(),
        visitor_name: "Jane Visitor".to_string(),
        visitor_email: "jane@visitor.test".to_string(),
        visitor_phone: Some("555-0100".to_string()),
        visitor_company: Some("Globex".to_string()),
        host_name: "Bob Host".to_string(),
        host_email: "bob@acme.test".to_string(),
        created_at: now,
    }
}

#[test]
fn test_open_visit_can_be_closed() {
    let visit = sample_visit(VisitStatus::CheckedIn, false);
    assert_eq!(visit.status_enum(), VisitStatus::CheckedIn);
    assert!(!visit.is_closed());
}

#[test]
fn test_checkout_is_terminal() {
    // Either signal alone means closed; a second checkout must be refused
    let by_status = sample_visit(VisitStatus::CheckedOut, false);
    assert!(by_status.is_closed());

    let by_time = sample_visit(VisitStatus::CheckedIn, true);
    assert!(by_time.is_closed());

    let both = sample_visit(VisitStatus::CheckedOut, true);
    assert!(both.is_closed());
}

#[test]
fn test_pre_registration_redemption_window() {
    assert!(PreRegistrationStatus::Pending.is_redeemable());
    assert!(PreRegistrationStatus::Approved.is_redeemable());
    assert!(!PreRegistrationStatus::CheckedIn.is_redeemable());
    assert!(!PreRegistrationStatus::CheckedOut.is_redeemable());
}

#[test]
fn test_pre_registration_status_spellings() {
    // Stored values are stable API surface
    assert_eq!(PreRegistrationStatus::Pending.as_str(), "pending");
    assert_eq!(PreRegistrationStatus::Approved.as_str(), "approved");
    assert_eq!(PreRegistrationStatus::CheckedIn.as_str(), "checked-in");
    assert_eq!(PreRegistrationStatus::CheckedOut.as_str(), "checked_out");
}

#[test]
fn test_visit_status_spellings() {
    assert_eq!(VisitStatus::CheckedIn.as_str(), "checked-in");
    assert_eq!(VisitStatus::CheckedOut.as_str(), "checked-out");
}
