// Role and permission resolution tests.
// Permissions are resolved once from the role and checked as a typed set.

use vms_backend_core::config::permissions::{scope_from_strings, scope_strings};
use vms_backend_core::{AdminRole, Permission, Role};

#[test]
fn test_tenant_admin_capabilities() {
    let perms = Role::Admin.permissions();
    assert!(perms.contains(&Permission::VisitorsManage));
    assert!(perms.contains(&Permission::UsersManage));
    assert!(perms.contains(&Permission::ReportsView));
    assert!(perms.contains(&Permission::BillingManage));
}

#[test]
fn test_tenant_host_capabilities() {
    let perms = Role::Host.permissions();
    assert!(perms.contains(&Permission::VisitsCheckin));
    assert!(perms.contains(&Permission::VisitsCheckout));
    assert!(!perms.contains(&Permission::VisitorsManage));
    assert!(!perms.contains(&Permission::UsersManage));
    assert!(!perms.contains(&Permission::ReportsView));
}

#[test]
fn test_portal_role_matrix() {
    // admin has everything the portal checks for
    for permission in [
        Permission::SupportView,
        Permission::SupportEdit,
        Permission::BillingView,
        Permission::SubscriptionsView,
        Permission::PlansManage,
        Permission::AdminUsersManage,
    ] {
        assert!(
            AdminRole::Admin.permissions().contains(&permission),
            "admin missing {:?}",
            permission
        );
    }

    // support can triage but not manage billing or staff
    let support = AdminRole::Support.permissions();
    assert!(support.contains(&Permission::SupportEdit));
    assert!(!support.contains(&Permission::BillingView));
    assert!(!support.contains(&Permission::AdminUsersManage));

    // finance sees money, not tickets
    let finance = AdminRole::Finance.permissions();
    assert!(finance.contains(&Permission::BillingView));
    assert!(finance.contains(&Permission::SubscriptionsView));
    assert!(!finance.contains(&Permission::SupportView));

    // readonly can only look at support
    assert_eq!(
        AdminRole::Readonly.permissions(),
        &[Permission::SupportView]
    );
}

#[test]
fn test_claims_scope_round_trip() {
    for role in [
        AdminRole::Admin,
        AdminRole::Ops,
        AdminRole::Finance,
        AdminRole::Support,
        AdminRole::Readonly,
    ] {
        let strings = scope_strings(role.permissions());
        let rebuilt = scope_from_strings(&strings);
        assert_eq!(role.permissions().to_vec(), rebuilt, "role {:?}", role);
    }
}

#[test]
fn test_unknown_roles_rejected() {
    use std::str::FromStr;
    assert!(Role::from_str("root").is_err());
    assert!(AdminRole::from_str("superadmin").is_err());
}
