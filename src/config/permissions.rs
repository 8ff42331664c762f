// Role and permission configuration.
// Permissions are a closed set resolved once at login and carried in the
// token claims as strings; middleware rebuilds the typed set for handlers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tenant-side user roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Host,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Host => "host",
        }
    }

    /// Capabilities granted to this role
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin => &[
                Permission::VisitsCheckin,
                Permission::VisitsCheckout,
                Permission::VisitsView,
                Permission::VisitorsManage,
                Permission::UsersManage,
                Permission::ReportsView,
                Permission::BillingManage,
            ],
            Role::Host => &[
                Permission::VisitsCheckin,
                Permission::VisitsCheckout,
                Permission::VisitsView,
            ],
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "host" => Ok(Role::Host),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin-portal staff roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminRole {
    Admin,
    Ops,
    Finance,
    Support,
    Readonly,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::Ops => "ops",
            AdminRole::Finance => "finance",
            AdminRole::Support => "support",
            AdminRole::Readonly => "readonly",
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            AdminRole::Admin => &[
                Permission::UsersView,
                Permission::VisitsView,
                Permission::SupportView,
                Permission::SupportEdit,
                Permission::BillingView,
                Permission::SubscriptionsView,
                Permission::PlansManage,
                Permission::AdminUsersManage,
            ],
            AdminRole::Ops => &[
                Permission::UsersView,
                Permission::VisitsView,
                Permission::SupportView,
            ],
            AdminRole::Finance => &[Permission::BillingView, Permission::SubscriptionsView],
            AdminRole::Support => &[Permission::SupportView, Permission::SupportEdit],
            AdminRole::Readonly => &[Permission::SupportView],
        }
    }
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AdminRole::Admin),
            "ops" => Ok(AdminRole::Ops),
            "finance" => Ok(AdminRole::Finance),
            "support" => Ok(AdminRole::Support),
            "readonly" => Ok(AdminRole::Readonly),
            _ => Err(format!("Invalid admin role: {}", s)),
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of capabilities checked by handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    // Tenant capabilities
    VisitsCheckin,
    VisitsCheckout,
    VisitorsManage,
    UsersManage,
    ReportsView,
    BillingManage,
    // Shared / portal capabilities
    UsersView,
    VisitsView,
    SupportView,
    SupportEdit,
    BillingView,
    SubscriptionsView,
    PlansManage,
    AdminUsersManage,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::VisitsCheckin => "visits:checkin",
            Permission::VisitsCheckout => "visits:checkout",
            Permission::VisitorsManage => "visitors:manage",
            Permission::UsersManage => "users:manage",
            Permission::ReportsView => "reports:view",
            Permission::BillingManage => "billing:manage",
            Permission::UsersView => "users:view",
            Permission::VisitsView => "visits:view",
            Permission::SupportView => "support:view",
            Permission::SupportEdit => "support:edit",
            Permission::BillingView => "billing:view",
            Permission::SubscriptionsView => "subscriptions:view",
            Permission::PlansManage => "plans:manage",
            Permission::AdminUsersManage => "admin-users:manage",
        }
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visits:checkin" => Ok(Permission::VisitsCheckin),
            "visits:checkout" => Ok(Permission::VisitsCheckout),
            "visitors:manage" => Ok(Permission::VisitorsManage),
            "users:manage" => Ok(Permission::UsersManage),
            "reports:view" => Ok(Permission::ReportsView),
            "billing:manage" => Ok(Permission::BillingManage),
            "users:view" => Ok(Permission::UsersView),
            "visits:view" => Ok(Permission::VisitsView),
            "support:view" => Ok(Permission::SupportView),
            "support:edit" => Ok(Permission::SupportEdit),
            "billing:view" => Ok(Permission::BillingView),
            "subscriptions:view" => Ok(Permission::SubscriptionsView),
            "plans:manage" => Ok(Permission::PlansManage),
            "admin-users:manage" => Ok(Permission::AdminUsersManage),
            _ => Err(format!("Unknown permission: {}", s)),
        }
    }
}

/// Serialize a permission set into claim strings
pub fn scope_strings(permissions: &[Permission]) -> Vec<String> {
    permissions.iter().map(|p| p.as_str().to_string()).collect()
}

/// Rebuild a typed permission set from claim strings, dropping unknowns
pub fn scope_from_strings(scope: &[String]) -> Vec<Permission> {
    scope
        .iter()
        .filter_map(|s| Permission::from_str(s).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::from_str("admin"), Ok(Role::Admin));
        assert_eq!(Role::from_str("host"), Ok(Role::Host));
        assert!(Role::from_str("superuser").is_err());
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_admin_permissions_include_support_edit() {
        assert!(AdminRole::Admin
            .permissions()
            .contains(&Permission::SupportEdit));
        assert!(AdminRole::Support
            .permissions()
            .contains(&Permission::SupportEdit));
        assert!(!AdminRole::Readonly
            .permissions()
            .contains(&Permission::SupportEdit));
        assert!(!AdminRole::Finance
            .permissions()
            .contains(&Permission::SupportView));
    }

    #[test]
    fn test_host_cannot_manage_visitors() {
        assert!(!Role::Host
            .permissions()
            .contains(&Permission::VisitorsManage));
        assert!(Role::Admin
            .permissions()
            .contains(&Permission::VisitorsManage));
    }

    #[test]
    fn test_scope_round_trip() {
        let perms = Role::Admin.permissions();
        let strings = scope_strings(perms);
        let rebuilt = scope_from_strings(&strings);
        assert_eq!(perms.to_vec(), rebuilt);
    }

    #[test]
    fn test_unknown_scope_strings_dropped() {
        let scope = vec!["visits:view".to_string(), "nonsense:claim".to_string()];
        let rebuilt = scope_from_strings(&scope);
        assert_eq!(rebuilt, vec![Permission::VisitsView]);
    }
}
