// Authenticated principal types extracted from validated JWTs.
// The permission set was resolved from the role at login; handlers check
// capabilities against the typed set, never against raw role strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{permissions, Permission};

/// Authenticated tenant user (company admin or host)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub token_id: String,
    pub email: String,
    pub role: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub permissions: Vec<Permission>,
    pub exp: u64,
}

impl AuthenticatedUser {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn is_host(&self) -> bool {
        self.role == "host"
    }
}

/// Authenticated admin-portal staff member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedAdmin {
    pub admin_id: Uuid,
    pub token_id: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<Permission>,
    pub exp: u64,
}

impl AuthenticatedAdmin {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Rebuild typed permission sets from claim scope strings
pub fn permissions_from_scope(scope: &[String]) -> Vec<Permission> {
    permissions::scope_from_strings(scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_check() {
        let user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            token_id: "jti".to_string(),
            email: "host@acme.test".to_string(),
            role: "host".to_string(),
            company_id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            permissions: vec![Permission::VisitsCheckin, Permission::VisitsView],
            exp: 0,
        };

        assert!(user.has_permission(Permission::VisitsCheckin));
        assert!(!user.has_permission(Permission::VisitorsManage));
        assert!(user.is_host());
        assert!(!user.is_admin());
    }
}
