// Token claims structures for tenant users and admin-portal staff.
// The scope carries the permission set resolved from the role at login.

use serde::{Deserialize, Serialize};

/// Access token claims for tenant users (hosts and company admins)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenClaims {
    /// User ID (subject)
    pub sub: String,

    /// JWT ID (UUID format)
    pub jti: String,

    /// User email address
    pub email: String,

    /// Tenant role (admin, host)
    pub role: String,

    /// Company the user belongs to
    pub company_id: String,

    /// Denormalized company name, used for tenancy scoping
    pub company_name: String,

    /// Permissions resolved from the role at login
    pub scope: Vec<String>,

    /// Audience (aud)
    pub aud: String,

    /// Issuer (iss)
    pub iss: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: u64,

    /// Expires at timestamp (Unix epoch seconds)
    pub exp: u64,
}

/// Access token claims for admin-portal staff
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminTokenClaims {
    /// Admin user ID (subject)
    pub sub: String,

    /// JWT ID (UUID format)
    pub jti: String,

    /// Admin email address
    pub email: String,

    /// Portal role (admin, ops, finance, support, readonly)
    pub role: String,

    /// Permissions resolved from the role at login
    pub scope: Vec<String>,

    /// Audience (aud) - distinct from the tenant audience
    pub aud: String,

    /// Issuer (iss)
    pub iss: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: u64,

    /// Expires at timestamp (Unix epoch seconds)
    pub exp: u64,
}

impl AccessTokenClaims {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.exp < now
    }
}

impl AdminTokenClaims {
    pub fn is_expired(&self) -> bool {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_access_token_claims_serialization() {
        let claims = AccessTokenClaims {
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            email: "host@acme.test".to_string(),
            role: "host".to_string(),
            company_id: Uuid::new_v4().to_string(),
            company_name: "Acme".to_string(),
            scope: vec!["visits:view".to_string()],
            aud: "vms-tenant".to_string(),
            iss: "vms".to_string(),
            iat: 1700000000,
            exp: 1700086400,
        };

        let json = serde_json::to_string(&claims).expect("Should serialize");
        let deserialized: AccessTokenClaims =
            serde_json::from_str(&json).expect("Should deserialize");

        assert_eq!(claims, deserialized);
    }

    #[test]
    fn test_token_expiry_check() {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let mut claims = AdminTokenClaims {
            sub: "admin".to_string(),
            jti: Uuid::new_v4().to_string(),
            email: "staff@vms.test".to_string(),
            role: "support".to_string(),
            scope: vec![],
            aud: "vms-admin".to_string(),
            iss: "vms".to_string(),
            iat: now - 3600,
            exp: now - 1,
        };
        assert!(claims.is_expired());

        claims.exp = now + 3600;
        assert!(!claims.is_expired());
    }
}
