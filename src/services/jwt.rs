// JWT token service with HS256 signing.
// Two audiences share one signing key: tenant users and admin-portal
// staff. Tokens failing signature, audience, or issuer validation are
// rejected outright - there is no fallback decode path.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{permissions, AdminRole, Role};
use crate::models::auth::{AccessTokenClaims, AdminTokenClaims};
use crate::models::{AdminUser, User};

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Clock error")]
    ClockError,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer => JwtError::InvalidToken,
            _ => JwtError::EncodingError(err.to_string()),
        }
    }
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub expiry: u64,
    pub algorithm: Algorithm,
    pub audience: String,
    pub admin_audience: String,
    pub issuer: String,
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("expiry", &self.expiry)
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("admin_audience", &self.admin_audience)
            .field("issuer", &self.issuer)
            .field("encoding_key", &"<redacted>")
            .field("decoding_key", &"<redacted>")
            .finish()
    }
}

impl JwtConfig {
    fn build_from_params(
        secret: &str,
        expiry: u64,
        audience: String,
        admin_audience: String,
        issuer: String,
    ) -> Self {
        JwtConfig {
            expiry,
            algorithm: Algorithm::HS256,
            audience,
            admin_audience,
            issuer,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create JWT config from centralized app configuration
    pub fn from_env() -> Self {
        let config = crate::app_config::config();
        Self::build_from_params(
            &config.jwt_secret,
            config.jwt_expiry,
            config.jwt_audience.clone(),
            config.jwt_admin_audience.clone(),
            config.jwt_issuer.clone(),
        )
    }

    /// Create JWT config for tests without touching the global CONFIG
    pub fn for_test() -> Self {
        Self::build_from_params(
            "test-secret-for-hs256-signing-only",
            86400,
            "vms-tenant".to_string(),
            "vms-admin".to_string(),
            "vms".to_string(),
        )
    }
}

/// JWT service
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }

    fn now() -> Result<u64, JwtError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|_| JwtError::ClockError)
    }

    /// Generate an access token for a tenant user. The permission scope is
    /// resolved from the role here, once, and carried in the claims.
    pub fn generate_access_token(&self, user: &User, role: Role) -> Result<String, JwtError> {
        let now = Self::now()?;

        let claims = AccessTokenClaims {
            sub: user.id.to_string(),
            jti: Uuid::new_v4().to_string(),
            email: user.email.clone(),
            role: role.as_str().to_string(),
            company_id: user.company_id.to_string(),
            company_name: user.company_name.clone(),
            scope: permissions::scope_strings(role.permissions()),
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.expiry,
        };

        encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.config.encoding_key,
        )
        .map_err(JwtError::from)
    }

    /// Validate a tenant access token
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.set_issuer(&[self.config.issuer.clone()]);

        let data = decode::<AccessTokenClaims>(token, &self.config.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Generate an access token for admin-portal staff
    pub fn generate_admin_token(
        &self,
        admin: &AdminUser,
        role: AdminRole,
    ) -> Result<String, JwtError> {
        let now = Self::now()?;

        let claims = AdminTokenClaims {
            sub: admin.id.to_string(),
            jti: Uuid::new_v4().to_string(),
            email: admin.email.clone(),
            role: role.as_str().to_string(),
            scope: permissions::scope_strings(role.permissions()),
            aud: self.config.admin_audience.clone(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.expiry,
        };

        encode(
            &Header::new(self.config.algorithm),
            &claims,
            &self.config.encoding_key,
        )
        .map_err(JwtError::from)
    }

    /// Validate an admin-portal token
    pub fn validate_admin_token(&self, token: &str) -> Result<AdminTokenClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[self.config.admin_audience.clone()]);
        validation.set_issuer(&[self.config.issuer.clone()]);

        let data = decode::<AdminTokenClaims>(token, &self.config.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "admin@acme.test".to_string(),
            password_hash: "hash".to_string(),
            full_name: "Ada Admin".to_string(),
            role: "admin".to_string(),
            company_id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            mobile_number: None,
            department: None,
            designation: None,
            is_verified: true,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_admin() -> AdminUser {
        let now = Utc::now();
        AdminUser {
            id: Uuid::new_v4(),
            name: "Staff".to_string(),
            email: "staff@vms.test".to_string(),
            password_hash: "hash".to_string(),
            role: "support".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = JwtService::new(JwtConfig::for_test());
        let user = sample_user();

        let token = service
            .generate_access_token(&user, Role::Admin)
            .expect("token");
        let claims = service.validate_access_token(&token).expect("claims");

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.company_name, "Acme");
        assert!(claims.scope.contains(&"visitors:manage".to_string()));
    }

    #[test]
    fn test_admin_token_not_valid_as_tenant_token() {
        let service = JwtService::new(JwtConfig::for_test());
        let admin = sample_admin();

        let token = service
            .generate_admin_token(&admin, AdminRole::Support)
            .expect("token");

        // Audience separation: an admin token must not authenticate
        // against the tenant API
        assert!(matches!(
            service.validate_access_token(&token),
            Err(JwtError::InvalidToken)
        ));
        assert!(service.validate_admin_token(&token).is_ok());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = JwtService::new(JwtConfig::for_test());
        assert!(service.validate_access_token("not.a.token").is_err());

        // A bare base64(JSON) blob is not a token either
        let pseudo = "eyJyb2xlIjoiYWRtaW4ifQ==";
        assert!(service.validate_access_token(pseudo).is_err());
    }

    #[test]
    fn test_host_scope_is_limited() {
        let service = JwtService::new(JwtConfig::for_test());
        let mut user = sample_user();
        user.role = "host".to_string();

        let token = service
            .generate_access_token(&user, Role::Host)
            .expect("token");
        let claims = service.validate_access_token(&token).expect("claims");

        assert!(!claims.scope.contains(&"visitors:manage".to_string()));
        assert!(claims.scope.contains(&"visits:checkin".to_string()));
    }
}
