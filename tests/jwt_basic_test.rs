// Basic JWT tests without database dependencies.
// Token generation and validation for both audiences.

use chrono::Utc;
use uuid::Uuid;
use vms_backend_core::models::{AdminUser, User};
use vms_backend_core::{AdminRole, JwtConfig, JwtError, JwtService, Role};

fn test_user(role: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: "host@acme.test".to_string(),
        password_hash: "hash".to_string(),
        full_name: "Test Host".to_string(),
        role: role.to_string(),
        company_id: Uuid::new_v4(),
        company_name: "Acme".to_string(),
        mobile_number: None,
        department: Some("Reception".to_string()),
        designation: None,
        is_verified: true,
        is_active: true,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn test_admin(role: &str) -> AdminUser {
    let now = Utc::now();
    AdminUser {
        id: Uuid::new_v4(),
        name: "Portal Staff".to_string(),
        email: "staff@vms.test".to_string(),
        password_hash: "hash".to_string(),
        role: role.to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_tenant_token_generation_and_validation() {
    let service = JwtService::new(JwtConfig::for_test());
    let user = test_user("host");

    let token = service
        .generate_access_token(&user, Role::Host)
        .expect("Failed to generate access token");

    // Three dot-separated parts
    assert_eq!(token.split('.').count(), 3);

    let claims = service
        .validate_access_token(&token)
        .expect("Failed to validate access token");

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.role, "host");
    assert_eq!(claims.company_id, user.company_id.to_string());
    assert_eq!(claims.company_name, "Acme");
    assert!(!claims.is_expired());
}

#[test]
fn test_scope_reflects_role() {
    let service = JwtService::new(JwtConfig::for_test());

    let admin_token = service
        .generate_access_token(&test_user("admin"), Role::Admin)
        .unwrap();
    let admin_claims = service.validate_access_token(&admin_token).unwrap();
    assert!(admin_claims.scope.contains(&"visitors:manage".to_string()));
    assert!(admin_claims.scope.contains(&"reports:view".to_string()));

    let host_token = service
        .generate_access_token(&test_user("host"), Role::Host)
        .unwrap();
    let host_claims = service.validate_access_token(&host_token).unwrap();
    assert!(!host_claims.scope.contains(&"visitors:manage".to_string()));
    assert!(!host_claims.scope.contains(&"reports:view".to_string()));
}

#[test]
fn test_audience_separation() {
    let service = JwtService::new(JwtConfig::for_test());

    let admin_token = service
        .generate_admin_token(&test_admin("support"), AdminRole::Support)
        .unwrap();
    let tenant_token = service
        .generate_access_token(&test_user("admin"), Role::Admin)
        .unwrap();

    // Tokens are bound to their audience
    assert!(service.validate_admin_token(&admin_token).is_ok());
    assert!(service.validate_access_token(&admin_token).is_err());
    assert!(service.validate_access_token(&tenant_token).is_ok());
    assert!(service.validate_admin_token(&tenant_token).is_err());
}

#[test]
fn test_tampered_token_rejected() {
    let service = JwtService::new(JwtConfig::for_test());
    let token = service
        .generate_access_token(&test_user("host"), Role::Host)
        .unwrap();

    let mut tampered = token.clone();
    tampered.pop();
    tampered.push('x');

    assert!(matches!(
        service.validate_access_token(&tampered),
        Err(JwtError::InvalidToken) | Err(JwtError::EncodingError(_))
    ));
}

#[test]
fn test_base64_json_blob_is_not_a_token() {
    // A pseudo-token of base64-encoded JSON claims must never validate
    let service = JwtService::new(JwtConfig::for_test());
    let pseudo = "eyJyb2xlIjogImFkbWluIiwgImVtYWlsIjogImV2aWxAZXZpbC50ZXN0In0=";

    assert!(service.validate_access_token(pseudo).is_err());
    assert!(service.validate_admin_token(pseudo).is_err());
}
