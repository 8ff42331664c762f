// Authentication handlers: company registration, co-worker creation,
// login, and email verification support

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use axum_extra::{headers::UserAgent, TypedHeader};
use chrono::{Duration, Utc};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use validator::Validate;

use crate::{
    app::AppState,
    config::Role,
    middleware::auth::AuthenticatedUser,
    models::{Company, CompanyStatus, NewCompany, NewUser, User, UserError},
    services::verification::VerificationService,
    utils::{
        hash_password, log_auth_failure, trim_and_validate_field, trim_optional_field,
        verify_password, AuthError, ServiceError,
    },
};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "Company name is required"))]
    pub company_name: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 320, message = "Email must be less than 320 characters"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub mobile_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub role: String,

    #[validate(length(min = 1, message = "Mobile number is required"))]
    pub mobile_number: String,

    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,

    #[validate(length(min = 1, message = "Designation is required"))]
    pub designation: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginUserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUserInfo,
}

fn collect_validation_errors(errors: validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect::<Vec<String>>()
        .join(", ")
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/registerCompany - Register a new company with its admin user.
/// The company starts its trial window; the admin must verify email before
/// logging in.
pub async fn register_company(
    State(state): State<AppState>,
    Json(request): Json<RegisterCompanyRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if let Err(errors) = request.validate() {
        return Err(ServiceError::ValidationError(collect_validation_errors(
            errors,
        )));
    }

    let company_name = trim_and_validate_field(&request.company_name, true)
        .map_err(|_| ServiceError::ValidationError("companyName is required".to_string()))?;
    let email = request.email.trim().to_lowercase();
    let admin_name = format!(
        "{} {}",
        request.first_name.trim(),
        request.last_name.trim()
    );

    let mut conn = state.diesel_pool.get().await?;

    match User::find_by_email(&mut conn, &email).await {
        Ok(_) => return Err(ServiceError::AlreadyExists("Email")),
        Err(UserError::NotFound) => {},
        Err(e) => return Err(ServiceError::DatabaseError(e.to_string())),
    }

    if Company::name_exists(&mut conn, &company_name).await? {
        return Err(ServiceError::AlreadyExists("Company name"));
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ServiceError::InternalError
    })?;

    let config = state.config.clone();
    let trial_start = Utc::now().date_naive();
    let trial_end = trial_start + Duration::days(config.trial_period_days);

    // Company and admin user are created atomically
    let new_company = NewCompany {
        company_name: company_name.clone(),
        contact_first_name: request.first_name.trim().to_string(),
        contact_last_name: request.last_name.trim().to_string(),
        contact_email: email.clone(),
        mobile_number: trim_optional_field(request.mobile_number.as_ref()),
        subscription_status: CompanyStatus::Trial.as_str().to_string(),
        trial_start_date: trial_start,
        trial_end_date: trial_end,
    };
    let admin_mobile = trim_optional_field(request.mobile_number.as_ref());
    let admin_name_for_tx = admin_name.clone();
    let email_for_tx = email.clone();

    let (company, user) = conn
        .transaction::<(Company, User), diesel::result::Error, _>(|conn| {
            async move {
                let company = Company::create(conn, new_company).await?;

                let user = User::create(
                    conn,
                    NewUser {
                        email: email_for_tx,
                        password_hash,
                        full_name: admin_name_for_tx,
                        role: Role::Admin.as_str().to_string(),
                        company_id: company.id,
                        company_name: company.company_name.clone(),
                        mobile_number: admin_mobile,
                        department: None,
                        designation: None,
                        is_verified: false,
                        is_active: true,
                    },
                )
                .await
                .map_err(|e| match e {
                    UserError::Database(db) => db,
                    _ => diesel::result::Error::RollbackTransaction,
                })?;

                Ok((company, user))
            }
            .scope_boxed()
        })
        .await?;

    // Verification email is best-effort; registration stands either way
    match VerificationService::issue_token(
        &mut conn,
        user.id,
        config.email.verification_token_ttl,
    )
    .await
    {
        Ok(token) => {
            let link = format!("{}/api/verify-email?token={}", config.base_url, token);
            if let Err(e) = state
                .email_service
                .send_verification_email(&email, &admin_name, &company.company_name, &link)
                .await
            {
                tracing::error!("Failed to send verification email to {}: {}", email, e);
            }
        },
        Err(e) => {
            tracing::error!("Failed to issue verification token: {}", e);
        },
    }

    tracing::info!(
        "Company '{}' registered with admin {}",
        company.company_name,
        user.email
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Company and admin user registered successfully. Please check your email to verify your account before logging in.",
            "userId": user.id,
            "companyName": company.company_name,
        })),
    ))
}

/// POST /api/register - An authenticated company admin creates a co-worker
/// (admin or host). Created users are auto-verified and active.
pub async fn register(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if !user.is_admin() {
        return Err(ServiceError::Forbidden("Admin access required".to_string()));
    }

    if let Err(errors) = request.validate() {
        return Err(ServiceError::ValidationError(collect_validation_errors(
            errors,
        )));
    }

    let role = Role::from_str(&request.role.to_lowercase())
        .map_err(|_| ServiceError::ValidationError("Invalid role. Must be Admin or Host.".to_string()))?;

    let last_name = request
        .last_name
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();
    let full_name = if last_name.is_empty() {
        request.first_name.trim().to_string()
    } else {
        format!("{} {}", request.first_name.trim(), last_name)
    };
    let email = request.email.trim().to_lowercase();

    let mut conn = state.diesel_pool.get().await?;

    match User::find_by_email(&mut conn, &email).await {
        Ok(_) => return Err(ServiceError::AlreadyExists("User")),
        Err(UserError::NotFound) => {},
        Err(e) => return Err(ServiceError::DatabaseError(e.to_string())),
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ServiceError::InternalError
    })?;

    let created = User::create(
        &mut conn,
        NewUser {
            email,
            password_hash,
            full_name,
            role: role.as_str().to_string(),
            company_id: user.company_id,
            company_name: user.company_name.clone(),
            mobile_number: Some(request.mobile_number.trim().to_string()),
            department: Some(request.department.trim().to_string()),
            designation: Some(request.designation.trim().to_string()),
            is_verified: true,
            is_active: true,
        },
    )
    .await
    .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!(
                "{} user created successfully and is ready to login immediately",
                created.role
            ),
            "userId": created.id,
            "name": created.full_name,
            "email": created.email,
            "role": created.role,
            "company_name": created.company_name,
            "verified": true,
            "active": true,
        })),
    ))
}

/// POST /api/login - Authenticate a tenant user and return a JWT
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    let ip_address = addr.ip().to_string();
    let user_agent = user_agent.map(|TypedHeader(ua)| ua.to_string());

    let email = request.email.trim().to_lowercase();
    if email.is_empty() || request.password.is_empty() {
        return AuthError::ValidationError("Email and password are required".to_string())
            .into_response();
    }

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Failed to get database connection: {}", e);
            return AuthError::InternalError.into_response();
        },
    };

    let user = match User::find_by_email(&mut conn, &email).await {
        Ok(user) => user,
        Err(UserError::NotFound) => {
            log_auth_failure(
                &email,
                &ip_address,
                &AuthError::InvalidCredentials,
                user_agent.as_deref(),
            );
            return AuthError::InvalidCredentials.into_response();
        },
        Err(e) => {
            tracing::error!("Database error during login: {}", e);
            return AuthError::DatabaseError(e.to_string()).into_response();
        },
    };

    match verify_password(&request.password, &user.password_hash) {
        Ok(true) => {},
        Ok(false) => {
            log_auth_failure(
                &email,
                &ip_address,
                &AuthError::InvalidCredentials,
                user_agent.as_deref(),
            );
            return AuthError::InvalidCredentials.into_response();
        },
        Err(e) => {
            tracing::error!("Password verification error: {}", e);
            return AuthError::InternalError.into_response();
        },
    }

    if !user.is_verified {
        log_auth_failure(
            &email,
            &ip_address,
            &AuthError::EmailNotVerified,
            user_agent.as_deref(),
        );
        return AuthError::EmailNotVerified.into_response();
    }

    if !user.is_active {
        log_auth_failure(
            &email,
            &ip_address,
            &AuthError::AccountInactive,
            user_agent.as_deref(),
        );
        return AuthError::AccountInactive.into_response();
    }

    let role = match user.role_enum() {
        Ok(role) => role,
        Err(e) => {
            tracing::error!("Invalid role for user {}: {}", user.id, e);
            return AuthError::InternalError.into_response();
        },
    };

    let token = match state.jwt_service.generate_access_token(&user, role) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            return AuthError::TokenError(e.to_string()).into_response();
        },
    };

    if let Err(e) = User::touch_last_login(&mut conn, user.id).await {
        tracing::warn!("Failed to record last login for {}: {}", user.id, e);
    }

    tracing::info!(email = %user.email, role = %user.role, "Login successful");

    let response = LoginResponse {
        token,
        user: LoginUserInfo {
            id: user.id.to_string(),
            name: user.full_name,
            email: user.email,
            role: user.role,
            company_name: user.company_name,
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/resend-verification - Issue a fresh verification token
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(request): Json<ResendVerificationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ServiceError::ValidationError(
            "Email is required".to_string(),
        ));
    }

    let mut conn = state.diesel_pool.get().await?;

    let user = match User::find_by_email(&mut conn, &email).await {
        Ok(user) => user,
        Err(UserError::NotFound) => return Err(ServiceError::NotFound("User")),
        Err(e) => return Err(ServiceError::DatabaseError(e.to_string())),
    };

    if user.is_verified {
        return Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Email already verified" })),
        ));
    }

    let config = state.config.clone();
    let token = VerificationService::issue_token(
        &mut conn,
        user.id,
        config.email.verification_token_ttl,
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to issue verification token: {}", e);
        ServiceError::InternalError
    })?;

    let link = format!("{}/api/verify-email?token={}", config.base_url, token);
    if let Err(e) = state
        .email_service
        .send_verification_email(&user.email, &user.full_name, &user.company_name, &link)
        .await
    {
        tracing::error!("Failed to resend verification email: {}", e);
        return Err(ServiceError::InternalError);
    }

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Verification email sent successfully" })),
    ))
}

/// GET /api/me - Current user information
pub async fn get_current_user(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let db_user = User::find_by_id(&mut conn, user.user_id)
        .await
        .map_err(|_| ServiceError::NotFound("User"))?;

    Ok(Json(serde_json::json!({
        "id": db_user.id,
        "name": db_user.full_name,
        "email": db_user.email,
        "role": db_user.role,
        "company_name": db_user.company_name,
        "department": db_user.department,
        "designation": db_user.designation,
        "permissions": user.permissions,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_collection() {
        let request = RegisterCompanyRequest {
            company_name: "".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            mobile_number: None,
        };

        let errors = request.validate().unwrap_err();
        let message = collect_validation_errors(errors);
        assert!(message.contains("company_name"));
        assert!(message.contains("email"));
        assert!(message.contains("password"));
    }

    #[test]
    fn test_full_name_assembly_without_last_name() {
        let last_name: Option<String> = None;
        let last = last_name.as_deref().unwrap_or("").trim().to_string();
        let full = if last.is_empty() {
            "Solo".trim().to_string()
        } else {
            format!("{} {}", "Solo", last)
        };
        assert_eq!(full, "Solo");
    }
}
