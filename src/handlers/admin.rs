// Admin portal handlers: staff login, platform overview, pricing plan
// CRUD, support triage, and admin-user management.
// Every permission check runs against the typed capability set carried in
// the claims, resolved from the role at login.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{Datelike, Duration, TimeZone, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    app::AppState,
    config::{AdminRole, Permission},
    middleware::auth::AuthenticatedAdmin,
    models::{
        AdminUser, AdminUserUpdate, Company, CompanyStatus, NewAdminUser, NewPricingPlan, Payment,
        PricingPlan, PricingPlanUpdate, Subscription, SupportTicket, TicketPriority, TicketStatus,
        TicketUpdate,
    },
    utils::{hash_password, verify_password, AuthError, ServiceError},
};

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SupportListParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SupportUpdateRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAdminUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdminUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlanRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Option<i32>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub billing_cycle: Option<String>,
    #[serde(default)]
    pub max_users: Option<i32>,
    #[serde(default)]
    pub max_visitors_per_month: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

fn require(admin: &AuthenticatedAdmin, permission: Permission) -> Result<(), ServiceError> {
    if admin.has_permission(permission) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden("Forbidden".to_string()))
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// POST /api/admin/login - Authenticate admin-portal staff
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> impl IntoResponse {
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

    let admin = match AdminUser::find_by_email(&mut conn, &email).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return AuthError::InvalidCredentials.into_response(),
        Err(e) => {
            tracing::error!("Database error during admin login: {}", e);
            return AuthError::DatabaseError(e.to_string()).into_response();
        },
    };

    match verify_password(&request.password, &admin.password_hash) {
        Ok(true) => {},
        Ok(false) => return AuthError::InvalidCredentials.into_response(),
        Err(e) => {
            tracing::error!("Password verification error: {}", e);
            return AuthError::InternalError.into_response();
        },
    }

    if !admin.is_active {
        return AuthError::AccountInactive.into_response();
    }

    let role = admin.role_enum();
    let token = match state.jwt_service.generate_admin_token(&admin, role) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to generate admin token: {}", e);
            return AuthError::TokenError(e.to_string()).into_response();
        },
    };

    tracing::info!(email = %admin.email, role = %admin.role, "Admin login successful");

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "user": {
                "id": admin.id,
                "name": admin.name,
                "email": admin.email,
                "role": admin.role,
                "permissions": role
                    .permissions()
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>(),
            }
        })),
    )
        .into_response()
}

// =============================================================================
// OVERVIEW AND LISTINGS
// =============================================================================

/// GET /api/admin/overview - Platform dashboard totals
pub async fn overview(
    _admin: AuthenticatedAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let customers = Company::count_all(&mut conn).await?;
    let active_companies =
        Company::count_by_status(&mut conn, CompanyStatus::Active.as_str()).await?;
    let active_trials = Company::count_by_status(&mut conn, CompanyStatus::Trial.as_str()).await?;
    let open_tickets = SupportTicket::count_open(&mut conn).await?;

    // Paid revenue for the current calendar month, in major units
    let now = Utc::now();
    let month_start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    let monthly_revenue_minor = Payment::paid_amount_since(&mut conn, month_start).await?;

    // Renewal window: trials, recently expired, and terms ending soon
    let today = now.date_naive();
    let two_months_ago = today - Duration::days(60);
    let soon = today + Duration::days(5);
    let pending_renewals: i64 = {
        use crate::schema::companies::dsl::*;
        companies
            .filter(
                subscription_status
                    .eq(CompanyStatus::Trial.as_str())
                    .or(subscription_status
                        .eq(CompanyStatus::Expired.as_str())
                        .and(subscription_end_date.ge(two_months_ago)))
                    .or(subscription_end_date.le(soon)),
            )
            .count()
            .get_result(&mut conn)
            .await?
    };

    Ok(Json(serde_json::json!({
        "totals": {
            "customers": customers,
            "activeCompanies": active_companies,
            "activeTrials": active_trials,
            "monthlyRevenue": monthly_revenue_minor as f64 / 100.0,
            "openTickets": open_tickets,
            "pendingRenewals": pending_renewals,
        }
    })))
}

/// GET /api/admin/companies
pub async fn list_companies(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::UsersView)?;
    let mut conn = state.diesel_pool.get().await?;
    let companies = Company::list_all(&mut conn).await?;
    Ok(Json(companies))
}

/// GET /api/admin/subscriptions
pub async fn list_subscriptions(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::SubscriptionsView)?;
    let mut conn = state.diesel_pool.get().await?;
    let subscriptions = Subscription::list_all(&mut conn).await?;
    Ok(Json(subscriptions))
}

/// GET /api/admin/payments
pub async fn list_payments(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::BillingView)?;
    let mut conn = state.diesel_pool.get().await?;
    let payments = Payment::list_all(&mut conn).await?;
    Ok(Json(payments))
}

// =============================================================================
// PRICING PLANS
// =============================================================================

/// GET /api/admin/pricing-plans
pub async fn list_pricing_plans(
    _admin: AuthenticatedAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;
    let plans = PricingPlan::list_all(&mut conn).await?;
    Ok(Json(plans))
}

/// POST /api/admin/pricing-plans
pub async fn create_pricing_plan(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
    Json(request): Json<PricingPlanRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::PlansManage)?;

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();
    if name.is_empty() {
        return Err(ServiceError::ValidationError("name is required".to_string()));
    }
    let price = request
        .price
        .ok_or_else(|| ServiceError::ValidationError("price is required".to_string()))?;
    if price < 0 {
        return Err(ServiceError::ValidationError(
            "price must not be negative".to_string(),
        ));
    }

    let billing_cycle = request
        .billing_cycle
        .as_deref()
        .unwrap_or("monthly")
        .to_lowercase();
    if billing_cycle != "monthly" && billing_cycle != "yearly" {
        return Err(ServiceError::ValidationError(
            "billingCycle must be monthly or yearly".to_string(),
        ));
    }

    let mut conn = state.diesel_pool.get().await?;

    let plan = PricingPlan::create(
        &mut conn,
        NewPricingPlan {
            name,
            description: request.description.clone(),
            price,
            currency: request
                .currency
                .as_deref()
                .unwrap_or("INR")
                .to_uppercase(),
            billing_cycle,
            max_users: request.max_users,
            max_visitors_per_month: request.max_visitors_per_month,
            is_active: request.is_active.unwrap_or(true),
            display_order: request.display_order.unwrap_or(0),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(plan)))
}

/// PUT /api/admin/pricing-plans/{id}
pub async fn update_pricing_plan(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<PricingPlanRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::PlansManage)?;

    if let Some(cycle) = request.billing_cycle.as_deref() {
        let cycle = cycle.to_lowercase();
        if cycle != "monthly" && cycle != "yearly" {
            return Err(ServiceError::ValidationError(
                "billingCycle must be monthly or yearly".to_string(),
            ));
        }
    }

    let mut conn = state.diesel_pool.get().await?;

    let changes = PricingPlanUpdate {
        name: request.name.clone(),
        description: request.description.clone().map(Some),
        price: request.price,
        currency: request.currency.clone().map(|c| c.to_uppercase()),
        billing_cycle: request.billing_cycle.clone().map(|c| c.to_lowercase()),
        max_users: request.max_users.map(Some),
        max_visitors_per_month: request.max_visitors_per_month.map(Some),
        is_active: request.is_active,
        display_order: request.display_order,
        updated_at: Utc::now(),
    };

    if PricingPlan::find_by_id(&mut conn, plan_id).await?.is_none() {
        return Err(ServiceError::NotFound("Pricing plan"));
    }

    let plan = PricingPlan::update(&mut conn, plan_id, changes).await?;
    Ok(Json(plan))
}

/// DELETE /api/admin/pricing-plans/{id}
pub async fn delete_pricing_plan(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::PlansManage)?;

    let mut conn = state.diesel_pool.get().await?;

    let deleted = PricingPlan::delete(&mut conn, plan_id).await?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("Pricing plan"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

// =============================================================================
// SUPPORT
// =============================================================================

/// GET /api/admin/support - Latest tickets
pub async fn list_support_tickets(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
    Query(params): Query<SupportListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::SupportView)?;

    let limit = params.limit.unwrap_or(200).clamp(1, 500);

    let mut conn = state.diesel_pool.get().await?;
    let tickets = SupportTicket::list_latest(&mut conn, limit).await?;
    Ok(Json(tickets))
}

/// PUT /api/admin/support/{id} - Triage a ticket
pub async fn update_support_ticket(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(request): Json<SupportUpdateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::SupportEdit)?;

    let status = match request.status.as_deref() {
        Some(s) => Some(
            TicketStatus::from_str(s)
                .map_err(ServiceError::ValidationError)?
                .as_str()
                .to_string(),
        ),
        None => None,
    };
    let priority = match request.priority.as_deref() {
        Some(p) => Some(
            TicketPriority::from_str(p)
                .map_err(ServiceError::ValidationError)?
                .as_str()
                .to_string(),
        ),
        None => None,
    };

    if status.is_none() && priority.is_none() && request.assigned_to.is_none() {
        return Err(ServiceError::ValidationError(
            "No valid fields to update".to_string(),
        ));
    }

    let mut conn = state.diesel_pool.get().await?;

    let updated = SupportTicket::update_triage(
        &mut conn,
        ticket_id,
        TicketUpdate {
            status,
            priority,
            assigned_admin_id: request.assigned_to.map(Some),
            updated_at: Utc::now(),
        },
    )
    .await?
    .ok_or(ServiceError::NotFound("Ticket"))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "ticket": updated,
    })))
}

// =============================================================================
// ADMIN USERS
// =============================================================================

/// GET /api/admin/admin-users
pub async fn list_admin_users(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::SupportView)?;

    let mut conn = state.diesel_pool.get().await?;
    let admins = AdminUser::list_all(&mut conn).await?;

    // Password hashes never leave the service
    let rows: Vec<serde_json::Value> = admins
        .into_iter()
        .map(|a| {
            serde_json::json!({
                "id": a.id,
                "name": a.name,
                "email": a.email,
                "role": a.role,
                "is_active": a.is_active,
                "created_at": a.created_at,
                "updated_at": a.updated_at,
            })
        })
        .collect();

    Ok(Json(rows))
}

/// POST /api/admin/admin-users
pub async fn create_admin_user(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
    Json(request): Json<CreateAdminUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::AdminUsersManage)?;

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_lowercase();
    let password = request.password.as_deref().unwrap_or("");

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ServiceError::ValidationError(
            "name, email, password are required".to_string(),
        ));
    }

    let role = AdminRole::from_str(request.role.as_deref().unwrap_or("readonly"))
        .map_err(ServiceError::ValidationError)?;

    let mut conn = state.diesel_pool.get().await?;

    if AdminUser::find_by_email(&mut conn, &email).await?.is_some() {
        return Err(ServiceError::AlreadyExists("Email"));
    }

    let password_hash = hash_password(password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ServiceError::InternalError
    })?;

    let created = AdminUser::create(
        &mut conn,
        NewAdminUser {
            name,
            email,
            password_hash,
            role: role.as_str().to_string(),
            is_active: request.is_active.unwrap_or(true),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "id": created.id,
        })),
    ))
}

/// PUT /api/admin/admin-users/{id}
pub async fn update_admin_user(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
    Path(admin_user_id): Path<Uuid>,
    Json(request): Json<UpdateAdminUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::AdminUsersManage)?;

    let role = match request.role.as_deref() {
        Some(r) => Some(
            AdminRole::from_str(r)
                .map_err(ServiceError::ValidationError)?
                .as_str()
                .to_string(),
        ),
        None => None,
    };

    let password_hash = match request.password.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => Some(hash_password(p).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            ServiceError::InternalError
        })?),
        _ => None,
    };

    if request.name.is_none()
        && request.email.is_none()
        && role.is_none()
        && request.is_active.is_none()
        && password_hash.is_none()
    {
        return Err(ServiceError::ValidationError(
            "No valid fields to update".to_string(),
        ));
    }

    let mut conn = state.diesel_pool.get().await?;

    let updated = AdminUser::update(
        &mut conn,
        admin_user_id,
        AdminUserUpdate {
            name: request.name.clone().map(|n| n.trim().to_string()),
            email: request.email.clone().map(|e| e.trim().to_lowercase()),
            password_hash,
            role,
            is_active: request.is_active,
            updated_at: Utc::now(),
        },
    )
    .await?
    .ok_or(ServiceError::NotFound("Admin user"))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "id": updated.id,
        "role": updated.role,
    })))
}

/// DELETE /api/admin/admin-users/{id}
pub async fn delete_admin_user(
    admin: AuthenticatedAdmin,
    State(state): State<AppState>,
    Path(admin_user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    require(&admin, Permission::AdminUsersManage)?;

    let mut conn = state.diesel_pool.get().await?;

    let deleted = AdminUser::delete(&mut conn, admin_user_id).await?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("Admin user"));
    }

    Ok(Json(serde_json::json!({ "success": true, "deleted": deleted })))
}
