// Visitor handlers: blacklist management, dashboard counts,
// pre-registration, and QR redemption

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    app::AppState,
    config::Permission,
    middleware::auth::AuthenticatedUser,
    models::{
        NewPreRegistration, PreRegistration, PreRegistrationStatus, User, Visit, Visitor,
    },
    services::qr_code,
    utils::ServiceError,
};

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistRequest {
    #[serde(default)]
    pub is_blacklisted: bool,
    #[serde(default)]
    pub reason_for_blacklist: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreRegisterRequest {
    pub visitor_name: String,
    pub visitor_email: String,
    #[serde(default)]
    pub visitor_phone: Option<String>,
    #[serde(default)]
    pub visitor_company: Option<String>,
    pub host_name: String,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub purpose: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub number_of_visitors: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct QrCheckinRequest {
    pub qr_code: Option<String>,
    #[serde(default)]
    pub host_id: Option<Uuid>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// GET /api/visitors/pending - Pending pre-registrations for the company
pub async fn get_pending_visitors(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let pending = PreRegistration::list_by_company(
        &mut conn,
        user.company_id,
        Some(PreRegistrationStatus::Pending),
    )
    .await?;

    Ok(Json(serde_json::json!({
        "pending_visitors": pending,
        "total": pending.len(),
    })))
}

/// GET /api/visitors/blacklisted - Blacklisted visitors
pub async fn get_blacklisted_visitors(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let blacklisted = Visitor::list_blacklisted(&mut conn).await?;

    Ok(Json(serde_json::json!({
        "blacklisted_visitors": blacklisted,
        "total": blacklisted.len(),
    })))
}

/// GET /api/visitors/counts - Dashboard aggregates
pub async fn get_visitor_counts(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let counts =
        Visit::counts_for_company(&mut conn, user.company_id, Utc::now().date_naive()).await?;

    Ok(Json(counts))
}

/// GET /api/visitors/status-counts - Status counts shaped for the
/// frontend dashboard
pub async fn get_visitor_status_counts(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let counts =
        Visit::counts_for_company(&mut conn, user.company_id, Utc::now().date_naive()).await?;

    Ok(Json(serde_json::json!({
        "checked_in": counts.checked_in,
        "checked_out": counts.checked_out,
        "today": counts.today_visits,
        "total": counts.total_visits,
    })))
}

/// PUT /api/visitors/{id}/blacklist - Flag or unflag a visitor.
/// Every visitor row sharing the email address is updated, not just the
/// addressed id.
pub async fn blacklist_visitor(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(visitor_id): Path<Uuid>,
    Json(request): Json<BlacklistRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if !user.has_permission(Permission::VisitorsManage) {
        return Err(ServiceError::Forbidden(
            "Admin access required to blacklist visitors".to_string(),
        ));
    }

    let mut conn = state.diesel_pool.get().await?;

    let visitor = Visitor::find_by_id(&mut conn, visitor_id)
        .await?
        .ok_or(ServiceError::NotFound("Visitor"))?;

    let reason = if request.is_blacklisted {
        request.reason_for_blacklist.clone()
    } else {
        None
    };

    let affected = Visitor::set_blacklist_by_email(
        &mut conn,
        &visitor.email,
        request.is_blacklisted,
        reason.clone(),
    )
    .await?;

    let action = if request.is_blacklisted {
        "blacklisted"
    } else {
        "unblacklisted"
    };
    tracing::info!(
        admin = %user.user_id,
        email = %visitor.email,
        affected,
        "All visitors with email {}",
        action
    );

    Ok(Json(serde_json::json!({
        "message": format!(
            "All visitors with email {} {} successfully. {} records updated.",
            visitor.email, action, affected
        ),
        "visitorId": visitor.id,
        "visitorName": visitor.name,
        "visitorEmail": visitor.email,
        "isBlacklisted": request.is_blacklisted,
        "reasonForBlacklist": reason,
        "affectedRecords": affected,
    })))
}

/// POST /api/visitors/pre-register - Advance-register an expected visitor
pub async fn pre_register_visitor(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<PreRegisterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if request.visitor_name.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "visitorName is required".to_string(),
        ));
    }
    if request.visitor_email.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "visitorEmail is required".to_string(),
        ));
    }
    if request.purpose.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "purpose is required".to_string(),
        ));
    }

    let mut conn = state.diesel_pool.get().await?;

    // The named host is informational here; resolve an id when it matches
    let host =
        User::find_host_by_name(&mut conn, user.company_id, request.host_name.trim()).await?;

    let code = qr_code::generate_qr_code();

    let pre_reg = PreRegistration::create(
        &mut conn,
        NewPreRegistration {
            company_id: user.company_id,
            host_id: host.as_ref().map(|h| h.id),
            host_name: Some(request.host_name.trim().to_string()),
            visitor_name: request.visitor_name.trim().to_string(),
            visitor_email: request.visitor_email.trim().to_lowercase(),
            visitor_phone: request.visitor_phone.clone(),
            visitor_company: request.visitor_company.clone(),
            company_to_visit: user.company_name.clone(),
            visit_date: request.visit_date,
            visit_time: Some(request.visit_time.clone()),
            purpose: request.purpose.trim().to_string(),
            duration: request.duration.clone(),
            special_requirements: request.special_requirements.clone(),
            emergency_contact: request.emergency_contact.clone(),
            vehicle_number: request.vehicle_number.clone(),
            number_of_visitors: request.number_of_visitors.unwrap_or(1).max(1),
            qr_code: code.clone(),
            status: PreRegistrationStatus::Pending.as_str().to_string(),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Visitor pre-registered successfully",
            "id": pre_reg.id,
            "qrCode": code,
        })),
    ))
}

/// GET /api/visitors/pre-registrations - Company-scoped listing
pub async fn get_pre_registrations(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let registrations =
        PreRegistration::list_by_company(&mut conn, user.company_id, None).await?;

    Ok(Json(serde_json::json!({
        "pre_registrations": registrations,
        "total": registrations.len(),
    })))
}

/// POST /api/visitors/qr-checkin - Redeem a QR token for form pre-fill.
/// Redemption does not create the visit; the pre-filled form is submitted
/// to POST /api/visits with the pre_registration_id.
pub async fn qr_checkin(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<QrCheckinRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let code = match request.qr_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => {
            return Err(ServiceError::ValidationError(
                "QR code is required".to_string(),
            ));
        },
    };

    let mut conn = state.diesel_pool.get().await?;

    let pre_reg = PreRegistration::find_redeemable_by_qr(&mut conn, &code)
        .await?
        .ok_or(ServiceError::NotFound("Pre-registration"))?;

    // Resolve the host display name for the form
    let mut host_name = pre_reg
        .host_name
        .clone()
        .unwrap_or_else(|| "Unknown Host".to_string());
    let effective_host_id = request.host_id.or(pre_reg.host_id).unwrap_or(user.user_id);
    if let Some(host_id) = pre_reg.host_id {
        if let Ok(host) = User::find_by_id(&mut conn, host_id).await {
            host_name = host.full_name;
        }
    }

    // Double-redemption guard: an open visit today blocks the token
    let today = Utc::now().date_naive();
    if Visit::has_open_checkin_today(&mut conn, &pre_reg.visitor_email, today).await? {
        return Err(ServiceError::DuplicateCheckin {
            existing_visit_id: None,
        });
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "QR code verified successfully",
        "visitor_name": pre_reg.visitor_name,
        "visitor_email": pre_reg.visitor_email,
        "visitor_phone": pre_reg.visitor_phone,
        "visitor_company": pre_reg.visitor_company,
        "purpose": pre_reg.purpose,
        "host_name": host_name,
        "host_id": effective_host_id,
        "pre_registration_id": pre_reg.id,
        "visit_date": pre_reg.visit_date,
        "visit_time": pre_reg.visit_time,
    })))
}
