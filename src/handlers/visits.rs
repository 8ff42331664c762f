// Visit handlers: check-in workflow, checkout state machine, listings.
//
// Check-in policy: blacklist rejection is global by email; the duplicate
// guard is per visitor email, per company, per calendar day, and runs with
// a row lock inside the write transaction with a partial unique index as
// the backstop. Host resolution never silently substitutes another
// employee - an unknown host fails the request.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{NaiveDate, Utc};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        NewVisit, NewVisitor, PreRegistration, PreRegistrationStatus, User, UserError, Visit,
        VisitStatus, Visitor,
    },
    utils::{validation::truncate_to_limit, ServiceError},
};

/// MEDIUMTEXT ceiling carried over from the original photo columns.
/// Oversized images are dropped, not rejected.
const MAX_IMAGE_LENGTH: usize = 16_777_215;

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitRequest {
    #[serde(alias = "visitorName")]
    pub name: Option<String>,
    #[serde(alias = "visitorEmail")]
    pub email: Option<String>,
    #[serde(default, alias = "visitorPhone")]
    pub phone: Option<String>,
    #[serde(default, alias = "visitorDesignation")]
    pub designation: Option<String>,
    #[serde(default, alias = "visitorCompany")]
    pub company: Option<String>,
    #[serde(default, alias = "visitorPhoto")]
    pub photo: Option<String>,
    #[serde(default)]
    pub id_card_photo: Option<String>,
    #[serde(default)]
    pub id_card_number: Option<String>,
    #[serde(default)]
    pub id_card_type: Option<String>,
    #[serde(default)]
    pub company_tel: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(alias = "purpose")]
    pub reason: Option<String>,
    #[serde(default)]
    pub items_carried: Option<String>,
    #[serde(default)]
    pub host_id: Option<Uuid>,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default, alias = "pre_registration_id")]
    pub pre_registration_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct VisitListParams {
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct HostVisitParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostVisitItem {
    pub id: Uuid,
    pub reason: String,
    pub items_carried: Option<String>,
    pub check_in_time: String,
    pub check_out_time: Option<String>,
    pub status: String,
    pub visitor_id: Uuid,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: Option<String>,
    pub designation: String,
    pub company: String,
    pub id_card_number: String,
    pub host_id: Uuid,
    pub host_name: String,
}

fn required_trimmed(value: Option<&String>, message: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ServiceError::ValidationError(message.to_string())),
    }
}

/// Drop oversized base64 image payloads instead of rejecting the check-in
fn drop_oversized_image(value: Option<String>, name: &str) -> Option<String> {
    match value {
        Some(image) if image.len() > MAX_IMAGE_LENGTH => {
            tracing::warn!(
                "{} too long ({} chars), skipping photo storage",
                name,
                image.len()
            );
            None
        },
        other => other,
    }
}

fn clean_optional(value: Option<String>, name: &str, max: usize) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(truncate_to_limit(trimmed, name, max))
        }
    })
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/visits - Check in a visitor
pub async fn create_visit(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateVisitRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    // Required fields
    let visitor_name = truncate_to_limit(
        &required_trimmed(request.name.as_ref(), "Visitor name is required")?,
        "visitor name",
        100,
    );
    let visitor_email = truncate_to_limit(
        &required_trimmed(request.email.as_ref(), "Visitor email is required")?.to_lowercase(),
        "visitor email",
        100,
    );
    if request.host_id.is_none()
        && request
            .host_name
            .as_ref()
            .map(|n| n.trim().is_empty())
            .unwrap_or(true)
    {
        return Err(ServiceError::ValidationError("Host is required".to_string()));
    }
    let reason = match request.reason.as_deref().map(str::trim) {
        None | Some("") => {
            // Spec'd fallback, not an error
            tracing::warn!("Empty reason provided, using default");
            "General visit".to_string()
        },
        Some(r) => truncate_to_limit(r, "reason", 255),
    };

    let visitor_phone = clean_optional(request.phone.clone(), "visitor phone", 20);
    let visitor_company = clean_optional(request.company.clone(), "visitor company", 200);
    let photo = drop_oversized_image(request.photo.clone(), "Visitor photo");
    let id_card_photo = drop_oversized_image(request.id_card_photo.clone(), "ID card photo");

    let mut conn = state.diesel_pool.get().await?;

    // Resolve the host within the caller's company; unknown hosts fail the
    // request outright
    let host = match request.host_id {
        Some(host_id) => match User::find_by_id(&mut conn, host_id).await {
            Ok(host) if host.company_id == user.company_id => host,
            Ok(_) | Err(UserError::NotFound) => return Err(ServiceError::NotFound("Host")),
            Err(e) => return Err(ServiceError::DatabaseError(e.to_string())),
        },
        None => {
            let name = request.host_name.as_deref().unwrap_or("").trim();
            match User::find_host_by_name(&mut conn, user.company_id, name).await? {
                Some(host) => host,
                None => return Err(ServiceError::NotFound("Host")),
            }
        },
    };

    // Blacklist is enforced globally across tenants
    if Visitor::is_email_blacklisted(&mut conn, &visitor_email).await? {
        return Err(ServiceError::VisitorBlacklisted);
    }

    // Host display details resolved before the transactional writes, with
    // placeholders when columns are blank
    let host_name_value = if host.full_name.trim().is_empty() {
        format!("Host_{}", host.id)
    } else {
        host.full_name.clone()
    };
    let host_email_value = if host.email.trim().is_empty() {
        format!("host{}@company.local", host.id)
    } else {
        host.email.clone()
    };

    let today = Utc::now().date_naive();
    let company_id = user.company_id;
    let pre_registration_id = request.pre_registration_id;

    let new_visitor = NewVisitor {
        name: visitor_name.clone(),
        email: visitor_email.clone(),
        phone: visitor_phone.clone(),
        designation: clean_optional(request.designation.clone(), "visitor designation", 100),
        company: visitor_company.clone(),
        photo,
        id_card_photo,
        id_card_number: clean_optional(request.id_card_number.clone(), "ID card number", 50),
        id_card_type: clean_optional(request.id_card_type.clone(), "ID card type", 50),
        company_tel: clean_optional(request.company_tel.clone(), "company tel", 20),
        website: clean_optional(request.website.clone(), "website", 200),
        address: request.address.clone(),
    };

    let reason_for_tx = reason.clone();
    let items_carried = request.items_carried.clone();
    let host_id = host.id;
    let host_name_for_tx = host_name_value.clone();
    let host_email_for_tx = host_email_value.clone();
    let email_for_tx = visitor_email.clone();
    let name_for_tx = visitor_name.clone();
    let phone_for_tx = visitor_phone.clone();
    let company_for_tx = visitor_company.clone();

    let (visit, visitor) = conn
        .transaction::<(Visit, Visitor), ServiceError, _>(|conn| {
            async move {
                // Duplicate guard, locked for the duration of the insert
                if let Some(existing) =
                    Visit::find_open_checkin_for_update(conn, &email_for_tx, company_id, today)
                        .await?
                {
                    return Err(ServiceError::DuplicateCheckin {
                        existing_visit_id: Some(existing.id),
                    });
                }

                // Always a fresh visitor row, never an upsert
                let visitor = Visitor::create(conn, new_visitor).await?;

                let visit = Visit::create(
                    conn,
                    NewVisit {
                        visitor_id: visitor.id,
                        host_id,
                        company_id,
                        pre_registration_id,
                        purpose_of_visit: reason_for_tx,
                        items_carried,
                        status: VisitStatus::CheckedIn.as_str().to_string(),
                        visit_date: today,
                        visitor_name: name_for_tx,
                        visitor_email: email_for_tx,
                        visitor_phone: phone_for_tx,
                        visitor_company: company_for_tx,
                        host_name: host_name_for_tx,
                        host_email: host_email_for_tx,
                    },
                )
                .await?;

                if let Some(pre_reg_id) = pre_registration_id {
                    PreRegistration::set_status(
                        conn,
                        pre_reg_id,
                        PreRegistrationStatus::CheckedIn,
                    )
                    .await?;
                }

                Ok((visit, visitor))
            }
            .scope_boxed()
        })
        .await?;

    // Best-effort host notification, outside the transaction
    if let Err(e) = state
        .email_service
        .send_checkin_notification(
            &host_email_value,
            &host_name_value,
            &visitor_name,
            visitor_company.as_deref().unwrap_or(""),
            &reason,
            visit.check_in_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
        .await
    {
        tracing::warn!("Failed to send check-in notification: {}", e);
    }

    tracing::info!(
        visit_id = %visit.id,
        visitor_id = %visitor.id,
        host_id = %host.id,
        "Visitor checked in"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Visitor checked in successfully",
            "visitId": visit.id,
            "visitorId": visitor.id,
            "checkInTime": visit.check_in_time.to_rfc3339(),
            "hostId": host.id,
            "visitorName": visit.visitor_name,
            "visitorEmail": visit.visitor_email,
        })),
    ))
}

/// PUT /api/visits/{id}/checkout - Close an open visit exactly once
pub async fn checkout_visitor(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(visit_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;
    let check_out_time = Utc::now();

    let caller_id = user.user_id;
    let caller_company = user.company_id;
    let caller_is_host = user.is_host();

    let visit = conn
        .transaction::<Visit, ServiceError, _>(|conn| {
            async move {
                let visit = Visit::find_by_id_for_update(conn, visit_id)
                    .await?
                    .ok_or(ServiceError::NotFound("Visit"))?;

                // Hosts may only close their own visits; admins any visit
                // in their company. Foreign visits read as not-found.
                if caller_is_host && visit.host_id != caller_id {
                    return Err(ServiceError::NotFound("Visit"));
                }
                if visit.company_id != caller_company {
                    return Err(ServiceError::NotFound("Visit"));
                }

                // checked-in -> checked-out is terminal; a second checkout
                // is an error, not a no-op
                if visit.is_closed() {
                    return Err(ServiceError::AlreadyCheckedOut);
                }

                Visit::mark_checked_out(conn, visit.id, check_out_time).await?;

                if let Some(pre_reg_id) = visit.pre_registration_id {
                    PreRegistration::set_status(
                        conn,
                        pre_reg_id,
                        PreRegistrationStatus::CheckedOut,
                    )
                    .await?;
                }

                Ok(visit)
            }
            .scope_boxed()
        })
        .await?;

    if let Err(e) = state
        .email_service
        .send_checkout_notification(
            &visit.host_email,
            &visit.host_name,
            &visit.visitor_name,
            check_out_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
        .await
    {
        tracing::warn!("Failed to send checkout notification: {}", e);
    }

    tracing::info!(visit_id = %visit.id, "Visitor checked out");

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Visitor checked out successfully",
            "checkOutTime": check_out_time.to_rfc3339(),
        })),
    ))
}

/// GET /api/visits - Company-scoped visit listing with optional filters
pub async fn get_visits(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<VisitListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let visits = Visit::list_by_company(
        &mut conn,
        user.company_id,
        params.status.as_deref(),
        params.date_from,
        params.date_to,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "visits": visits,
        "total": visits.len(),
    })))
}

/// GET /api/host-visits - Paginated visits for the authenticated host
pub async fn get_host_visits(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<HostVisitParams>,
) -> Result<impl IntoResponse, ServiceError> {
    if !user.is_host() {
        return Err(ServiceError::Forbidden("Host access required".to_string()));
    }

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let mut conn = state.diesel_pool.get().await?;

    let total_visits = Visit::count_by_host(&mut conn, user.user_id).await?;
    let total_pages = if total_visits > 0 {
        (total_visits + limit - 1) / limit
    } else {
        1
    };

    let rows = Visit::list_by_host(&mut conn, user.user_id, limit, offset).await?;

    // Join visitor details, falling back to the denormalized copies when
    // the visitor record is missing or blank
    let mut items = Vec::with_capacity(rows.len());
    for visit in rows {
        let visitor = Visitor::find_by_id(&mut conn, visit.visitor_id).await?;
        items.push(host_visit_item(visit, visitor));
    }

    Ok(Json(serde_json::json!({
        "visits": items,
        "currentPage": page,
        "totalPages": total_pages,
        "totalVisits": total_visits,
        "limit": limit,
    })))
}

fn host_visit_item(visit: Visit, visitor: Option<Visitor>) -> HostVisitItem {
    let reason = if visit.purpose_of_visit.trim().is_empty() {
        "General Visit".to_string()
    } else {
        visit.purpose_of_visit.clone()
    };

    let (name, email, phone, designation, company, id_card_number) = match &visitor {
        Some(v) => (
            v.name.clone(),
            v.email.clone(),
            v.phone.clone(),
            v.designation.clone().unwrap_or_default(),
            v.company.clone().unwrap_or_default(),
            v.id_card_number.clone().unwrap_or_default(),
        ),
        None => (
            visit.visitor_name.clone(),
            visit.visitor_email.clone(),
            visit.visitor_phone.clone(),
            String::new(),
            visit.visitor_company.clone().unwrap_or_default(),
            String::new(),
        ),
    };

    HostVisitItem {
        id: visit.id,
        reason,
        items_carried: visit.items_carried.clone(),
        check_in_time: visit.check_in_time.to_rfc3339(),
        check_out_time: visit.check_out_time.map(|t| t.to_rfc3339()),
        status: visit.status.clone(),
        visitor_id: visit.visitor_id,
        visitor_name: name,
        visitor_email: email,
        visitor_phone: phone,
        designation,
        company,
        id_card_number,
        host_id: visit.host_id,
        host_name: visit.host_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_photo_is_dropped_not_rejected() {
        let huge = "x".repeat(MAX_IMAGE_LENGTH + 1);
        assert_eq!(drop_oversized_image(Some(huge), "photo"), None);

        let fine = "x".repeat(100);
        assert_eq!(
            drop_oversized_image(Some(fine.clone()), "photo"),
            Some(fine)
        );
    }

    #[test]
    fn test_required_trimmed() {
        assert!(required_trimmed(None, "missing").is_err());
        assert!(required_trimmed(Some(&"   ".to_string()), "missing").is_err());
        assert_eq!(
            required_trimmed(Some(&" x ".to_string()), "missing").unwrap(),
            "x"
        );
    }

    #[test]
    fn test_clean_optional_truncates() {
        let result = clean_optional(Some("a".repeat(30)), "phone", 20);
        assert_eq!(result.unwrap().len(), 20);
        assert_eq!(clean_optional(Some("  ".to_string()), "phone", 20), None);
    }

    #[test]
    fn test_create_visit_request_accepts_both_field_styles() {
        let json = serde_json::json!({
            "visitorName": "Jane",
            "visitorEmail": "jane@x.test",
            "purpose": "Interview",
            "hostName": "Bob Host"
        });
        let request: CreateVisitRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.name.as_deref(), Some("Jane"));
        assert_eq!(request.email.as_deref(), Some("jane@x.test"));
        assert_eq!(request.reason.as_deref(), Some("Interview"));
        assert_eq!(request.host_name.as_deref(), Some("Bob Host"));

        let json = serde_json::json!({
            "name": "Jane",
            "email": "jane@x.test",
            "reason": "Interview",
            "hostId": "00000000-0000-0000-0000-000000000001"
        });
        let request: CreateVisitRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.name.as_deref(), Some("Jane"));
        assert!(request.host_id.is_some());
    }
}
