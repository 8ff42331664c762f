// Company user listings: the full roster for tenant admins, and the host
// picker used by the check-in form

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    app::AppState,
    config::Permission,
    middleware::auth::AuthenticatedUser,
    models::User,
    utils::ServiceError,
};

/// GET /api/users - Users scoped to the caller's company (admin only)
pub async fn list_users(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    if !user.has_permission(Permission::UsersManage) {
        return Err(ServiceError::Forbidden("Admin access required".to_string()));
    }

    let mut conn = state.diesel_pool.get().await?;
    let users = User::list_by_company(&mut conn, user.company_id).await?;

    let rows: Vec<serde_json::Value> = users
        .into_iter()
        .map(|u| {
            serde_json::json!({
                "id": u.id,
                "name": u.full_name,
                "email": u.email,
                "role": u.role,
                "company_name": u.company_name,
                "mobile_number": u.mobile_number,
                "department": u.department,
                "designation": u.designation,
                "is_verified": u.is_verified,
                "is_active": u.is_active,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "users": rows,
        "total": rows.len(),
    })))
}

/// GET /api/hosts - Hosts and admins available to receive visitors
pub async fn list_hosts(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;
    let users = User::list_by_company(&mut conn, user.company_id).await?;

    let hosts: Vec<serde_json::Value> = users
        .into_iter()
        .filter(|u| u.is_active)
        .map(|u| {
            serde_json::json!({
                "id": u.id,
                "name": u.full_name,
                "email": u.email,
                "department": u.department,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "hosts": hosts,
        "total": hosts.len(),
    })))
}
