// Support ticket handlers for tenants

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::{NewSupportTicket, SupportTicket, TicketPriority, TicketStatus},
    utils::ServiceError,
};

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// POST /api/tickets - Raise a support ticket for the caller's company.
/// New tickets open at medium priority.
pub async fn create_ticket(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();

    if title.is_empty() || description.is_empty() {
        return Err(ServiceError::ValidationError(
            "title and description are required".to_string(),
        ));
    }

    let mut conn = state.diesel_pool.get().await?;

    let ticket = SupportTicket::create(
        &mut conn,
        NewSupportTicket {
            title,
            description,
            status: TicketStatus::Open.as_str().to_string(),
            priority: TicketPriority::Medium.as_str().to_string(),
            category: request
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
            created_by_company: user.company_name.clone(),
            created_by_email: Some(user.email.clone()),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Created",
            "ticket": ticket,
        })),
    ))
}

/// GET /api/tickets - Non-closed tickets raised by the caller
pub async fn list_tickets(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let mut conn = state.diesel_pool.get().await?;

    let tickets = SupportTicket::list_open_by_email(&mut conn, &user.email).await?;

    Ok(Json(tickets))
}
