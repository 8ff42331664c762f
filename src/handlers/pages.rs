// HTML result pages for email-link navigation.
// Verification links open directly in a browser, so these endpoints
// return styled pages instead of JSON.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use crate::{
    app::AppState,
    services::verification::{VerificationError, VerificationService},
};

#[derive(Debug, Deserialize)]
pub struct VerifyEmailParams {
    pub token: Option<String>,
}

fn result_page(title: &str, heading: &str, body: &str, success: bool) -> String {
    let accent = if success { "#28a745" } else { "#dc3545" };
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    body {{ font-family: Arial, sans-serif; background: #f4f5f7; margin: 0; padding: 0; }}
    .card {{ max-width: 480px; margin: 80px auto; background: white; border-radius: 10px;
             padding: 40px; text-align: center; box-shadow: 0 2px 12px rgba(0,0,0,0.08); }}
    .badge {{ width: 64px; height: 64px; border-radius: 50%; margin: 0 auto 20px;
              background: {accent}; color: white; font-size: 36px; line-height: 64px; }}
    h1 {{ color: #333; font-size: 22px; }}
    p {{ color: #666; line-height: 1.6; }}
    a.button {{ display: inline-block; margin-top: 20px; background-color: #007bff;
                color: white; padding: 12px 28px; text-decoration: none;
                border-radius: 5px; font-weight: bold; }}
  </style>
</head>
<body>
  <div class="card">
    <div class="badge">{mark}</div>
    <h1>{heading}</h1>
    <p>{body}</p>
    <a class="button" href="{frontend}/login">Go to Login</a>
  </div>
</body>
</html>"#,
        title = title,
        accent = accent,
        mark = if success { "&#10003;" } else { "&#10007;" },
        heading = heading,
        body = body,
        frontend = crate::app_config::config().frontend_url,
    )
}

/// GET /api/verify-email?token= - Consume a verification token and show
/// the outcome as a page
pub async fn verify_email_page(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> impl IntoResponse {
    let token = match params.token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Html(result_page(
                    "Verification Failed",
                    "Missing verification token",
                    "The verification link is incomplete. Please use the link from your email.",
                    false,
                )),
            );
        },
    };

    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Failed to get database connection: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(result_page(
                    "Verification Failed",
                    "Something went wrong",
                    "We couldn't verify your email right now. Please try again later.",
                    false,
                )),
            );
        },
    };

    match VerificationService::consume_token(&mut conn, token).await {
        Ok(verified) if verified.already_verified => (
            StatusCode::OK,
            Html(result_page(
                "Email Verified",
                "Email already verified",
                "Your email address was already verified. You can log in to your dashboard.",
                true,
            )),
        ),
        Ok(_) => (
            StatusCode::OK,
            Html(result_page(
                "Email Verified",
                "Email verified successfully!",
                "Your email address has been verified. You can now log in to your admin dashboard.",
                true,
            )),
        ),
        Err(VerificationError::TokenExpired) => (
            StatusCode::BAD_REQUEST,
            Html(result_page(
                "Verification Failed",
                "Verification link expired",
                "This verification link has expired. Request a new one from the login page.",
                false,
            )),
        ),
        Err(VerificationError::TokenUsed) | Err(VerificationError::InvalidToken) => (
            StatusCode::BAD_REQUEST,
            Html(result_page(
                "Verification Failed",
                "Invalid verification link",
                "This verification link is invalid or has already been used.",
                false,
            )),
        ),
        Err(e) => {
            tracing::error!("Email verification error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(result_page(
                    "Verification Failed",
                    "Something went wrong",
                    "We couldn't verify your email right now. Please try again later.",
                    false,
                )),
            )
        },
    }
}
