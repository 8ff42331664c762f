// Route builders for the tenant API and the admin portal

pub mod admin;
pub mod auth;
pub mod pages;
pub mod reports;
pub mod subscriptions;
pub mod tickets;
pub mod users;
pub mod visitors;
pub mod visits;

use crate::app::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

/// Public tenant routes (no authentication)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/registerCompany", post(auth::register_company))
        .route("/verify-email", get(pages::verify_email_page))
        .route("/resend-verification", post(auth::resend_verification))
        .route("/login", post(auth::login))
        .route("/pricing/plans", get(subscriptions::get_pricing_plans))
        .route("/subscription/create", post(subscriptions::create_subscription))
}

/// Authenticated tenant routes
pub fn tenant_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/me", get(auth::get_current_user))
        .route("/users", get(users::list_users))
        .route("/hosts", get(users::list_hosts))
        .route("/visits", post(visits::create_visit).get(visits::get_visits))
        .route("/visits/{id}/checkout", put(visits::checkout_visitor))
        .route("/host-visits", get(visits::get_host_visits))
        .route("/visitors/pending", get(visitors::get_pending_visitors))
        .route(
            "/visitors/blacklisted",
            get(visitors::get_blacklisted_visitors),
        )
        .route("/visitors/counts", get(visitors::get_visitor_counts))
        .route(
            "/visitors/status-counts",
            get(visitors::get_visitor_status_counts),
        )
        .route("/visitors/{id}/blacklist", put(visitors::blacklist_visitor))
        .route("/visitors/pre-register", post(visitors::pre_register_visitor))
        .route(
            "/visitors/pre-registrations",
            get(visitors::get_pre_registrations),
        )
        .route("/visitors/qr-checkin", post(visitors::qr_checkin))
        .route("/reports", get(reports::get_reports))
        .route("/reports/export", get(reports::export_reports))
        .route(
            "/tickets",
            post(tickets::create_ticket).get(tickets::list_tickets),
        )
        .layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth_middleware,
        ))
}

/// Admin portal routes
pub fn admin_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/overview", get(admin::overview))
        .route("/companies", get(admin::list_companies))
        .route("/subscriptions", get(admin::list_subscriptions))
        .route("/payments", get(admin::list_payments))
        .route(
            "/pricing-plans",
            get(admin::list_pricing_plans).post(admin::create_pricing_plan),
        )
        .route(
            "/pricing-plans/{id}",
            put(admin::update_pricing_plan).delete(admin::delete_pricing_plan),
        )
        .route("/support", get(admin::list_support_tickets))
        .route("/support/{id}", put(admin::update_support_ticket))
        .route(
            "/admin-users",
            get(admin::list_admin_users).post(admin::create_admin_user),
        )
        .route(
            "/admin-users/{id}",
            put(admin::update_admin_user).delete(admin::delete_admin_user),
        )
        .layer(middleware::from_fn_with_state(
            state,
            crate::middleware::admin_auth_middleware,
        ));

    Router::new()
        .route("/login", post(admin::login))
        .merge(protected)
}
