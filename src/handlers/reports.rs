// Reporting handlers: company aggregates and html/csv export.
// PDF and spreadsheet rendering are not provided; those formats are
// rejected with the supported alternatives named.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::AsyncPgConnection;
use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    app::AppState,
    config::Permission,
    middleware::auth::AuthenticatedUser,
    models::Visit,
    utils::ServiceError,
};

static REPORT_TEMPLATES: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut templates = Handlebars::new();
    templates
        .register_template_string(
            "visit_report",
            include_str!("../../templates/report/visit_report.html"),
        )
        .expect("report template must parse");
    templates
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOverview {
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub avg_duration_minutes: f64,
}

#[derive(Debug, Serialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub visits: i64,
}

#[derive(Debug, Serialize)]
pub struct HostStat {
    pub host_name: String,
    pub visits: i64,
}

#[derive(Debug, Serialize)]
pub struct PurposeStat {
    pub purpose: String,
    pub count: i64,
}

struct ReportData {
    overview: ReportOverview,
    daily: Vec<DailyStat>,
    hosts: Vec<HostStat>,
    purposes: Vec<PurposeStat>,
}

async fn gather_report(
    conn: &mut AsyncPgConnection,
    company: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<ReportData, diesel::result::Error> {
    use crate::schema::visits::dsl::*;

    // Open-ended filters collapse to a full-range scan
    let from = from.unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    let to = to.unwrap_or_else(|| NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());

    let total_visits: i64 = visits
        .filter(company_id.eq(company))
        .filter(visit_date.ge(from))
        .filter(visit_date.le(to))
        .count()
        .get_result(conn)
        .await?;

    let unique_visitors: i64 = visits
        .filter(company_id.eq(company))
        .filter(visit_date.ge(from))
        .filter(visit_date.le(to))
        .select(diesel::dsl::count_distinct(visitor_email))
        .get_result(conn)
        .await?;

    let avg_duration: Option<f64> = visits
        .filter(company_id.eq(company))
        .filter(visit_date.ge(from))
        .filter(visit_date.le(to))
        .select(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Double>,
        >(
            "AVG(EXTRACT(EPOCH FROM (check_out_time - check_in_time)) / 60.0)",
        ))
        .get_result(conn)
        .await?;

    let daily_rows: Vec<(NaiveDate, i64)> = visits
        .filter(company_id.eq(company))
        .filter(visit_date.ge(from))
        .filter(visit_date.le(to))
        .group_by(visit_date)
        .select((visit_date, diesel::dsl::count_star()))
        .order(visit_date.asc())
        .load(conn)
        .await?;

    let mut host_rows: Vec<(String, i64)> = visits
        .filter(company_id.eq(company))
        .filter(visit_date.ge(from))
        .filter(visit_date.le(to))
        .group_by(host_name)
        .select((host_name, diesel::dsl::count_star()))
        .load(conn)
        .await?;
    host_rows.sort_by(|a, b| b.1.cmp(&a.1));

    let mut purpose_rows: Vec<(String, i64)> = visits
        .filter(company_id.eq(company))
        .filter(visit_date.ge(from))
        .filter(visit_date.le(to))
        .group_by(purpose_of_visit)
        .select((purpose_of_visit, diesel::dsl::count_star()))
        .load(conn)
        .await?;
    purpose_rows.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(ReportData {
        overview: ReportOverview {
            total_visits,
            unique_visitors,
            avg_duration_minutes: avg_duration.unwrap_or(0.0),
        },
        daily: daily_rows
            .into_iter()
            .map(|(date, count)| DailyStat {
                date,
                visits: count,
            })
            .collect(),
        hosts: host_rows
            .into_iter()
            .map(|(name, count)| HostStat {
                host_name: name,
                visits: count,
            })
            .collect(),
        purposes: purpose_rows
            .into_iter()
            .map(|(purpose, count)| PurposeStat { purpose, count })
            .collect(),
    })
}

/// GET /api/reports - Company report aggregates
pub async fn get_reports(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, ServiceError> {
    if !user.has_permission(Permission::ReportsView) {
        return Err(ServiceError::Forbidden("Admin access required".to_string()));
    }

    let mut conn = state.diesel_pool.get().await?;

    let report = gather_report(
        &mut conn,
        user.company_id,
        params.start_date,
        params.end_date,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "overview": report.overview,
        "dailyStats": report.daily,
        "hostStats": report.hosts,
        "purposeStats": report.purposes,
    })))
}

/// GET /api/reports/export?format=html|csv - Rendered report download
pub async fn export_reports(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Response, ServiceError> {
    if !user.has_permission(Permission::ReportsView) {
        return Err(ServiceError::Forbidden("Admin access required".to_string()));
    }

    let format = params.format.as_deref().unwrap_or("html").to_lowercase();
    if format != "html" && format != "csv" {
        return Err(ServiceError::ValidationError(format!(
            "Unsupported export format '{}'. Supported formats: html, csv",
            format
        )));
    }

    let mut conn = state.diesel_pool.get().await?;

    let visits = Visit::list_by_company(
        &mut conn,
        user.company_id,
        None,
        params.start_date,
        params.end_date,
    )
    .await?;

    if format == "csv" {
        let csv = render_csv(&visits);
        return Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"visitor_report.csv\"".to_string(),
                ),
            ],
            csv,
        )
            .into_response());
    }

    let report = gather_report(
        &mut conn,
        user.company_id,
        params.start_date,
        params.end_date,
    )
    .await?;

    let period = match (params.start_date, params.end_date) {
        (Some(from), Some(to)) => format!("{} to {}", from, to),
        _ => "All time".to_string(),
    };

    let data = serde_json::json!({
        "company_name": user.company_name,
        "period": period,
        "total_visits": report.overview.total_visits,
        "unique_visitors": report.overview.unique_visitors,
        "avg_duration_minutes": format!("{:.0}", report.overview.avg_duration_minutes),
        "visits": visits.iter().map(|v| serde_json::json!({
            "visitor_name": v.visitor_name,
            "visitor_company": v.visitor_company.clone().unwrap_or_default(),
            "host_name": v.host_name,
            "purpose": v.purpose_of_visit,
            "check_in_time": v.check_in_time.format("%Y-%m-%d %H:%M").to_string(),
            "check_out_time": v.check_out_time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            "status": v.status,
        })).collect::<Vec<_>>(),
        "generated_at": Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
        "app_name": state.config.email.from_name,
    });

    let html = REPORT_TEMPLATES
        .render("visit_report", &data)
        .map_err(|e| {
            tracing::error!("Report template rendering failed: {}", e);
            ServiceError::InternalError
        })?;

    Ok(Html(html).into_response())
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render_csv(visits: &[Visit]) -> String {
    let mut out = String::from(
        "visitor_name,visitor_email,visitor_company,host_name,purpose,check_in_time,check_out_time,status\n",
    );
    for v in visits {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            csv_escape(&v.visitor_name),
            csv_escape(&v.visitor_email),
            csv_escape(v.visitor_company.as_deref().unwrap_or("")),
            csv_escape(&v.host_name),
            csv_escape(&v.purpose_of_visit),
            v.check_in_time.format("%Y-%m-%d %H:%M:%S"),
            v.check_out_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            v.status,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escaping() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("has,comma"), "\"has,comma\"");
        assert_eq!(csv_escape("has\"quote"), "\"has\"\"quote\"");
    }

    #[test]
    fn test_report_template_renders() {
        let data = serde_json::json!({
            "company_name": "Acme",
            "period": "All time",
            "total_visits": 3,
            "unique_visitors": 2,
            "avg_duration_minutes": "42",
            "visits": [{
                "visitor_name": "Jane",
                "visitor_company": "Globex",
                "host_name": "Bob",
                "purpose": "Meeting",
                "check_in_time": "2025-09-01 10:00",
                "check_out_time": "2025-09-01 11:00",
                "status": "checked-out",
            }],
            "generated_at": "2025-09-01 12:00 UTC",
            "app_name": "VMS",
        });

        let html = REPORT_TEMPLATES.render("visit_report", &data).unwrap();
        assert!(html.contains("Acme"));
        assert!(html.contains("Jane"));
        assert!(html.contains("Globex"));
    }
}
