use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::state::AppState;

#[derive(Deserialize, IntoParams)]
pub struct ReportQuery {
    /// First date (inclusive), default: end minus the configured window
    pub start: Option<NaiveDate>,
    /// Last date (inclusive), default: today
    pub end: Option<NaiveDate>,
    /// Filter by employee ID (employees always get their own)
    pub employee_id: Option<u64>,
    /// Filter by department ID
    pub department_id: Option<u64>,
}

/// Worked time per record plus per-employee totals
#[utoipa::path(
    get,
    path = "/api/reports/attendance",
    params(ReportQuery),
    responses(
        (status = 200, description = "Attendance report", body = crate::services::report_service::AttendanceReport),
        (status = 400, description = "start after end", body = crate::api::MessageResponse, example = json!({
            "message": "start date must not be after end date"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Report"
)]
pub async fn attendance_report(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let today = state.clock.now().date();
    let report = state
        .reports
        .build_report(
            &auth.actor(),
            today,
            query.start,
            query.end,
            query.employee_id,
            query.department_id,
        )
        .await?;

    Ok(HttpResponse::Ok().json(report))
}
