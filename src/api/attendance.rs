use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::{
    approval::ApprovalStatus,
    attendance::{AttendanceRecord, AttendanceView},
};
use crate::state::AppState;

#[derive(Deserialize, ToSchema, Default)]
pub struct CheckInPayload {
    /// Optional reason; when given the record waits for HR review
    #[schema(example = "Train delayed")]
    pub explanation: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceResponse {
    #[schema(example = "Checked in successfully")]
    pub message: String,
    pub record: AttendanceRecord,
    pub view: AttendanceView,
}

fn with_record(message: &str, record: AttendanceRecord) -> HttpResponse {
    HttpResponse::Ok().json(AttendanceResponse {
        message: message.to_string(),
        view: AttendanceView::from(&record),
        record,
    })
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body(
        content = Option<CheckInPayload>,
        description = "Optional explanation",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceResponse),
        (status = 400, description = "Already checked in today or no shift scheduled", body = crate::api::MessageResponse, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: Option<web::Json<CheckInPayload>>,
) -> actix_web::Result<impl Responder> {
    let now = state.clock.now();
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();

    let record = state
        .attendance
        .check_in(&auth.actor(), now, payload.explanation.as_deref())
        .await?;

    Ok(with_record("Checked in successfully", record))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceResponse),
        (status = 400, description = "Not checked in, or already checked out", body = crate::api::MessageResponse, example = json!({
            "message": "Not checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(auth: AuthUser, state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let now = state.clock.now();
    let record = state.attendance.check_out(&auth.actor(), now).await?;

    Ok(with_record("Checked out successfully", record))
}

/// Today's record for the caller, `null` if none yet
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's attendance", body = Option<AttendanceView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(auth: AuthUser, state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let now = state.clock.now();
    let view = state.attendance.today(&auth.actor(), now).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Recent attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/history",
    responses(
        (status = 200, description = "Attendance history", body = Vec<AttendanceView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(auth: AuthUser, state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let rows = state.attendance.history(&auth.actor()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/* =========================
Approve / reject explained records (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/attendance/{record_id}/approve",
    params(
        ("record_id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record approved", body = AttendanceRecord),
        (status = 400, description = "Attendance record not found or already decided", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn approve_record(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let record = state
        .attendance
        .decide_record(&auth.actor(), path.into_inner(), ApprovalStatus::Approved)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    put,
    path = "/api/attendance/{record_id}/reject",
    params(
        ("record_id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record rejected", body = AttendanceRecord),
        (status = 400, description = "Attendance record not found or already decided", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn reject_record(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let record = state
        .attendance
        .decide_record(&auth.actor(), path.into_inner(), ApprovalStatus::Rejected)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}
