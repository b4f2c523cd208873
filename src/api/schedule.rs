use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::MessageResponse;
use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::{schedule::NewScheduleAssignment, shift::ShiftResponse};
use crate::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct UpsertSchedule {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "2026-02-02", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    #[schema(example = 1)]
    pub shift_id: u64,
    #[schema(example = "Covering the morning desk")]
    pub note: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct ScheduleRange {
    /// First date (inclusive)
    pub start: NaiveDate,
    /// Last date (inclusive)
    pub end: NaiveDate,
    /// Filter by employee ID (administrators only)
    pub employee_id: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct ResolveQuery {
    /// Defaults to the caller's own employee ID
    pub employee_id: Option<u64>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct ResolvedShift {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "2026-02-02", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// `SCHEDULED` or `OFF`
    #[schema(example = "SCHEDULED")]
    pub status: String,
    pub shift: Option<ShiftResponse>,
}

/* =========================
Upsert one assignment (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/schedules",
    request_body(content = UpsertSchedule, content_type = "application/json"),
    responses(
        (status = 200, description = "Assignment created or replaced", body = crate::model::schedule::ScheduleAssignment),
        (status = 400, description = "Unknown employee or shift", body = crate::api::MessageResponse, example = json!({
            "message": "Shift not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn upsert_schedule(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<UpsertSchedule>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let assignment = state
        .resolver
        .assign(
            &auth.actor(),
            NewScheduleAssignment {
                employee_id: payload.employee_id,
                work_date: payload.work_date,
                shift_id: payload.shift_id,
                note: payload.note.filter(|n| !n.trim().is_empty()),
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(assignment))
}

#[utoipa::path(
    delete,
    path = "/api/schedules/{schedule_id}",
    params(
        ("schedule_id" = u64, Path, description = "Schedule assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment removed", body = crate::api::MessageResponse),
        (status = 404, description = "Schedule assignment not found", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn delete_schedule(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    state.resolver.remove(&auth.actor(), path.into_inner()).await?;
    Ok(MessageResponse::ok("Schedule assignment removed"))
}

#[utoipa::path(
    get,
    path = "/api/schedules",
    params(ScheduleRange),
    responses(
        (status = 200, description = "Assignments ordered by date", body = Vec<crate::model::schedule::ScheduleAssignment>),
        (status = 400, description = "start after end", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn list_schedules(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<ScheduleRange>,
) -> actix_web::Result<impl Responder> {
    let rows = state
        .resolver
        .list(&auth.actor(), query.start, query.end, query.employee_id)
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// The shift that applies to an employee on a date, or OFF
#[utoipa::path(
    get,
    path = "/api/schedules/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Resolved shift", body = ResolvedShift),
        (status = 400, description = "No employee given", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn resolve_schedule(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<ResolveQuery>,
) -> actix_web::Result<impl Responder> {
    let actor = auth.actor();
    let employee_id = actor
        .scope_employee(query.employee_id)?
        .ok_or_else(|| AppError::validation("employee_id is required"))?;
    let date = query.date.unwrap_or_else(|| state.clock.now().date());

    let shift = state.resolver.resolve(employee_id, date).await?;
    Ok(HttpResponse::Ok().json(ResolvedShift {
        employee_id,
        date,
        status: if shift.is_some() { "SCHEDULED" } else { "OFF" }.to_string(),
        shift: shift.map(ShiftResponse::from),
    }))
}
