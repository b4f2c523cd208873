use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::{DecisionPayload, RequestListQuery, decide_request};
use crate::auth::auth::AuthUser;
use crate::model::approval::RequestKind;
use crate::services::request_service::RequestQuery;
use crate::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct CreateScheduleChange {
    #[schema(example = "2026-02-02", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    #[schema(example = 2)]
    pub requested_shift_id: u64,
    /// Business justification, required
    #[schema(example = "Swapping with a colleague")]
    pub requested_note: String,
}

#[utoipa::path(
    post,
    path = "/api/schedule-changes",
    request_body(
        content = CreateScheduleChange,
        description = "Requested shift for one date",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Schedule change submitted", body = crate::model::schedule_change::ScheduleChangeRequest),
        (status = 400, description = "Bad request", body = crate::api::MessageResponse, example = json!({
            "message": "note is required"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule Change"
)]
pub async fn create_schedule_change(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateScheduleChange>,
) -> actix_web::Result<impl Responder> {
    let now = state.clock.now();
    let request = state
        .requests
        .create_schedule_change(
            &auth.actor(),
            now,
            payload.work_date,
            payload.requested_shift_id,
            &payload.requested_note,
        )
        .await?;

    Ok(HttpResponse::Ok().json(request))
}

/// Approval upserts the schedule assignment in the same transaction.
#[utoipa::path(
    put,
    path = "/api/schedule-changes/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "Schedule change request ID")
    ),
    request_body(content = Option<DecisionPayload>, content_type = "application/json"),
    responses(
        (status = 200, description = "Schedule change approved and assigned", body = crate::api::MessageResponse),
        (status = 400, description = "Not pending, or the assignment cannot be applied", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule Change"
)]
pub async fn approve_schedule_change(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionPayload>>,
) -> actix_web::Result<impl Responder> {
    let kind = RequestKind::ScheduleChange;
    Ok(decide_request(&state, &auth, kind, path.into_inner(), payload, true).await?)
}

#[utoipa::path(
    put,
    path = "/api/schedule-changes/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "Schedule change request ID")
    ),
    request_body(content = Option<DecisionPayload>, content_type = "application/json"),
    responses(
        (status = 200, description = "Schedule change rejected", body = crate::api::MessageResponse),
        (status = 400, description = "Not found or already processed", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule Change"
)]
pub async fn reject_schedule_change(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionPayload>>,
) -> actix_web::Result<impl Responder> {
    let kind = RequestKind::ScheduleChange;
    Ok(decide_request(&state, &auth, kind, path.into_inner(), payload, false).await?)
}

#[utoipa::path(
    get,
    path = "/api/schedule-changes",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Schedule change requests, newest first", body = Vec<crate::model::schedule_change::ScheduleChangeRequest>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule Change"
)]
pub async fn list_schedule_changes(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<RequestListQuery>,
) -> actix_web::Result<impl Responder> {
    let rows = state
        .requests
        .list_schedule_changes(&auth.actor(), &RequestQuery::from(&*query))
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}
