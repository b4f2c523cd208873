use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::{DecisionPayload, RequestListQuery, decide_request};
use crate::auth::auth::AuthUser;
use crate::model::approval::RequestKind;
use crate::services::request_service::RequestQuery;
use crate::state::AppState;

/// At least one of the three requested fields must be non-blank.
#[derive(Deserialize, ToSchema)]
pub struct CreateTimesheetAdjustment {
    #[schema(example = "2026-02-02", format = "date", value_type = String)]
    pub work_date: NaiveDate,
    #[schema(example = "08:00")]
    pub requested_check_in: Option<String>,
    #[schema(example = "17:00")]
    pub requested_check_out: Option<String>,
    #[schema(example = "Forgot to check out")]
    pub requested_note: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/timesheet-adjustments",
    request_body(
        content = CreateTimesheetAdjustment,
        description = "Requested correction",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Adjustment request submitted", body = crate::model::timesheet_adjustment::TimesheetAdjustmentRequest),
        (status = 400, description = "Bad request", body = crate::api::MessageResponse, example = json!({
            "message": "No attendance record to adjust"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timesheet Adjustment"
)]
pub async fn create_adjustment(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateTimesheetAdjustment>,
) -> actix_web::Result<impl Responder> {
    let now = state.clock.now();
    let request = state
        .requests
        .create_timesheet_adjustment(
            &auth.actor(),
            now,
            payload.work_date,
            payload.requested_check_in.as_deref(),
            payload.requested_check_out.as_deref(),
            payload.requested_note.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(request))
}

/// Approval rewrites the attendance record in the same transaction.
#[utoipa::path(
    put,
    path = "/api/timesheet-adjustments/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "Adjustment request ID")
    ),
    request_body(content = Option<DecisionPayload>, content_type = "application/json"),
    responses(
        (status = 200, description = "Adjustment approved and applied", body = crate::api::MessageResponse),
        (status = 400, description = "Not pending, or the adjustment cannot be applied", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timesheet Adjustment"
)]
pub async fn approve_adjustment(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionPayload>>,
) -> actix_web::Result<impl Responder> {
    let kind = RequestKind::TimesheetAdjustment;
    Ok(decide_request(&state, &auth, kind, path.into_inner(), payload, true).await?)
}

#[utoipa::path(
    put,
    path = "/api/timesheet-adjustments/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "Adjustment request ID")
    ),
    request_body(content = Option<DecisionPayload>, content_type = "application/json"),
    responses(
        (status = 200, description = "Adjustment rejected", body = crate::api::MessageResponse),
        (status = 400, description = "Not found or already processed", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timesheet Adjustment"
)]
pub async fn reject_adjustment(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionPayload>>,
) -> actix_web::Result<impl Responder> {
    let kind = RequestKind::TimesheetAdjustment;
    Ok(decide_request(&state, &auth, kind, path.into_inner(), payload, false).await?)
}

#[utoipa::path(
    get,
    path = "/api/timesheet-adjustments",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Adjustment requests, newest first", body = Vec<crate::model::timesheet_adjustment::TimesheetAdjustmentRequest>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Timesheet Adjustment"
)]
pub async fn list_adjustments(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<RequestListQuery>,
) -> actix_web::Result<impl Responder> {
    let rows = state
        .requests
        .list_timesheet_adjustments(&auth.actor(), &RequestQuery::from(&*query))
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}
