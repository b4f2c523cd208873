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
pub struct CreateLeave {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family event")]
    pub reason: String,
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "Bad request", body = crate::api::MessageResponse, example = json!({
            "message": "reason is required"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let now = state.clock.now();
    let leave = state
        .requests
        .create_leave(
            &auth.actor(),
            now,
            payload.start_date,
            payload.end_date,
            &payload.reason,
        )
        .await?;

    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Approve leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body(content = Option<DecisionPayload>, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave approved", body = crate::api::MessageResponse),
        (status = 400, description = "Leave request not found or already processed", body = crate::api::MessageResponse, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionPayload>>,
) -> actix_web::Result<impl Responder> {
    Ok(decide_request(&state, &auth, RequestKind::Leave, path.into_inner(), payload, true).await?)
}

/* =========================
Reject leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body(content = Option<DecisionPayload>, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave rejected", body = crate::api::MessageResponse),
        (status = 400, description = "Leave request not found or already processed", body = crate::api::MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: Option<web::Json<DecisionPayload>>,
) -> actix_web::Result<impl Responder> {
    Ok(decide_request(&state, &auth, RequestKind::Leave, path.into_inner(), payload, false).await?)
}

/* =========================
List leave requests
========================= */
/// Employees see their own requests; HR/Admin may filter by employee.
#[utoipa::path(
    get,
    path = "/api/leave",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Leave requests, newest first", body = Vec<crate::model::leave_request::LeaveRequest>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<RequestListQuery>,
) -> actix_web::Result<impl Responder> {
    let rows = state
        .requests
        .list_leaves(&auth.actor(), &RequestQuery::from(&*query))
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}
