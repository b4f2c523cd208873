pub mod attendance;
pub mod leave_request;
pub mod report;
pub mod requests;
pub mod schedule;
pub mod schedule_change;
pub mod shift;
pub mod timesheet_adjustment;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::approval::{ApprovalStatus, RequestKind};
use crate::services::request_service::RequestQuery;
use crate::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Leave request approved")]
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(MessageResponse {
            message: message.into(),
        })
    }
}

/// Optional body for approve/reject endpoints.
#[derive(Deserialize, ToSchema, Default)]
pub struct DecisionPayload {
    #[schema(example = "Confirmed with team lead")]
    pub admin_note: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RequestListQuery {
    /// Filter by employee ID (administrators only)
    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
    /// Filter by status
    pub status: Option<ApprovalStatus>,
    /// Maximum rows (default 200, max 500)
    #[schema(example = 50)]
    pub limit: Option<u32>,
}

impl From<&RequestListQuery> for RequestQuery {
    fn from(q: &RequestListQuery) -> Self {
        RequestQuery {
            employee_id: q.employee_id,
            status: q.status,
            limit: q.limit,
        }
    }
}

/// Shared approve/reject flow for the three request kinds.
pub(crate) async fn decide_request(
    state: &AppState,
    auth: &AuthUser,
    kind: RequestKind,
    id: u64,
    payload: Option<web::Json<DecisionPayload>>,
    approve: bool,
) -> Result<HttpResponse, AppError> {
    let now = state.clock.now();
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();
    let note = payload.admin_note.as_deref();
    let actor = auth.actor();

    if approve {
        state.requests.approve(&actor, now, kind, id, note).await?;
    } else {
        state.requests.reject(&actor, now, kind, id, note).await?;
    }

    let verb = if approve { "approved" } else { "rejected" };
    Ok(MessageResponse::ok(format!("Request {id} {verb}")))
}
