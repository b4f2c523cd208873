use actix_web::{HttpResponse, Responder, web};

use crate::auth::auth::AuthUser;
use crate::state::AppState;

/// Every PENDING request across the three kinds (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/requests/pending",
    responses(
        (status = 200, description = "Pending requests by kind", body = crate::services::request_service::PendingOverview),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn pending(auth: AuthUser, state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let overview = state.requests.pending_overview(&auth.actor()).await?;
    Ok(HttpResponse::Ok().json(overview))
}
