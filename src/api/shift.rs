use actix_web::{HttpResponse, Responder, web};

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::shift::ShiftResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/shifts",
    responses(
        (status = 200, description = "Shift catalog", body = Vec<ShiftResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Shift"
)]
pub async fn list_shifts(_auth: AuthUser, state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let shifts = state.shifts.list_shifts().await.map_err(AppError::from)?;
    let body: Vec<ShiftResponse> = shifts.into_iter().map(ShiftResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/shifts/{shift_id}",
    params(
        ("shift_id" = u64, Path, description = "Shift ID")
    ),
    responses(
        (status = 200, description = "Shift found", body = ShiftResponse),
        (status = 404, description = "Shift not found", body = crate::api::MessageResponse, example = json!({
            "message": "Shift not found"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Shift"
)]
pub async fn get_shift(
    _auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let shift_id = path.into_inner();
    let shift = state
        .shifts
        .find_shift(shift_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Shift not found"))?;

    Ok(HttpResponse::Ok().json(ShiftResponse::from(shift)))
}
