use crate::app_state::AppState;
use crate::error::Result;
use crate::services::auth::{ChangePasswordRequest, LoginRequest};
use actix_web::{web, HttpResponse};
use error_types::ApiResponse;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let session = state.auth.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(session)))
}

/// PUT /api/auth/change-password
pub async fn change_password(
    state: web::Data<AppState>,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    state.auth.change_password(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Password changed successfully")))
}
