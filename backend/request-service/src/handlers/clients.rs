use crate::app_state::AppState;
use crate::error::Result;
use crate::services::auth::RegisterRequest;
use actix_web::{web, HttpResponse};
use error_types::ApiResponse;

/// POST /api/clients/register
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let client = state.auth.register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(client)))
}
