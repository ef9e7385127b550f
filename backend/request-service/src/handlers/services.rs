use crate::app_state::AppState;
use crate::error::Result;
use crate::services::catalog::{self, CreateServiceRequest};
use actix_middleware::ClientIdentity;
use actix_web::{web, HttpResponse};
use error_types::ApiResponse;

/// GET /api/services
pub async fn list_services(state: web::Data<AppState>) -> Result<HttpResponse> {
    let services = catalog::list_services(state.catalog.as_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(services)))
}

/// POST /api/services
///
/// Authenticated through the `ClientIdentity` extractor, which must stay ahead of the body.
pub async fn create_service(
    state: web::Data<AppState>,
    identity: ClientIdentity,
    req: web::Json<CreateServiceRequest>,
) -> Result<HttpResponse> {
    let service =
        catalog::create_service(state.catalog.as_ref(), req.into_inner(), identity.id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(service)))
}
