use crate::app_state::AppState;
use crate::error::Result;
use crate::services::ReconciliationService;
use actix_middleware::ClientIdentity;
use actix_web::{web, HttpResponse};
use error_types::ApiResponse;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ReplaceRequestsBody {
    /// Kept as raw JSON so a non-array is reported as a shape error rather than a parse error
    #[serde(default)]
    pub requests: Value,
}

/// GET /api/requests
pub async fn list_requests(
    state: web::Data<AppState>,
    identity: ClientIdentity,
) -> Result<HttpResponse> {
    let requests = state.requests.list(&identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}

/// PUT /api/requests
///
/// Replaces the caller's whole request list. The owner is always the authenticated client.
pub async fn replace_requests(
    state: web::Data<AppState>,
    identity: ClientIdentity,
    body: web::Json<ReplaceRequestsBody>,
) -> Result<HttpResponse> {
    let items = ReconciliationService::parse_items(&body.requests).map_err(|e| {
        tracing::debug!(client_id = identity.id, error = %e, "Rejected request list");
        e
    })?;

    state.requests.reconcile(&identity, items).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Requests updated successfully.")))
}
