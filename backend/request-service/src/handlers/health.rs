use crate::app_state::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

/// GET /api/test
pub async fn alive() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Backend API is alive!" }))
}

/// GET /api/health
///
/// 200 while the database answers, 503 otherwise.
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    match state.health.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            database: "healthy",
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "degraded",
                version: env!("CARGO_PKG_VERSION"),
                database: "unhealthy",
            })
        }
    }
}
