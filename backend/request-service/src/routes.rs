//! Route configuration
//!
//! Everything is mounted under `/api`. `/requests` sits behind [`JwtAuthMiddleware`], so an
//! unauthenticated call is answered with 401 before any handler or store runs.

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::handlers;
use actix_middleware::JwtAuthMiddleware;
use actix_web::{error::InternalError, web, HttpResponse};
use error_types::ErrorResponse;

const JSON_BODY_LIMIT: usize = 256 * 1024;

/// Register app data and all routes for the given state
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let codec = state.codec.clone();

        cfg.app_data(web::Data::new(state))
            .app_data(web::Data::from(codec.clone()))
            .app_data(json_config())
            .service(
                web::scope("/api")
                    .route("/test", web::get().to(handlers::health::alive))
                    .route("/health", web::get().to(handlers::health::health_check))
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(handlers::auth::login))
                            .route(
                                "/change-password",
                                web::put().to(handlers::auth::change_password),
                            ),
                    )
                    .route(
                        "/clients/register",
                        web::post().to(handlers::clients::register),
                    )
                    .service(
                        web::resource("/services")
                            .route(web::get().to(handlers::services::list_services))
                            .route(web::post().to(handlers::services::create_service)),
                    )
                    .service(
                        web::resource("/requests")
                            .wrap(JwtAuthMiddleware::new(codec))
                            .route(web::get().to(handlers::requests::list_requests))
                            .route(web::put().to(handlers::requests::replace_requests)),
                    ),
            )
            .default_service(web::to(not_found));
    }
}

/// Malformed or non-JSON bodies become a 400 envelope instead of actix's plain-text error
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, req| {
            tracing::debug!(path = %req.path(), error = %err, "Rejected request body");
            let response =
                HttpResponse::BadRequest().json(ErrorResponse::new("Invalid request body."));
            InternalError::from_response(err, response).into()
        })
}

async fn not_found() -> Result<HttpResponse> {
    Err(AppError::NotFound("Route not found".to_string()))
}
