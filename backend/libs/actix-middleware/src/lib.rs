//! # Actix Middleware Library
//!
//! Middleware components shared by the backend's Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer-token identity gate and the `ClientIdentity` extractor
//! - `logging`: request/response logging via `tracing`

pub mod jwt_auth;
pub mod logging;

pub use jwt_auth::{authenticate, AuthError, ClientIdentity, JwtAuthMiddleware};
pub use logging::Logging;
