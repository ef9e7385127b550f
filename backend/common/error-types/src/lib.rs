//! Shared response envelopes for the IT-services backend
//!
//! Every HTTP response body produced by the backend follows one of two shapes:
//!
//! - `{"status": "success", "data": ...}` or `{"status": "success", "message": "..."}`
//! - `{"status": "error", "message": "..."}`
//!
//! Error bodies never carry internal detail (SQL text, constraint names); services log
//! that detail and hand clients a short human-readable message instead.

pub mod http;
pub mod validation;

pub use http::{ApiResponse, ErrorResponse, ResponseStatus};
pub use validation::summarize_validation_errors;
