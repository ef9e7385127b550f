pub mod auth;
pub mod catalog;
pub mod reconciliation;

pub use auth::AuthService;
pub use reconciliation::{ReconciliationError, ReconciliationService, ValidationError};
