//! Flattening of `validator` errors into a single client-facing message

use validator::ValidationErrors;

/// Produce a deterministic one-line summary such as
/// `"Invalid fields: email, nome"` from derive-based validation errors.
pub fn summarize_validation_errors(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
    fields.sort_unstable();
    format!("Invalid fields: {}", fields.join(", "))
}
