use thiserror::Error;

/// A form-layer rule violation.
///
/// `field` names the input the message belongs to (display-shape name, so
/// a front end can attach it to the right widget). `message` is the
/// user-facing text and is shown as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}
