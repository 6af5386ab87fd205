//! Errors raised while constructing protocol values.

use thiserror::Error;

/// Errors for values that are rejected before any request is built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("sl parameter value must be between 0 and 100 or string \"fast\" or \"secure\", got {0:?}")]
    InvalidSyncLevel(String),

    #[error("invalid {field} parameter value: {value:?}")]
    InvalidParameter { field: &'static str, value: String },
}
