use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("no status= field in response")]
    MissingStatus,

    #[error("more than one status= returned ({count}). Possible attack!")]
    AmbiguousStatus { count: usize },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProtocolError {
    /// Whether the response must fail the whole verification rather than
    /// being discarded in favour of other endpoints.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AmbiguousStatus { .. })
    }
}
