use thiserror::Error;

/// Failure kinds surfaced by `/bfhl`.
///
/// Every variant is rendered as a `400` envelope; the `Display` text is the
/// `error` string the caller sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BfhlError {
    /// Zero or several recognized operation keys, or a body that is not a
    /// JSON object.
    #[error("{0}")]
    BadRequest(String),

    /// A recognized key whose value breaks its type, shape or range contract.
    #[error("{0}")]
    InvalidArgument(String),

    /// The text-generation call or the extraction of its answer failed.
    #[error("AI request failed")]
    AiRequestFailed,

    /// Nothing left after normalizing the AI answer. Mapped to
    /// [`BfhlError::AiRequestFailed`] before it reaches a response.
    #[error("AI response was empty")]
    EmptyResponse,
}

impl BfhlError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
