use thiserror::Error;

/// Failure classes of the order-email pipeline, mapped one-to-one to the
/// response status codes and `error` labels of the handler response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Missing/empty required payload field or missing sender configuration.
    #[error("{0}")]
    Validation(String),

    /// The remote provider rejected or failed the send; carries the
    /// provider's own message verbatim.
    #[error("{0}")]
    Provider(String),

    /// Anything else; message is diagnostic only.
    #[error("{0}")]
    Unexpected(String),
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Validation(_) => 400,
            HandlerError::Provider(_) | HandlerError::Unexpected(_) => 500,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HandlerError::Validation(_) => "Validation error",
            HandlerError::Provider(_) => "Email provider error",
            HandlerError::Unexpected(_) => "Internal server error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            HandlerError::Validation(m)
            | HandlerError::Provider(m)
            | HandlerError::Unexpected(m) => m,
        }
    }
}
