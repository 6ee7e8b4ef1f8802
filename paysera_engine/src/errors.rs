use std::fmt::Display;

use thiserror::Error;

/// Every way a Paysera request or notification can fail. None of these are retried by the engine; a failure is
/// terminal for the request being built or the notification being processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayseraError {
    #[error("Invalid request field '{field}': {reason}")]
    ValidationError { field: String, reason: ValidationFailure },
    #[error("{0} not found")]
    MissingField(String),
    #[error("Could not decode payload. {0}")]
    DecodeError(String),
    #[error("invalid {0}")]
    SignatureError(SignatureCheck),
    #[error("Could not parse payload. {0}")]
    ParseError(String),
    #[error("{0}")]
    ConfigurationError(String),
    #[error("{0}")]
    ProtocolError(String),
    #[error("Couldn't find order {0}")]
    OrderNotFound(String),
    #[error("Order backend error. {0}")]
    BackendError(String),
}

impl PayseraError {
    pub fn validation(field: &str, reason: ValidationFailure) -> Self {
        Self::ValidationError { field: field.to_string(), reason }
    }

    /// True for failures where the notification itself cannot be trusted.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::SignatureError(_) | Self::DecodeError(_) | Self::MissingField(_))
    }
}

/// Which of the two independent notification signatures failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// Shared-secret MD5 digest.
    Ss1,
    /// Provider RSA/SHA1 signature.
    Ss2,
}

impl Display for SignatureCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureCheck::Ss1 => write!(f, "ss1"),
            SignatureCheck::Ss2 => write!(f, "ss2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    Missing,
    TooLong { max: usize },
    PatternMismatch,
    Unknown,
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationFailure::Missing => write!(f, "can't be blank"),
            ValidationFailure::TooLong { max } => write!(f, "is too long (maximum is {max} characters)"),
            ValidationFailure::PatternMismatch => write!(f, "is invalid"),
            ValidationFailure::Unknown => write!(f, "is not a recognised field"),
        }
    }
}
