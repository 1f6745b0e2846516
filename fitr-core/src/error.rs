use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, caller-facing failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    FailedPrecondition,
    InvalidArgument,
    Unavailable,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FailedPrecondition => "failed-precondition",
            ErrorCode::InvalidArgument => "invalid-argument",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum FitrError {
    /// The deployment is missing something the caller cannot fix (API key).
    #[error("{0}")]
    Config(String),

    #[error("{message}")]
    InvalidArgument {
        message: String,
        details: Option<String>,
    },

    /// Talking to the weather provider failed at the transport or HTTP level.
    #[error("{message}: {details}")]
    Unavailable { message: String, details: String },

    #[error("{message}: {details}")]
    Internal { message: String, details: String },
}

impl FitrError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_argument_with<S: Into<String>, D: ToString>(message: S, details: D) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }

    pub fn unavailable<S: Into<String>, D: ToString>(message: S, details: D) -> Self {
        Self::Unavailable {
            message: message.into(),
            details: details.to_string(),
        }
    }

    pub fn internal<S: Into<String>, D: ToString>(message: S, details: D) -> Self {
        Self::Internal {
            message: message.into(),
            details: details.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FitrError::Config(_) => ErrorCode::FailedPrecondition,
            FitrError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            FitrError::Unavailable { .. } => ErrorCode::Unavailable,
            FitrError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Human-readable message without the diagnostic detail.
    pub fn message(&self) -> &str {
        match self {
            FitrError::Config(message)
            | FitrError::InvalidArgument { message, .. }
            | FitrError::Unavailable { message, .. }
            | FitrError::Internal { message, .. } => message,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            FitrError::Config(_) => None,
            FitrError::InvalidArgument { details, .. } => details.as_deref(),
            FitrError::Unavailable { details, .. } | FitrError::Internal { details, .. } => {
                Some(details)
            }
        }
    }
}

/// Wire shape of a failed handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<FitrError> for ErrorResponse {
    fn from(err: FitrError) -> Self {
        Self {
            code: err.code(),
            message: err.message().to_string(),
            details: err.details().map(str::to_string),
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorResponse {}
