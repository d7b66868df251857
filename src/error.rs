use thiserror::Error;

/// Every failure surfaced by the SDK. Callers are expected to branch on the
/// variant rather than on the message text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallWhizError {
    #[error("{message}")]
    Authentication { message: String },

    /// Raised for local pre-flight checks as well as server-reported 400/422.
    #[error("{message}")]
    Validation { message: String, status: u16 },

    #[error("{message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Catch-all for 404, unclassified statuses, failed envelopes and
    /// network failures.
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        response: Option<serde_json::Value>,
    },
}

impl CallWhizError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            status: 400,
        }
    }

    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    pub fn api(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Api {
            message: message.into(),
            status,
            response: None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message }
            | Self::Validation { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Api { message, .. } => message,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Validation { status, .. } => Some(*status),
            Self::RateLimit { .. } => Some(429),
            Self::Api { status, .. } => *status,
        }
    }
}

pub type Result<T> = std::result::Result<T, CallWhizError>;
