use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Main error type for vclock-rpc nodes
#[derive(Debug)]
pub enum VclockError {
    /// Configuration or CLI argument errors
    Config(String),

    /// Vector clock validation errors
    Clock(ClockError),

    /// Arithmetic operation errors (overflow and the like)
    Operation(String),

    /// API/HTTP request errors
    Api(String),

    /// The remote node answered with an error status
    Remote { status: u16, message: String },

    /// The call did not complete within the client timeout
    Timeout(String),

    /// Connection and other transport layer errors
    Transport(String),

    /// JSON serialization/deserialization errors
    Serialization(serde_json::Error),

    /// System I/O errors
    Io(std::io::Error),

    /// Internal lock poisoning or concurrency errors
    Concurrency(String),
}

/// Vector clock specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Snapshot entry with a non-integer or negative counter, or an unusable key
    MalformedSnapshot(String),

    /// A clock was constructed without a node identity
    MissingNodeId,

    /// A node's counter has reached the top of its range
    CounterOverflow(String),
}

impl fmt::Display for VclockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VclockError::Config(msg) => write!(f, "Configuration error: {}", msg),
            VclockError::Clock(err) => write!(f, "Clock error: {}", err),
            VclockError::Operation(msg) => write!(f, "Operation error: {}", msg),
            VclockError::Api(msg) => write!(f, "API error: {}", msg),
            VclockError::Remote { status, message } => {
                write!(f, "Remote error ({}): {}", status, message)
            }
            VclockError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            VclockError::Transport(msg) => write!(f, "Transport error: {}", msg),
            VclockError::Serialization(err) => write!(f, "Serialization error: {}", err),
            VclockError::Io(err) => write!(f, "I/O error: {}", err),
            VclockError::Concurrency(msg) => write!(f, "Concurrency error: {}", msg),
        }
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::MalformedSnapshot(msg) => write!(f, "Malformed snapshot: {}", msg),
            ClockError::MissingNodeId => write!(f, "Node ID is required"),
            ClockError::CounterOverflow(msg) => write!(f, "Counter overflow: {}", msg),
        }
    }
}

impl std::error::Error for VclockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VclockError::Clock(err) => Some(err),
            VclockError::Io(err) => Some(err),
            VclockError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for ClockError {}

// Convenient type alias for Results using our error type
pub type Result<T> = std::result::Result<T, VclockError>;

impl IntoResponse for VclockError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let error_response = json!({
            "error": {
                "code": status_code.as_u16(),
                "message": self.to_string(),
                "type": self.error_type(),
            }
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl VclockError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            VclockError::Config(_) => StatusCode::BAD_REQUEST,
            VclockError::Clock(_) => StatusCode::BAD_REQUEST,
            VclockError::Operation(_) => StatusCode::BAD_REQUEST,
            VclockError::Api(_) => StatusCode::BAD_REQUEST,
            VclockError::Remote { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            VclockError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            VclockError::Transport(_) => StatusCode::BAD_GATEWAY,
            VclockError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VclockError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VclockError::Concurrency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            VclockError::Config(_) => "configuration_error",
            VclockError::Clock(_) => "clock_error",
            VclockError::Operation(_) => "operation_error",
            VclockError::Api(_) => "api_error",
            VclockError::Remote { .. } => "remote_error",
            VclockError::Timeout(_) => "timeout",
            VclockError::Transport(_) => "transport_error",
            VclockError::Serialization(_) => "serialization_error",
            VclockError::Io(_) => "io_error",
            VclockError::Concurrency(_) => "concurrency_error",
        }
    }

    /// True for failures where the call never reached a completed exchange
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, VclockError::Timeout(_) | VclockError::Transport(_))
    }
}

// Conversions from common error types
impl From<std::io::Error> for VclockError {
    fn from(err: std::io::Error) -> Self {
        VclockError::Io(err)
    }
}

impl From<serde_json::Error> for VclockError {
    fn from(err: serde_json::Error) -> Self {
        VclockError::Serialization(err)
    }
}

impl From<ClockError> for VclockError {
    fn from(err: ClockError) -> Self {
        VclockError::Clock(err)
    }
}

impl From<reqwest::Error> for VclockError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VclockError::Timeout(err.to_string())
        } else if err.is_decode() {
            VclockError::Api(format!("Undecodable response: {}", err))
        } else {
            VclockError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for VclockError {
    fn from(err: url::ParseError) -> Self {
        VclockError::Config(format!("Invalid URL: {}", err))
    }
}

// Helper macros for common error construction patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::VclockError::Config($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::VclockError::Config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! operation_error {
    ($msg:expr) => {
        $crate::error::VclockError::Operation($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::VclockError::Operation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! concurrency_error {
    ($msg:expr) => {
        $crate::error::VclockError::Concurrency($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::VclockError::Concurrency(format!($fmt, $($arg)*))
    };
}
