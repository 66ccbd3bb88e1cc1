use std::fmt;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    // Configuration errors
    ConfigError(String),
    ValidationError(String),

    // Storage errors
    RedisError(String),

    // Errors reported by the remote API
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    ApiError(String),

    // Transport errors
    UpstreamError(String),

    // Internal errors
    InternalError(String),
}

impl AppError {
    /// Map a non-success HTTP status and server-provided message onto an error variant
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message),
            400 => Self::BadRequest(message),
            404 => Self::NotFound(message),
            _ => Self::ApiError(message),
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "config_error",
            Self::ValidationError(_) => "validation_error",
            Self::RedisError(_) => "redis_error",
            Self::Unauthorized(_) => "unauthorized",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::ApiError(_) => "api_error",
            Self::UpstreamError(_) => "upstream_error",
            Self::InternalError(_) => "internal_error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::RedisError(msg) => write!(f, "Redis error: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::ApiError(msg) => write!(f, "API error: {}", msg),
            Self::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversion implementations for common error types
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        Self::RedisError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamError(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(redis_err) = err.downcast_ref::<redis::RedisError>() {
            return Self::RedisError(redis_err.to_string());
        }
        Self::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InternalError(format!("JSON serialization error: {}", err))
    }
}

/// Result type alias for application errors
pub type Result<T> = std::result::Result<T, AppError>;
