//! Centralized Error Handling Module
//!
//! Every failure carries a unique string code so that log lines from a
//! deployed console can be grepped by category.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - HTTP_xxx: transport-level errors
//! - API_xxx: responses the POS service rejected
//! - AUTH_xxx: token and access-module errors
//! - MENU_xxx: catalog validation errors
//! - EXPORT_xxx: CSV export errors
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type. All errors flow through this type.
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Transport Errors
    // ============================================
    /// Could not reach the POS API host
    HttpConnectionFailed,
    /// Request timed out
    HttpTimeout,
    /// Rate limited (HTTP 429)
    HttpRateLimited,
    /// Response body was not the JSON we expected
    HttpInvalidResponse,

    // ============================================
    // API Errors
    // ============================================
    /// Service rejected the request format (HTTP 400/422)
    ApiBadRequest,
    /// Bearer token rejected (HTTP 401)
    ApiUnauthorized,
    /// Token lacks the required access module (HTTP 403)
    ApiForbidden,
    /// Resource not found (HTTP 404)
    ApiNotFound,
    /// Service-side failure (HTTP 5xx)
    ApiInternalError,

    // ============================================
    // Auth/Access Errors
    // ============================================
    /// Token verification failed
    AuthInvalidToken,
    /// Local gate: the access-module set does not permit the action
    AuthMissingModule,

    // ============================================
    // Catalog Validation Errors
    // ============================================
    /// Required field missing from a create payload
    MenuMissingField,
    /// Marked product violates the piece/1/1 rule
    MenuMarkedRule,
    /// Quantity bounds are inconsistent
    MenuQtyBounds,
    /// Unit price not positive
    MenuInvalidPrice,

    // ============================================
    // Export Errors
    // ============================================
    /// Could not write the CSV payload to disk
    ExportWriteFailed,
    /// Export window is empty or inverted
    ExportBadWindow,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Transport
            Self::HttpConnectionFailed => "HTTP_CONNECTION_FAILED",
            Self::HttpTimeout => "HTTP_TIMEOUT",
            Self::HttpRateLimited => "HTTP_RATE_LIMITED",
            Self::HttpInvalidResponse => "HTTP_INVALID_RESPONSE",

            // API
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiForbidden => "API_FORBIDDEN",
            Self::ApiNotFound => "API_NOT_FOUND",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            // Auth
            Self::AuthInvalidToken => "AUTH_INVALID_TOKEN",
            Self::AuthMissingModule => "AUTH_MISSING_MODULE",

            // Catalog validation
            Self::MenuMissingField => "MENU_MISSING_FIELD",
            Self::MenuMarkedRule => "MENU_MARKED_RULE",
            Self::MenuQtyBounds => "MENU_QTY_BOUNDS",
            Self::MenuInvalidPrice => "MENU_INVALID_PRICE",

            // Export
            Self::ExportWriteFailed => "EXPORT_WRITE_FAILED",
            Self::ExportBadWindow => "EXPORT_BAD_WINDOW",

            // Configuration
            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Map an HTTP status from the POS service to an error code
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::ApiBadRequest,
            401 => Self::ApiUnauthorized,
            403 => Self::ApiForbidden,
            404 => Self::ApiNotFound,
            429 => Self::HttpRateLimited,
            500..=599 => Self::ApiInternalError,
            _ => Self::Unknown,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::HttpTimeout
                | Self::HttpRateLimited
                | Self::HttpConnectionFailed
                | Self::ApiInternalError
        )
    }

    /// Whether the error means the bearer token is no longer usable
    /// and the caller should drop back to the login prompt.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::ApiUnauthorized | Self::AuthInvalidToken)
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Could not reach the POS API host
    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::HttpConnectionFailed, msg)
    }

    /// Request timed out
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::HttpTimeout, msg)
    }

    /// Bearer token rejected
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiUnauthorized, msg)
    }

    /// Token verification failed
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalidToken, msg)
    }

    /// Local access gate refused the action
    pub fn missing_module(module: &str) -> Self {
        Self::new(
            ErrorCode::AuthMissingModule,
            format!("Access module required: {}", module),
        )
    }

    /// Resource not found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiNotFound, msg)
    }

    /// Required field missing from a create payload
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MenuMissingField,
            format!("Missing required field: {}", field),
        )
    }

    /// Marked product rule violation
    pub fn marked_rule(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MenuMarkedRule, msg)
    }

    /// Quantity bounds violation
    pub fn qty_bounds(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MenuQtyBounds, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// Export window empty or inverted
    pub fn bad_window(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExportBadWindow, msg)
    }

    /// Service-side failure
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::ExportWriteFailed, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::HttpTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::HttpConnectionFailed, "Connection failed")
        } else if let Some(status) = err.status() {
            Self::new(ErrorCode::from_status(status.as_u16()), err.to_string())
        } else {
            Self::new(ErrorCode::Unknown, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::HttpInvalidResponse, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::timeout("Connection timed out");
        assert_eq!(err.code, ErrorCode::HttpTimeout);
        assert_eq!(err.code_str(), "HTTP_TIMEOUT");
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::HttpTimeout.is_retryable());
        assert!(ErrorCode::HttpRateLimited.is_retryable());
        assert!(!ErrorCode::MenuMarkedRule.is_retryable());
        assert!(!ErrorCode::ApiUnauthorized.is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::from_status(401), ErrorCode::ApiUnauthorized);
        assert_eq!(ErrorCode::from_status(404), ErrorCode::ApiNotFound);
        assert_eq!(ErrorCode::from_status(422), ErrorCode::ApiBadRequest);
        assert_eq!(ErrorCode::from_status(503), ErrorCode::ApiInternalError);
    }

    #[test]
    fn test_auth_failure() {
        assert!(ErrorCode::ApiUnauthorized.is_auth_failure());
        assert!(ErrorCode::AuthInvalidToken.is_auth_failure());
        assert!(!ErrorCode::ApiForbidden.is_auth_failure());
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::missing_field("name");
        let text = err.to_string();
        assert!(text.contains("MENU_MISSING_FIELD"));
        assert!(text.contains("name"));
    }

    #[test]
    fn test_missing_module_names_the_module() {
        let err = AppError::missing_module(crate::models::AccessModule::MenuWrite.as_str());
        assert_eq!(
            err.to_string(),
            "[AUTH_MISSING_MODULE] Access module required: MENU_WRITE"
        );
    }
}
