//! Application error types.
//!
//! [`AppError`] is the console's outward error taxonomy. Each variant maps
//! to a business code and an HTTP status, and renders as the unified
//! [`ApiErrorResponse`] envelope.

use autotemu_sdk::api::{ApiErrorResponse, BusinessCode, ErrorCategory, FieldError};
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller is not (or no longer) authenticated.
    #[error("{}", .message.as_deref().unwrap_or(.code.default_message()))]
    Authentication {
        code: BusinessCode,
        message: Option<String>,
        detail: Option<String>,
    },

    /// Caller is authenticated but not allowed.
    #[error("{}", .message.as_deref().unwrap_or(.code.default_message()))]
    Permission {
        code: BusinessCode,
        message: Option<String>,
        detail: Option<String>,
    },

    /// Missing, duplicate or conflicting resource.
    #[error("{}", .message.as_deref().unwrap_or(.code.default_message()))]
    Resource {
        code: BusinessCode,
        message: Option<String>,
        detail: Option<String>,
    },

    /// Input failed validation; `errors` names the offending fields.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// A business rule rejected the request.
    #[error("{message}")]
    Business {
        message: String,
        detail: Option<String>,
    },

    /// Too many requests; retry after `retry_after` seconds.
    #[error("{}", .message.as_deref().unwrap_or(BusinessCode::RateLimitExceeded.default_message()))]
    RateLimit {
        retry_after: u64,
        message: Option<String>,
    },

    /// Failure on our side or in a dependency.
    #[error("{}", .message.as_deref().unwrap_or(.code.default_message()))]
    System {
        code: BusinessCode,
        message: Option<String>,
        detail: Option<String>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// `RESOURCE_NOT_FOUND` naming what was missing.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::Resource {
            code: BusinessCode::ResourceNotFound,
            message: None,
            detail: Some(detail.into()),
        }
    }

    /// `VALIDATION_ERROR` with field errors.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation {
            message: BusinessCode::ValidationError.default_message().to_string(),
            errors,
        }
    }

    /// Build the variant matching `code`'s category.
    ///
    /// `Success` is not an error and becomes `INTERNAL_ERROR`.
    pub fn from_code(code: BusinessCode, message: Option<String>, detail: Option<String>) -> Self {
        match code.category() {
            ErrorCategory::Authentication => Self::Authentication {
                code,
                message,
                detail,
            },
            ErrorCategory::Permission => Self::Permission {
                code,
                message,
                detail,
            },
            ErrorCategory::Resource => Self::Resource {
                code,
                message,
                detail,
            },
            ErrorCategory::Business => match code {
                BusinessCode::ValidationError => Self::Validation {
                    message: message.unwrap_or_else(|| code.default_message().to_string()),
                    errors: Vec::new(),
                },
                BusinessCode::RateLimitExceeded => Self::RateLimit {
                    retry_after: DEFAULT_RETRY_AFTER,
                    message,
                },
                _ => Self::Business {
                    message: message.unwrap_or_else(|| code.default_message().to_string()),
                    detail,
                },
            },
            ErrorCategory::System => Self::System {
                code,
                message,
                detail,
            },
            ErrorCategory::Success => Self::System {
                code: BusinessCode::InternalError,
                message,
                detail,
            },
        }
    }

    pub fn code(&self) -> BusinessCode {
        match self {
            AppError::Authentication { code, .. }
            | AppError::Permission { code, .. }
            | AppError::Resource { code, .. }
            | AppError::System { code, .. } => *code,
            AppError::Validation { .. } => BusinessCode::ValidationError,
            AppError::Business { .. } => BusinessCode::BusinessError,
            AppError::RateLimit { .. } => BusinessCode::RateLimitExceeded,
            AppError::Internal(_) => BusinessCode::InternalError,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code().http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn detail(&self) -> Option<&str> {
        match self {
            AppError::Authentication { detail, .. }
            | AppError::Permission { detail, .. }
            | AppError::Resource { detail, .. }
            | AppError::Business { detail, .. }
            | AppError::System { detail, .. } => detail.as_deref(),
            AppError::Validation { .. } | AppError::RateLimit { .. } | AppError::Internal(_) => {
                None
            }
        }
    }

    /// Render the error envelope.
    ///
    /// `expose_detail` controls whether diagnostic detail is included; it
    /// should only be set in development. Internal errors never echo their
    /// cause.
    pub fn to_body(&self, expose_detail: bool) -> ApiErrorResponse {
        let errors = match self {
            AppError::Validation { errors, .. } if !errors.is_empty() => Some(errors.clone()),
            _ => None,
        };

        ApiErrorResponse {
            code: self.code(),
            message: self.to_string(),
            detail: self.detail().filter(|_| expose_detail).map(str::to_string),
            errors,
            timestamp: Utc::now(),
            request_id: None,
        }
    }

    /// Attach the detail-exposure policy before turning into a response.
    pub fn exposing_detail(self, expose_detail: bool) -> ErrorResponse {
        ErrorResponse {
            error: self,
            expose_detail,
            request_id: None,
        }
    }
}

/// Seconds clients are told to wait when rate limited without a hint.
pub const DEFAULT_RETRY_AFTER: u64 = 60;

/// An [`AppError`] paired with the detail-exposure policy of the server
/// and the id of the request that failed.
#[derive(Debug)]
pub struct ErrorResponse {
    error: AppError,
    expose_detail: bool,
    request_id: Option<String>,
}

impl ErrorResponse {
    /// Tag the envelope with the request id.
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let ErrorResponse {
            error,
            expose_detail,
            request_id,
        } = self;

        match &error {
            AppError::Internal(e) => {
                tracing::error!(error = %e, request_id = ?request_id, "internal server error");
            }
            AppError::System { code, detail, .. } => {
                tracing::error!(
                    code = %code,
                    detail = ?detail,
                    request_id = ?request_id,
                    "system error"
                );
            }
            other => tracing::warn!(
                code = %other.code(),
                error = %other,
                request_id = ?request_id,
                "request failed"
            ),
        }

        let status = error.status();
        let mut body = error.to_body(expose_detail);
        body.request_id = request_id;
        let mut response = (status, Json(body)).into_response();

        if let AppError::RateLimit { retry_after, .. } = &error
            && let Ok(value) = HeaderValue::from_str(&retry_after.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }

        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.exposing_detail(false).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
