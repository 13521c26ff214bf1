//! Unified API envelope shared by the console and its REST backend.
//!
//! Every response carries a numeric business code: `0` for success, and
//! for failures a code whose thousands digit names the category.
//!
//! | Range | Category |
//! |-------|----------|
//! | `1xxx` | authentication |
//! | `2xxx` | permission |
//! | `3xxx` | resource |
//! | `4xxx` | validation and business rules |
//! | `5xxx` | system |

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Business status code carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BusinessCode {
    Success = 0,

    AuthRequired = 1001,
    AuthInvalidToken = 1002,
    AuthTokenExpired = 1003,
    AuthInvalidCredentials = 1004,
    AuthUserDisabled = 1005,

    PermissionDenied = 2001,
    PermissionInsufficient = 2002,

    ResourceNotFound = 3001,
    ResourceAlreadyExists = 3002,
    ResourceConflict = 3003,

    ValidationError = 4001,
    BusinessError = 4002,
    RateLimitExceeded = 4003,

    InternalError = 5001,
    ServiceUnavailable = 5002,
    DatabaseError = 5003,
    ExternalServiceError = 5004,
}

/// Coarse grouping of business codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Success,
    Authentication,
    Permission,
    Resource,
    Business,
    System,
}

impl BusinessCode {
    pub const ALL: [BusinessCode; 18] = [
        BusinessCode::Success,
        BusinessCode::AuthRequired,
        BusinessCode::AuthInvalidToken,
        BusinessCode::AuthTokenExpired,
        BusinessCode::AuthInvalidCredentials,
        BusinessCode::AuthUserDisabled,
        BusinessCode::PermissionDenied,
        BusinessCode::PermissionInsufficient,
        BusinessCode::ResourceNotFound,
        BusinessCode::ResourceAlreadyExists,
        BusinessCode::ResourceConflict,
        BusinessCode::ValidationError,
        BusinessCode::BusinessError,
        BusinessCode::RateLimitExceeded,
        BusinessCode::InternalError,
        BusinessCode::ServiceUnavailable,
        BusinessCode::DatabaseError,
        BusinessCode::ExternalServiceError,
    ];

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Look up a known code. Unknown numbers return `None`.
    pub fn from_u32(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_u32() == code)
    }

    pub fn category(self) -> ErrorCategory {
        match self.as_u32() / 1000 {
            0 => ErrorCategory::Success,
            1 => ErrorCategory::Authentication,
            2 => ErrorCategory::Permission,
            3 => ErrorCategory::Resource,
            4 => ErrorCategory::Business,
            _ => ErrorCategory::System,
        }
    }

    /// Message shown to the user when the backend supplies none.
    pub fn default_message(self) -> &'static str {
        match self {
            BusinessCode::Success => "Operation succeeded",
            BusinessCode::AuthRequired => "Please sign in first",
            BusinessCode::AuthInvalidToken => "Invalid authentication token",
            BusinessCode::AuthTokenExpired => "Authentication token has expired",
            BusinessCode::AuthInvalidCredentials => "Incorrect username or password",
            BusinessCode::AuthUserDisabled => "User account is disabled",
            BusinessCode::PermissionDenied => "Permission denied",
            BusinessCode::PermissionInsufficient => "Higher privileges required",
            BusinessCode::ResourceNotFound => "Resource not found",
            BusinessCode::ResourceAlreadyExists => "Resource already exists",
            BusinessCode::ResourceConflict => "Resource conflict",
            BusinessCode::ValidationError => "Data validation failed",
            BusinessCode::BusinessError => "Request could not be processed",
            BusinessCode::RateLimitExceeded => "Too many requests",
            BusinessCode::InternalError => "Internal server error",
            BusinessCode::ServiceUnavailable => "Service temporarily unavailable",
            BusinessCode::DatabaseError => "Database error",
            BusinessCode::ExternalServiceError => "External service error",
        }
    }

    /// HTTP status a response carrying this code is sent with.
    pub fn http_status(self) -> u16 {
        match self {
            BusinessCode::Success => 200,
            BusinessCode::AuthRequired
            | BusinessCode::AuthInvalidToken
            | BusinessCode::AuthTokenExpired
            | BusinessCode::AuthInvalidCredentials
            | BusinessCode::AuthUserDisabled => 401,
            BusinessCode::PermissionDenied | BusinessCode::PermissionInsufficient => 403,
            BusinessCode::ResourceNotFound => 404,
            BusinessCode::ResourceConflict => 409,
            BusinessCode::ResourceAlreadyExists | BusinessCode::BusinessError => 400,
            BusinessCode::ValidationError => 422,
            BusinessCode::RateLimitExceeded => 429,
            BusinessCode::ServiceUnavailable => 503,
            BusinessCode::InternalError
            | BusinessCode::DatabaseError
            | BusinessCode::ExternalServiceError => 500,
        }
    }

    /// Business code implied by a bare HTTP status.
    ///
    /// Statuses without a dedicated mapping fall back to `InternalError`.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 422 => BusinessCode::ValidationError,
            401 => BusinessCode::AuthRequired,
            403 => BusinessCode::PermissionDenied,
            404 => BusinessCode::ResourceNotFound,
            409 => BusinessCode::ResourceConflict,
            429 => BusinessCode::RateLimitExceeded,
            502 => BusinessCode::ExternalServiceError,
            503 => BusinessCode::ServiceUnavailable,
            _ => BusinessCode::InternalError,
        }
    }
}

impl fmt::Display for BusinessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl Serialize for BusinessCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

impl<'de> Deserialize<'de> for BusinessCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u32::deserialize(deserializer)?;
        BusinessCode::from_u32(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown business code {code}")))
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: None,
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Successful response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: BusinessCode,
    pub message: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: BusinessCode::Success,
            message: BusinessCode::Success.default_message().to_string(),
            data,
            timestamp: Utc::now(),
            request_id: None,
        }
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub code: BusinessCode,
    pub message: String,
    /// Diagnostic detail, only sent when the server exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Pagination query parameters (pages start at 1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
}

/// Pagination metadata returned with a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Compute metadata for `page` (1-based) of `total` records.
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(u64::from(page_size))
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// One page of a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedData<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Envelope of a paginated list endpoint.
pub type PaginatedResponse<T> = ApiResponse<PaginatedData<T>>;
