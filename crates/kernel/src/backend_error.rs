//! Translation of REST backend error responses into console errors.
//!
//! The backend answers failures with the unified envelope
//! `{code, message, detail?, errors?}`, older endpoints with a bare
//! `{detail}`, and proxies or crashes with arbitrary bodies. Parsing here is
//! deliberately tolerant: every body yields a [`BackendError`], and missing
//! fields fall back to what the HTTP status implies.

use autotemu_sdk::api::{BusinessCode, ErrorCategory, FieldError};
use serde_json::Value;
use tracing::debug;

use crate::error::AppError;

/// A backend error response reduced to the fields the console uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendError {
    /// Numeric business code as sent (may be unknown to us).
    pub code: Option<u32>,
    pub message: Option<String>,
    pub detail: Option<String>,
    pub errors: Vec<FieldError>,
}

impl BackendError {
    /// Extract the known fields from a decoded body.
    ///
    /// Non-object values, and fields of the wrong type, are ignored.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let code = object
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u32::try_from(c).ok());
        let message = non_empty_str(object.get("message"));
        let detail = non_empty_str(object.get("detail"));
        let errors = object
            .get("errors")
            .and_then(|e| serde_json::from_value::<Vec<FieldError>>(e.clone()).ok())
            .unwrap_or_default();

        Self {
            code,
            message,
            detail,
            errors,
        }
    }

    /// Parse a raw HTTP error response.
    ///
    /// When the body carries no business code, one is derived from `status`.
    pub fn from_http(status: u16, body: &[u8]) -> Self {
        let mut error = match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_json(&value),
            Err(e) => {
                debug!(status, error = %e, "backend error body is not JSON");
                Self::default()
            }
        };

        if error.code.is_none() {
            error.code = Some(BusinessCode::from_http_status(status).as_u32());
        }
        error
    }

    /// The business code, if it is one we know.
    pub fn business_code(&self) -> Option<BusinessCode> {
        self.code.and_then(BusinessCode::from_u32)
    }

    /// User-facing message.
    ///
    /// Preference: `message`, then `detail`, then the default message of a
    /// known code, then `default`.
    pub fn message_or(&self, default: &str) -> String {
        self.message
            .as_deref()
            .or(self.detail.as_deref())
            .or_else(|| self.business_code().map(BusinessCode::default_message))
            .unwrap_or(default)
            .to_string()
    }

    /// Field-level validation errors (empty when none were sent).
    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }

    fn category(&self) -> Option<ErrorCategory> {
        self.business_code().map(BusinessCode::category)
    }

    /// Any `1xxx` code: the user must sign in again.
    pub fn is_authentication(&self) -> bool {
        self.category() == Some(ErrorCategory::Authentication)
    }

    /// Any `2xxx` code.
    pub fn is_permission(&self) -> bool {
        self.category() == Some(ErrorCategory::Permission)
    }

    pub fn is_validation(&self) -> bool {
        self.business_code() == Some(BusinessCode::ValidationError)
    }

    pub fn is_not_found(&self) -> bool {
        self.business_code() == Some(BusinessCode::ResourceNotFound)
    }

    /// Convert into the console's own error taxonomy.
    ///
    /// Unknown codes are treated as internal errors.
    pub fn into_app_error(self) -> AppError {
        let code = self.business_code().unwrap_or(BusinessCode::InternalError);
        match AppError::from_code(code, self.message, self.detail) {
            AppError::Validation { message, .. } => AppError::Validation {
                message,
                errors: self.errors,
            },
            other => other,
        }
    }
}

impl From<BackendError> for AppError {
    fn from(error: BackendError) -> Self {
        error.into_app_error()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
