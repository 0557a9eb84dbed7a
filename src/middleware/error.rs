use std::fmt;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

use super::ctx::Ctx;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CtxError {
    pub error: AppError,
    pub req_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    Generic { description: String },
    Validation { details: serde_json::Value },
    InvalidFile { description: String },
    AuthenticationFail,
    AuthFailNoJwtCookie,
    AuthFailJwtInvalid { source: String },
    Forbidden,
    AuthorizationFail { required: String },
    EntityFailIdNotFound { ident: String },
    Conflict { error: String, message: String },
    InvalidTransition { from: String, event: String },
    Serde { source: String },
    SurrealDb { source: String },
}

/// Error with the request id attached, ready to be rendered as a response.
pub type CtxResult<T> = core::result::Result<T, CtxError>;
/// Error produced before a request id is known (services, repositories).
pub type AppResult<T> = core::result::Result<T, AppError>;

impl std::error::Error for AppError {}

impl AppError {
    pub fn conflict(error: &str) -> Self {
        Self::Conflict {
            error: error.to_string(),
            message: error.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Generic { .. } | AppError::Validation { .. } | AppError::InvalidFile { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::AuthenticationFail
            | AppError::AuthFailNoJwtCookie
            | AppError::AuthFailJwtInvalid { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::AuthorizationFail { .. } => StatusCode::FORBIDDEN,
            AppError::EntityFailIdNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Serde { .. } | AppError::SurrealDb { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short code-like string sent as `error`.
    pub fn code(&self) -> String {
        match self {
            AppError::Validation { .. } => "Validation error".to_string(),
            AppError::Generic { .. } => "Bad request".to_string(),
            AppError::InvalidFile { .. } => "Invalid file".to_string(),
            AppError::AuthenticationFail
            | AppError::AuthFailNoJwtCookie
            | AppError::AuthFailJwtInvalid { .. } => "Unauthorized".to_string(),
            AppError::Forbidden | AppError::AuthorizationFail { .. } => "Forbidden".to_string(),
            AppError::EntityFailIdNotFound { .. } => "Not found".to_string(),
            AppError::Conflict { error, .. } => error.clone(),
            AppError::InvalidTransition { .. } => "Invalid status transition".to_string(),
            AppError::Serde { .. } | AppError::SurrealDb { .. } => INTERNAL.to_string(),
        }
    }
}

// for slightly less verbose error mappings
impl CtxError {
    pub fn from<T: Into<AppError>>(ctx: &Ctx) -> impl FnOnce(T) -> CtxError + '_ {
        |err| CtxError {
            req_id: ctx.req_id(),
            error: err.into(),
        }
    }
}

impl From<AppError> for CtxError {
    fn from(value: AppError) -> Self {
        CtxError {
            req_id: Uuid::new_v4(),
            error: value,
        }
    }
}

impl From<surrealdb::Error> for CtxError {
    fn from(value: surrealdb::Error) -> Self {
        AppError::from(value).into()
    }
}

impl From<ValidationErrors> for CtxError {
    fn from(value: ValidationErrors) -> Self {
        AppError::from(value).into()
    }
}

const INTERNAL: &str = "Internal error";

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic { description } => write!(f, "{description}"),
            Self::Validation { .. } => write!(f, "Request data is not valid"),
            Self::InvalidFile { description } => write!(f, "{description}"),
            Self::AuthenticationFail => write!(f, "Authentication failed"),
            Self::AuthFailNoJwtCookie => write!(f, "You are not logged in"),
            Self::AuthFailJwtInvalid { .. } => write!(f, "The provided JWT token is not valid"),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::AuthorizationFail { required } => write!(f, "Not authorized, requires {required}"),
            Self::EntityFailIdNotFound { ident } => write!(f, "Record id= {ident} not found"),
            Self::Conflict { message, .. } => write!(f, "{message}"),
            Self::InvalidTransition { from, event } => {
                write!(f, "Can not apply {event} to an application in status {from}")
            }
            Self::Serde { .. } => write!(f, "{INTERNAL}"),
            Self::SurrealDb { .. } => write!(f, "{INTERNAL}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponseBody {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub req_id: String,
}

impl ErrorResponseBody {
    pub fn new(error: &AppError, req_id: Option<String>) -> Self {
        let details = match error {
            AppError::Validation { details } => Some(details.clone()),
            _ => None,
        };
        ErrorResponseBody {
            success: false,
            error: error.code(),
            message: error.to_string(),
            details,
            req_id: req_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }
}

impl IntoResponse for CtxError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.error.status_code();
        if status_code.is_server_error() {
            tracing::error!(req_id = %self.req_id, error = ?self.error, "request failed");
        } else {
            tracing::warn!(req_id = %self.req_id, error = ?self.error, "request rejected");
        }
        let body = ErrorResponseBody::new(&self.error, Some(self.req_id.to_string()));
        let mut response = (status_code, Json(body)).into_response();
        // the real error for the response logger
        response.extensions_mut().insert(self.error);
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let err: CtxError = self.into();
        err.into_response()
    }
}

// External Errors
impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde {
            source: value.to_string(),
        }
    }
}

impl From<surrealdb::Error> for AppError {
    fn from(value: surrealdb::Error) -> Self {
        Self::SurrealDb {
            source: value.to_string(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation {
            details: serde_json::to_value(&value).unwrap_or(serde_json::Value::Null),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::AuthFailJwtInvalid {
            source: value.to_string(),
        }
    }
}

impl From<CtxError> for AppError {
    fn from(value: CtxError) -> Self {
        value.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_and_code() {
        let err = AppError::conflict("Application already exists");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "Application already exists");

        let err = AppError::InvalidTransition {
            from: "COMPLETED".to_string(),
            event: "ACCEPT".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "Invalid status transition");

        let err = AppError::SurrealDb {
            source: "connection reset".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("connection reset"));
    }

    #[test]
    fn only_validation_errors_carry_details() {
        let body = ErrorResponseBody::new(
            &AppError::Validation {
                details: serde_json::json!({"stars": []}),
            },
            None,
        );
        assert!(!body.success);
        assert_eq!(body.error, "Validation error");
        assert!(body.details.is_some());

        let body = ErrorResponseBody::new(&AppError::Forbidden, Some("req".to_string()));
        assert!(body.details.is_none());
        assert_eq!(body.req_id, "req");
    }

    #[test]
    fn app_error_responds_with_its_status() {
        let response = AppError::conflict("Task already assigned").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.extensions().get::<AppError>(),
            Some(&AppError::conflict("Task already assigned"))
        );

        let response = AppError::SurrealDb {
            source: "boom".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
