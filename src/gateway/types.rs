//! API response envelope, error codes, and the gateway-side error type.
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `error_codes`: Standard error code constants
//! - `ApiError` / `ApiResult<T>`: handler-facing error plumbing

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::TransitError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_STOCK: i32 = 1002;
    pub const BAD_SLIP_TOKEN: i32 = 1003;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;
    pub const PIN_MISMATCH: i32 = 2003;
    pub const NOT_AUTHORIZED: i32 = 2004;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INVALID_STATE: i32 = 4003;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const CONCURRENCY_RETRY: i32 = 5002;
}

// ============================================================================
// Handler Error Plumbing
// ============================================================================

/// Result type returned by every gateway handler.
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 OK wrapped in the success envelope.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 Created wrapped in the success envelope.
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

/// Gateway-side error: HTTP status plus the envelope error code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED, msg)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error_codes::NOT_AUTHORIZED, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg)
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    /// Convenience for `return ApiError::...(msg).into_err();` in handlers.
    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(self.code, self.msg));
        (self.status, body).into_response()
    }
}

impl From<TransitError> for ApiError {
    fn from(err: TransitError) -> Self {
        let code = match &err {
            TransitError::Validation(_) => error_codes::INVALID_PARAMETER,
            TransitError::PinMismatch => error_codes::PIN_MISMATCH,
            TransitError::NotAuthorized(_) => error_codes::NOT_AUTHORIZED,
            TransitError::NotFound { .. } => error_codes::NOT_FOUND,
            TransitError::InvalidState { .. } => error_codes::INVALID_STATE,
            TransitError::InsufficientStock { .. } => error_codes::INSUFFICIENT_STOCK,
            TransitError::Conflict(_) => error_codes::CONFLICT,
            TransitError::Concurrency(_) => error_codes::CONCURRENCY_RETRY,
            TransitError::BadToken(_) => error_codes::BAD_SLIP_TOKEN,
            TransitError::Storage(_) => error_codes::INTERNAL_ERROR,
        };
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        // Storage failures carry backend detail that does not belong on the wire.
        let msg = match &err {
            TransitError::Storage(detail) => {
                tracing::error!(detail = %detail, "storage error reached the gateway");
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };
        Self { status, code, msg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{ProductId, SlipId};
    use crate::ledger::SlipStatus;

    #[test]
    fn success_envelope_serializes_data() {
        let resp = ApiResponse::success(vec![1, 2, 3]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["msg"], "ok");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn error_envelope_omits_data_field() {
        let resp = ApiResponse::<()>::error(error_codes::NOT_FOUND, "no such slip");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 4001);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn transit_errors_map_to_status_and_code() {
        let cases: Vec<(TransitError, StatusCode, i32)> = vec![
            (
                TransitError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
                error_codes::INVALID_PARAMETER,
            ),
            (
                TransitError::PinMismatch,
                StatusCode::UNAUTHORIZED,
                error_codes::PIN_MISMATCH,
            ),
            (
                TransitError::NotAuthorized("nope".into()),
                StatusCode::FORBIDDEN,
                error_codes::NOT_AUTHORIZED,
            ),
            (
                TransitError::NotFound {
                    kind: "slip",
                    id: "x".into(),
                },
                StatusCode::NOT_FOUND,
                error_codes::NOT_FOUND,
            ),
            (
                TransitError::InvalidState {
                    slip_id: SlipId::new(),
                    status: SlipStatus::Completed,
                },
                StatusCode::CONFLICT,
                error_codes::INVALID_STATE,
            ),
            (
                TransitError::InsufficientStock {
                    product_id: ProductId::new(),
                    requested: 5,
                    available: 2,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                error_codes::INSUFFICIENT_STOCK,
            ),
            (
                TransitError::Concurrency("retry".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::CONCURRENCY_RETRY,
            ),
        ];
        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn storage_detail_is_not_leaked() {
        let api: ApiError =
            TransitError::Storage("postgres: relation missing".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.msg.contains("postgres"));
    }
}
