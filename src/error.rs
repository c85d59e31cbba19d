//! Workflow Error Types
//!
//! One taxonomy shared by every component. Error codes feed the unified
//! API response envelope.

use thiserror::Error;

use crate::core_types::{ProductId, SlipId};
use crate::ledger::status::SlipStatus;
use crate::slip_token::TokenError;

/// Transfer workflow error types
#[derive(Error, Debug, Clone)]
pub enum TransitError {
    // === Validation ===
    #[error("Validation failed: {0}")]
    Validation(String),

    // === Authentication / Authorization ===
    #[error("PIN verification failed")]
    PinMismatch,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    // === Resources ===
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    // === Workflow state ===
    #[error("Slip {slip_id} already resolved as {status}")]
    InvalidState { slip_id: SlipId, status: SlipStatus },

    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transient storage-level collision. The whole operation may be retried.
    #[error("Concurrent update detected: {0}")]
    Concurrency(String),

    // === Token decoding ===
    #[error("Bad slip token: {0}")]
    BadToken(#[from] TokenError),

    // === Infrastructure ===
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TransitError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransitError::Validation(_) => "VALIDATION_FAILED",
            TransitError::PinMismatch => "PIN_MISMATCH",
            TransitError::NotAuthorized(_) => "NOT_AUTHORIZED",
            TransitError::NotFound { .. } => "NOT_FOUND",
            TransitError::InvalidState { .. } => "INVALID_STATE",
            TransitError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            TransitError::Conflict(_) => "CONFLICT",
            TransitError::Concurrency(_) => "CONCURRENCY_RETRY",
            TransitError::BadToken(_) => "BAD_TOKEN",
            TransitError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransitError::PinMismatch => 401,
            TransitError::NotAuthorized(_) => 403,
            TransitError::Validation(_) | TransitError::BadToken(_) => 400,
            TransitError::NotFound { .. } => 404,
            TransitError::InvalidState { .. } | TransitError::Conflict(_) => 409,
            TransitError::InsufficientStock { .. } => 422,
            TransitError::Concurrency(_) => 503,
            TransitError::Storage(_) => 500,
        }
    }

    /// True for transient errors where retrying the whole operation is safe
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransitError::Concurrency(_))
    }
}

impl From<sqlx::Error> for TransitError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if let Some(code) = db_err.code() {
                // 40001 = serialization_failure, 40P01 = deadlock_detected.
                // Both leave the transaction rolled back; caller may retry.
                if code == "40001" || code == "40P01" {
                    return TransitError::Concurrency(db_err.to_string());
                }
                // 23505 = unique_violation (duplicate slip / branch / staff key)
                if code == "23505" {
                    return TransitError::Conflict(db_err.to_string());
                }
            }
        }
        TransitError::Storage(e.to_string())
    }
}

/// Crate-wide result alias
pub type TransitResult<T> = Result<T, TransitError>;
