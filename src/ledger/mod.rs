//! Transfer ledger module
//!
//! The core state machine. Initiates, receives, and cancels transfer
//! slips, and is the only component that mutates product stock. Every
//! mutating operation runs as one atomic transaction spanning the product
//! record, the slip record, and the audit trail append.

pub mod models;
pub mod service;
pub mod status;

// Re-export commonly used types
pub use models::{InitiateRequest, InitiateSpec, Product, SlipFilter, TransferSlip};
pub use service::TransferLedger;
pub use status::SlipStatus;
