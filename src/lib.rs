//! StockTransit - Multi-Branch Stock Transfer Workflow
//!
//! Durable transfer slips between branches, PIN-gated hand-offs and an
//! append-only location audit trail. Stock is never created, destroyed
//! or double-credited: every mutation happens inside one atomic storage
//! transaction together with its slip update and audit entry.
//!
//! # Modules
//!
//! - [`core_types`] - Id newtypes, staff roles, movement reasons
//! - [`error`] - Unified workflow error type
//! - [`branch`] - Branch registry (reference data)
//! - [`staff`] - Staff directory and PIN verification
//! - [`ledger`] - Products, transfer slips and the workflow service
//! - [`audit`] - Location audit trail (read side)
//! - [`slip_token`] - Printable slip token codec
//! - [`store`] - Storage backends (in-memory, PostgreSQL)
//! - [`gateway`] - Axum HTTP API with JWT sessions and Swagger UI
//! - [`config`] / [`logging`] - Runtime configuration and tracing setup

// Core types - must be first!
pub mod core_types;

pub mod error;

// Domain services
pub mod audit;
pub mod branch;
pub mod ledger;
pub mod slip_token;
pub mod staff;

// Storage backends
pub mod store;

// HTTP API
pub mod gateway;

// Runtime plumbing
pub mod config;
pub mod logging;

// Convenient re-exports at crate root
pub use core_types::{BranchId, MoveReason, ProductId, SlipId, StaffId, StaffRole};
pub use error::{TransitError, TransitResult};
pub use ledger::{Product, SlipStatus, TransferLedger, TransferSlip};
