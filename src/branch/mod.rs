//! Branch registry module
//!
//! Reference data for the physical locations that hold stock. Branches are
//! never hard-deleted; deactivation hides them from listings and blocks new
//! transfers while preserving history.

pub mod models;
pub mod registry;

// Re-export commonly used types
pub use models::Branch;
pub use registry::BranchRegistry;
