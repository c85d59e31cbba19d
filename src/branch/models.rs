//! Data models for branch reference data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core_types::BranchId;

/// A physical location that holds stock
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Branch {
    #[schema(value_type = String, example = "01JGN1Z5T9Q4R8W2X6Y0B3C7D9")]
    pub id: BranchId,
    #[schema(example = "Harbor East")]
    pub name: String,
    #[schema(example = "12 Quay Street")]
    pub address: String,
    /// Inactive branches stay queryable but reject new transfers
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Branch {
    /// Create a new active branch. Callers validate the name first.
    pub fn new(name: String, address: String) -> Self {
        let now = Utc::now();
        Self {
            id: BranchId::new(),
            name,
            address,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
