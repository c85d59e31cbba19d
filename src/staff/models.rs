//! Data models for staff profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core_types::{BranchId, StaffId, StaffRole};

/// A staff member profile.
///
/// `owner_identity` is the verified subject from the external identity
/// provider; exactly one profile may exist per identity. The PIN digest is
/// deliberately not part of this struct; it lives only in the directory
/// store and is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffProfile {
    #[schema(value_type = String, example = "01JGN2K8F4M7P1Q9R3S5T7V9X1")]
    pub id: StaffId,
    /// Subject id issued by the external identity provider
    #[schema(example = "idp|7f3c9a2e")]
    pub owner_identity: String,
    #[schema(example = "Dana Reyes")]
    pub name: String,
    pub role: StaffRole,
    /// Home branch this staff member works at
    #[schema(value_type = String)]
    pub branch_id: BranchId,
    /// Deactivated staff keep their history but fail authorization
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StaffProfile {
    /// Create a new active profile. Callers validate the fields first.
    pub fn new(owner_identity: String, name: String, role: StaffRole, branch_id: BranchId) -> Self {
        let now = Utc::now();
        Self {
            id: StaffId::new(),
            owner_identity,
            name,
            role,
            branch_id,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_defaults() {
        let profile = StaffProfile::new(
            "idp|abc".into(),
            "Dana Reyes".into(),
            StaffRole::Staff,
            BranchId::new(),
        );
        assert!(profile.active);
        assert_eq!(profile.role, StaffRole::Staff);
        assert_eq!(profile.owner_identity, "idp|abc");
    }

    #[test]
    fn test_profile_serialization_has_no_pin_fields() {
        let profile = StaffProfile::new(
            "idp|abc".into(),
            "Dana Reyes".into(),
            StaffRole::Manager,
            BranchId::new(),
        );
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.to_lowercase().contains("pin"));
        assert!(!json.to_lowercase().contains("digest"));
    }
}
