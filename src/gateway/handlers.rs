//! Gateway request handlers, grouped by resource.

pub mod audit;
pub mod auth;
pub mod branch;
pub mod health;
pub mod product;
pub mod staff;
pub mod transfer;

use crate::gateway::types::ApiError;
use crate::staff::StaffProfile;

/// Gate for admin-only endpoints.
pub(crate) fn require_admin(actor: &StaffProfile) -> Result<(), ApiError> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("admin role required"))
    }
}

/// Gate for manager-or-admin endpoints.
pub(crate) fn require_manager(actor: &StaffProfile) -> Result<(), ApiError> {
    if actor.role.is_manager() {
        Ok(())
    } else {
        Err(ApiError::forbidden("manager or admin role required"))
    }
}
