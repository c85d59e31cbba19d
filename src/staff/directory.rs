//! Staff directory service
//!
//! Profile lifecycle plus the PIN verification gate used by every
//! transfer operation. Verification reports the same result for wrong
//! PINs and unknown staff ids, and one external identity owns at most
//! one profile.

use std::sync::Arc;

use chrono::Utc;

use crate::core_types::{BranchId, StaffId, StaffRole};
use crate::error::{TransitError, TransitResult};
use crate::store::{DirectoryStore, RegistryStore};

use super::models::StaffProfile;
use super::pin;

const MAX_NAME_LEN: usize = 120;
const MAX_IDENTITY_LEN: usize = 255;

/// Staff profile and credential service
pub struct StaffDirectory {
    store: Arc<dyn DirectoryStore>,
    branches: Arc<dyn RegistryStore>,
}

impl StaffDirectory {
    pub fn new(store: Arc<dyn DirectoryStore>, branches: Arc<dyn RegistryStore>) -> Self {
        Self { store, branches }
    }

    /// Register a new staff member with their initial PIN.
    ///
    /// The home branch must exist, and `owner_identity` must not already
    /// own a profile. The PIN is hashed before anything is stored; the
    /// plaintext is dropped on return.
    pub async fn create_profile(
        &self,
        owner_identity: &str,
        name: &str,
        role: StaffRole,
        branch_id: BranchId,
        pin: &str,
    ) -> TransitResult<StaffProfile> {
        let owner_identity = validate_identity(owner_identity)?;
        let name = validate_name(name)?;
        let digest = pin::hash_pin(pin)?;

        if self.branches.get_branch(branch_id).await?.is_none() {
            return Err(TransitError::NotFound {
                kind: "branch",
                id: branch_id.to_string(),
            });
        }

        if let Some(existing) = self.store.get_staff_by_identity(&owner_identity).await? {
            return Err(TransitError::Conflict(format!(
                "identity already owns staff profile {}",
                existing.id
            )));
        }

        let profile = StaffProfile::new(owner_identity, name, role, branch_id);
        self.store.insert_staff(&profile, &digest).await?;

        tracing::info!(
            staff_id = %profile.id,
            role = %profile.role,
            branch_id = %profile.branch_id,
            "Staff profile created"
        );
        Ok(profile)
    }

    /// Fetch one profile, active or not
    pub async fn get_profile(&self, id: StaffId) -> TransitResult<StaffProfile> {
        self.store
            .get_staff(id)
            .await?
            .ok_or(TransitError::NotFound {
                kind: "staff",
                id: id.to_string(),
            })
    }

    /// Resolve the profile owned by an external identity, if any
    pub async fn get_profile_by_identity(
        &self,
        owner_identity: &str,
    ) -> TransitResult<Option<StaffProfile>> {
        self.store.get_staff_by_identity(owner_identity).await
    }

    /// List profiles, optionally restricted to one branch
    pub async fn list_staff(&self, branch_id: Option<BranchId>) -> TransitResult<Vec<StaffProfile>> {
        self.store.list_staff(branch_id).await
    }

    /// Check a PIN attempt against the stored digest.
    ///
    /// Returns false for a wrong PIN, a malformed candidate, or an unknown
    /// staff id. Unknown ids burn a verification against a fixed digest so
    /// the miss costs the same as a real check and the API does not leak
    /// which staff ids exist. The digest itself never leaves this module.
    pub async fn verify_pin(&self, id: StaffId, candidate: &str) -> TransitResult<bool> {
        if pin::validate_pin(candidate).is_err() {
            return Ok(false);
        }

        match self.store.get_pin_digest(id).await? {
            Some(digest) => Ok(pin::verify_pin(candidate, &digest)),
            None => {
                // Result intentionally discarded
                let _ = pin::verify_pin(candidate, pin::burn_in_digest());
                Ok(false)
            }
        }
    }

    /// Verify a PIN and return the authenticated profile, or PinMismatch.
    ///
    /// This is the form the transfer path uses; one call yields identity,
    /// role, and branch for the follow-on authorization checks.
    pub async fn authenticate(&self, id: StaffId, candidate: &str) -> TransitResult<StaffProfile> {
        if self.verify_pin(id, candidate).await? {
            self.get_profile(id).await
        } else {
            tracing::warn!(staff_id = %id, "PIN verification failed");
            Err(TransitError::PinMismatch)
        }
    }

    /// Rotate a PIN. The current PIN must verify first.
    pub async fn update_pin(
        &self,
        id: StaffId,
        current_pin: &str,
        new_pin: &str,
    ) -> TransitResult<()> {
        self.authenticate(id, current_pin).await?;

        let digest = pin::hash_pin(new_pin)?;
        self.store.update_pin_digest(id, &digest).await?;

        tracing::info!(staff_id = %id, "PIN updated");
        Ok(())
    }

    /// Deactivate a staff member. Their history stays intact but every
    /// authorization check fails from now on. Idempotent.
    pub async fn deactivate_staff(&self, id: StaffId) -> TransitResult<StaffProfile> {
        let mut profile = self.get_profile(id).await?;
        if !profile.active {
            return Ok(profile);
        }

        profile.active = false;
        profile.updated_at = Utc::now();
        self.store.update_staff(&profile).await?;

        tracing::info!(staff_id = %id, "Staff deactivated");
        Ok(profile)
    }
}

fn validate_name(name: &str) -> TransitResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TransitError::Validation(
            "staff name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(TransitError::Validation(format!(
            "staff name too long: {} chars (max {})",
            trimmed.len(),
            MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_identity(identity: &str) -> TransitResult<String> {
    let trimmed = identity.trim();
    if trimmed.is_empty() {
        return Err(TransitError::Validation(
            "owner identity must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_IDENTITY_LEN {
        return Err(TransitError::Validation(format!(
            "owner identity too long: {} chars (max {})",
            trimmed.len(),
            MAX_IDENTITY_LEN
        )));
    }
    Ok(trimmed.to_string())
}
