//! Branch registry service
//!
//! Thin validation layer over the registry store. Branch records are
//! read-mostly reference data; concurrent edits resolve last-write-wins.

use std::sync::Arc;

use chrono::Utc;

use crate::core_types::BranchId;
use crate::error::{TransitError, TransitResult};
use crate::store::RegistryStore;

use super::models::Branch;

const MAX_NAME_LEN: usize = 120;
const MAX_ADDRESS_LEN: usize = 500;

/// Branch reference-data service
pub struct BranchRegistry {
    store: Arc<dyn RegistryStore>,
}

impl BranchRegistry {
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Register a new branch. The branch starts active.
    pub async fn create_branch(&self, name: &str, address: &str) -> TransitResult<Branch> {
        let name = validate_name(name)?;
        let address = validate_address(address)?;

        let branch = Branch::new(name, address);
        self.store.insert_branch(&branch).await?;

        tracing::info!(branch_id = %branch.id, name = %branch.name, "Branch created");
        Ok(branch)
    }

    /// Fetch one branch, active or not
    pub async fn get_branch(&self, id: BranchId) -> TransitResult<Branch> {
        self.store
            .get_branch(id)
            .await?
            .ok_or(TransitError::NotFound {
                kind: "branch",
                id: id.to_string(),
            })
    }

    /// List branches, optionally hiding deactivated ones
    pub async fn list_branches(&self, active_only: bool) -> TransitResult<Vec<Branch>> {
        self.store.list_branches(active_only).await
    }

    /// Edit name and/or address. Untouched fields keep their value.
    pub async fn update_branch(
        &self,
        id: BranchId,
        name: Option<&str>,
        address: Option<&str>,
    ) -> TransitResult<Branch> {
        let mut branch = self.get_branch(id).await?;

        if let Some(name) = name {
            branch.name = validate_name(name)?;
        }
        if let Some(address) = address {
            branch.address = validate_address(address)?;
        }
        branch.updated_at = Utc::now();

        self.store.update_branch(&branch).await?;
        Ok(branch)
    }

    /// Hide a branch from listings and block it as a transfer endpoint.
    ///
    /// Idempotent: deactivating an already-inactive branch is a no-op.
    /// The record itself survives so slip history keeps resolving.
    pub async fn deactivate_branch(&self, id: BranchId) -> TransitResult<Branch> {
        let mut branch = self.get_branch(id).await?;
        if !branch.active {
            return Ok(branch);
        }

        branch.active = false;
        branch.updated_at = Utc::now();
        self.store.update_branch(&branch).await?;

        tracing::info!(branch_id = %branch.id, name = %branch.name, "Branch deactivated");
        Ok(branch)
    }
}

fn validate_name(name: &str) -> TransitResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TransitError::Validation(
            "branch name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(TransitError::Validation(format!(
            "branch name too long: {} chars (max {})",
            trimmed.len(),
            MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_address(address: &str) -> TransitResult<String> {
    let trimmed = address.trim();
    if trimmed.len() > MAX_ADDRESS_LEN {
        return Err(TransitError::Validation(format!(
            "branch address too long: {} chars (max {})",
            trimmed.len(),
            MAX_ADDRESS_LEN
        )));
    }
    Ok(trimmed.to_string())
}
