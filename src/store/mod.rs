//! Storage backends.
//!
//! Three narrow seams split persistence by lifecycle: reference data
//! (branches, staff) changes rarely and tolerates plain row updates,
//! while every stock mutation goes through [`LedgerStore`], whose
//! methods are one atomic transaction each. Backends must guarantee
//! that a failed ledger call leaves no partial effects.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::audit::{AuditEntry, AuditQuery};
use crate::branch::Branch;
use crate::core_types::{BranchId, ProductId, SlipId, StaffId};
use crate::error::TransitResult;
use crate::ledger::{InitiateSpec, Product, SlipFilter, TransferSlip};
use crate::staff::StaffProfile;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Branch reference data.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    async fn insert_branch(&self, branch: &Branch) -> TransitResult<()>;

    async fn get_branch(&self, id: BranchId) -> TransitResult<Option<Branch>>;

    /// Branches in insertion order. `active_only` hides deactivated ones.
    async fn list_branches(&self, active_only: bool) -> TransitResult<Vec<Branch>>;

    async fn update_branch(&self, branch: &Branch) -> TransitResult<()>;
}

/// Staff profiles and their PIN digests.
///
/// Digests travel separately from profiles so a profile read can never
/// leak credential material.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Inserts a profile with its PIN digest. Fails with `Conflict` if
    /// the owner identity already has a profile.
    async fn insert_staff(&self, profile: &StaffProfile, pin_digest: &str) -> TransitResult<()>;

    async fn get_staff(&self, id: StaffId) -> TransitResult<Option<StaffProfile>>;

    async fn get_staff_by_identity(
        &self,
        owner_identity: &str,
    ) -> TransitResult<Option<StaffProfile>>;

    async fn list_staff(&self, branch: Option<BranchId>) -> TransitResult<Vec<StaffProfile>>;

    async fn update_staff(&self, profile: &StaffProfile) -> TransitResult<()>;

    async fn get_pin_digest(&self, id: StaffId) -> TransitResult<Option<String>>;

    async fn update_pin_digest(&self, id: StaffId, digest: &str) -> TransitResult<()>;
}

/// Products, transfer slips, and the audit trail.
///
/// Each mutating method is one transaction covering the product row,
/// the slip row, and the audit append. State preconditions that depend
/// on stored data (product exists, stock suffices, slip still in
/// transit) are checked inside the transaction against locked rows,
/// so concurrent callers serialize instead of double-spending.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Inserts a product and its opening-stock audit entry.
    async fn register_product(&self, product: &Product, actor: StaffId) -> TransitResult<()>;

    async fn get_product(&self, id: ProductId) -> TransitResult<Option<Product>>;

    async fn list_products(&self, branch: Option<BranchId>) -> TransitResult<Vec<Product>>;

    /// Applies a signed correction to a product's quantity.
    ///
    /// The actor profile is passed whole: managers may only adjust
    /// stock located at their own branch, which can only be decided
    /// against the product row read inside the transaction.
    async fn adjust_stock(
        &self,
        product_id: ProductId,
        delta: i64,
        actor: &StaffProfile,
    ) -> TransitResult<Product>;

    /// Debits the product and creates the in-transit slip.
    async fn initiate_transfer(&self, spec: &InitiateSpec) -> TransitResult<TransferSlip>;

    /// Credits the destination and completes the slip.
    async fn receive_transfer(
        &self,
        slip_id: SlipId,
        receiver: StaffId,
    ) -> TransitResult<TransferSlip>;

    /// Restores the origin's stock and cancels the slip.
    async fn cancel_transfer(&self, slip_id: SlipId, actor: StaffId) -> TransitResult<TransferSlip>;

    async fn get_slip(&self, id: SlipId) -> TransitResult<Option<TransferSlip>>;

    /// Slips matching the filter, most recently initiated first.
    async fn list_slips(&self, filter: &SlipFilter) -> TransitResult<Vec<TransferSlip>>;

    /// Audit entries in recording order.
    async fn query_audit(&self, query: &AuditQuery) -> TransitResult<Vec<AuditEntry>>;
}
