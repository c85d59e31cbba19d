//! In-process storage backend.
//!
//! Reference tables live in lock-free maps. The ledger tables share one
//! `RwLock` so each ledger method is a single critical section: all
//! validation runs before the first mutation, which is what makes a
//! failed call side-effect free and a concurrent double-spend
//! impossible without a database.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxHashMap;

use crate::audit::{AuditEntry, AuditQuery, StockMove};
use crate::branch::Branch;
use crate::core_types::{BranchId, ProductId, SlipId, StaffId};
use crate::error::{TransitError, TransitResult};
use crate::ledger::{InitiateSpec, Product, SlipFilter, SlipStatus, TransferSlip};
use crate::staff::StaffProfile;

use super::{DirectoryStore, LedgerStore, RegistryStore};

#[derive(Default)]
struct LedgerTables {
    products: FxHashMap<ProductId, Product>,
    slips: FxHashMap<SlipId, TransferSlip>,
    audit: Vec<AuditEntry>,
    next_seq: u64,
}

impl LedgerTables {
    fn append(&mut self, mv: StockMove) {
        self.next_seq += 1;
        self.audit.push(AuditEntry::from_move(self.next_seq, mv));
    }
}

/// All-in-memory backend, also the test double for the Postgres one
#[derive(Default)]
pub struct MemoryStore {
    branches: DashMap<BranchId, Branch>,
    staff: DashMap<StaffId, StaffProfile>,
    pin_digests: DashMap<StaffId, String>,
    identity_index: DashMap<String, StaffId>,
    ledger: RwLock<LedgerTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables_read(&self) -> TransitResult<RwLockReadGuard<'_, LedgerTables>> {
        self.ledger
            .read()
            .map_err(|_| TransitError::Storage("ledger lock poisoned".to_string()))
    }

    fn tables_write(&self) -> TransitResult<RwLockWriteGuard<'_, LedgerTables>> {
        self.ledger
            .write()
            .map_err(|_| TransitError::Storage("ledger lock poisoned".to_string()))
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn insert_branch(&self, branch: &Branch) -> TransitResult<()> {
        self.branches.insert(branch.id, branch.clone());
        Ok(())
    }

    async fn get_branch(&self, id: BranchId) -> TransitResult<Option<Branch>> {
        Ok(self.branches.get(&id).map(|b| b.clone()))
    }

    async fn list_branches(&self, active_only: bool) -> TransitResult<Vec<Branch>> {
        let mut branches: Vec<Branch> = self
            .branches
            .iter()
            .filter(|b| !active_only || b.active)
            .map(|b| b.clone())
            .collect();
        // ULIDs sort by creation time, which is the insertion order
        branches.sort_by_key(|b| b.id);
        Ok(branches)
    }

    async fn update_branch(&self, branch: &Branch) -> TransitResult<()> {
        match self.branches.get_mut(&branch.id) {
            Some(mut entry) => {
                *entry = branch.clone();
                Ok(())
            }
            None => Err(TransitError::NotFound {
                kind: "branch",
                id: branch.id.to_string(),
            }),
        }
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn insert_staff(&self, profile: &StaffProfile, pin_digest: &str) -> TransitResult<()> {
        // The identity index is the uniqueness gate; claim it first
        match self.identity_index.entry(profile.owner_identity.clone()) {
            Entry::Occupied(existing) => {
                return Err(TransitError::Conflict(format!(
                    "identity already owns staff profile {}",
                    existing.get()
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(profile.id);
            }
        }
        self.staff.insert(profile.id, profile.clone());
        self.pin_digests.insert(profile.id, pin_digest.to_string());
        Ok(())
    }

    async fn get_staff(&self, id: StaffId) -> TransitResult<Option<StaffProfile>> {
        Ok(self.staff.get(&id).map(|s| s.clone()))
    }

    async fn get_staff_by_identity(
        &self,
        owner_identity: &str,
    ) -> TransitResult<Option<StaffProfile>> {
        let Some(id) = self.identity_index.get(owner_identity).map(|e| *e) else {
            return Ok(None);
        };
        Ok(self.staff.get(&id).map(|s| s.clone()))
    }

    async fn list_staff(&self, branch: Option<BranchId>) -> TransitResult<Vec<StaffProfile>> {
        let mut staff: Vec<StaffProfile> = self
            .staff
            .iter()
            .filter(|s| branch.is_none_or(|b| s.branch_id == b))
            .map(|s| s.clone())
            .collect();
        staff.sort_by_key(|s| s.id);
        Ok(staff)
    }

    async fn update_staff(&self, profile: &StaffProfile) -> TransitResult<()> {
        match self.staff.get_mut(&profile.id) {
            Some(mut entry) => {
                *entry = profile.clone();
                Ok(())
            }
            None => Err(TransitError::NotFound {
                kind: "staff",
                id: profile.id.to_string(),
            }),
        }
    }

    async fn get_pin_digest(&self, id: StaffId) -> TransitResult<Option<String>> {
        Ok(self.pin_digests.get(&id).map(|d| d.clone()))
    }

    async fn update_pin_digest(&self, id: StaffId, digest: &str) -> TransitResult<()> {
        match self.pin_digests.get_mut(&id) {
            Some(mut entry) => {
                *entry = digest.to_string();
                Ok(())
            }
            None => Err(TransitError::NotFound {
                kind: "staff",
                id: id.to_string(),
            }),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn register_product(&self, product: &Product, actor: StaffId) -> TransitResult<()> {
        let mut tables = self.tables_write()?;
        tables.products.insert(product.id, product.clone());
        tables.append(StockMove::initial_stock(
            product.id,
            product.current_branch,
            product.quantity,
            actor,
        ));
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> TransitResult<Option<Product>> {
        Ok(self.tables_read()?.products.get(&id).cloned())
    }

    async fn list_products(&self, branch: Option<BranchId>) -> TransitResult<Vec<Product>> {
        let tables = self.tables_read()?;
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| branch.is_none_or(|b| p.current_branch == b))
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn adjust_stock(
        &self,
        product_id: ProductId,
        delta: i64,
        actor: &StaffProfile,
    ) -> TransitResult<Product> {
        let mut tables = self.tables_write()?;

        let updated = {
            let product =
                tables
                    .products
                    .get_mut(&product_id)
                    .ok_or_else(|| TransitError::NotFound {
                        kind: "product",
                        id: product_id.to_string(),
                    })?;

            // Only admins may correct stock held at another branch
            if !actor.role.is_admin() && actor.branch_id != product.current_branch {
                return Err(TransitError::NotAuthorized(format!(
                    "manager works at branch {}, product sits at {}",
                    actor.branch_id, product.current_branch
                )));
            }

            let new_qty = product.quantity as i64 + delta;
            if new_qty < 0 {
                return Err(TransitError::Validation(format!(
                    "adjustment {delta:+} would drive stock below zero (current {})",
                    product.quantity
                )));
            }
            if new_qty > u32::MAX as i64 {
                return Err(TransitError::Validation(
                    "adjustment would overflow the stock count".to_string(),
                ));
            }

            product.quantity = new_qty as u32;
            product.updated_at = Utc::now();
            product.clone()
        };

        tables.append(StockMove::adjustment(
            product_id,
            updated.current_branch,
            delta,
            actor.id,
        ));
        Ok(updated)
    }

    async fn initiate_transfer(&self, spec: &InitiateSpec) -> TransitResult<TransferSlip> {
        let mut tables = self.tables_write()?;

        // All checks run before the first mutation
        let slip = {
            let product =
                tables
                    .products
                    .get_mut(&spec.product_id)
                    .ok_or_else(|| TransitError::NotFound {
                        kind: "product",
                        id: spec.product_id.to_string(),
                    })?;

            if product.quantity < spec.quantity {
                return Err(TransitError::InsufficientStock {
                    product_id: spec.product_id,
                    requested: spec.quantity,
                    available: product.quantity,
                });
            }

            product.quantity -= spec.quantity;
            product.updated_at = spec.initiated_at;
            TransferSlip::from_spec(spec, product.name.clone())
        };

        tables.slips.insert(slip.id, slip.clone());
        tables.append(slip.departure_move());
        Ok(slip)
    }

    async fn receive_transfer(
        &self,
        slip_id: SlipId,
        receiver: StaffId,
    ) -> TransitResult<TransferSlip> {
        let mut tables = self.tables_write()?;
        let received_at = Utc::now();

        let (product_id, quantity, to_branch) = {
            let slip = tables
                .slips
                .get(&slip_id)
                .ok_or_else(|| TransitError::NotFound {
                    kind: "slip",
                    id: slip_id.to_string(),
                })?;
            if slip.status != SlipStatus::InTransit {
                return Err(TransitError::InvalidState {
                    slip_id,
                    status: slip.status,
                });
            }
            (slip.product_id, slip.quantity, slip.to_branch)
        };

        {
            let product =
                tables
                    .products
                    .get_mut(&product_id)
                    .ok_or_else(|| TransitError::NotFound {
                        kind: "product",
                        id: product_id.to_string(),
                    })?;
            let new_qty = product.quantity.checked_add(quantity).ok_or_else(|| {
                TransitError::Validation("receipt would overflow the stock count".to_string())
            })?;
            product.quantity = new_qty;
            product.current_branch = to_branch;
            product.updated_at = received_at;
        }

        let slip = {
            // Present: checked above under the same lock
            let slip = tables
                .slips
                .get_mut(&slip_id)
                .ok_or_else(|| TransitError::NotFound {
                    kind: "slip",
                    id: slip_id.to_string(),
                })?;
            slip.status = SlipStatus::Completed;
            slip.receiver_staff_id = Some(receiver);
            slip.received_at = Some(received_at);
            slip.clone()
        };

        tables.append(slip.arrival_move(receiver, received_at));
        Ok(slip)
    }

    async fn cancel_transfer(
        &self,
        slip_id: SlipId,
        actor: StaffId,
    ) -> TransitResult<TransferSlip> {
        let mut tables = self.tables_write()?;
        let cancelled_at = Utc::now();

        let (product_id, quantity) = {
            let slip = tables
                .slips
                .get(&slip_id)
                .ok_or_else(|| TransitError::NotFound {
                    kind: "slip",
                    id: slip_id.to_string(),
                })?;
            if slip.status != SlipStatus::InTransit {
                return Err(TransitError::InvalidState {
                    slip_id,
                    status: slip.status,
                });
            }
            (slip.product_id, slip.quantity)
        };

        {
            let product =
                tables
                    .products
                    .get_mut(&product_id)
                    .ok_or_else(|| TransitError::NotFound {
                        kind: "product",
                        id: product_id.to_string(),
                    })?;
            let new_qty = product.quantity.checked_add(quantity).ok_or_else(|| {
                TransitError::Validation("cancellation would overflow the stock count".to_string())
            })?;
            // Units return to the origin; the last known location does
            // not change on a cancellation
            product.quantity = new_qty;
            product.updated_at = cancelled_at;
        }

        let slip = {
            let slip = tables
                .slips
                .get_mut(&slip_id)
                .ok_or_else(|| TransitError::NotFound {
                    kind: "slip",
                    id: slip_id.to_string(),
                })?;
            slip.status = SlipStatus::Cancelled;
            slip.clone()
        };

        tables.append(slip.return_move(actor, cancelled_at));
        Ok(slip)
    }

    async fn get_slip(&self, id: SlipId) -> TransitResult<Option<TransferSlip>> {
        Ok(self.tables_read()?.slips.get(&id).cloned())
    }

    async fn list_slips(&self, filter: &SlipFilter) -> TransitResult<Vec<TransferSlip>> {
        let tables = self.tables_read()?;
        let mut slips: Vec<TransferSlip> = tables
            .slips
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        slips.sort_by(|a, b| {
            b.initiated_at
                .cmp(&a.initiated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(slips
            .into_iter()
            .skip(filter.offset.unwrap_or(0))
            .take(filter.effective_limit())
            .collect())
    }

    async fn query_audit(&self, query: &AuditQuery) -> TransitResult<Vec<AuditEntry>> {
        let tables = self.tables_read()?;
        // The log is already in sequence order
        Ok(tables
            .audit
            .iter()
            .filter(|e| query.matches(e))
            .take(query.effective_limit())
            .cloned()
            .collect())
    }
}
