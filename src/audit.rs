//! Location audit trail
//!
//! Append-only log of every stock relocation. Entries are written only
//! from inside ledger transactions; once the owning transaction commits
//! they are permanent and immutable. This module owns the entry model
//! and the read-side query surface; the append itself lives behind the
//! ledger store so it can share the transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core_types::{BranchId, MoveReason, ProductId, SlipId, StaffId};
use crate::error::TransitResult;
use crate::store::LedgerStore;

/// Default page size for audit queries
pub const DEFAULT_PAGE_LIMIT: usize = 100;
/// Hard cap on one page
pub const MAX_PAGE_LIMIT: usize = 1000;

/// A stock movement composed inside a ledger transaction, before the
/// store assigns its sequence number.
///
/// Direction conventions: slip movements carry the slip's own endpoints
/// for all three transfer reasons. Stock intake has no source branch;
/// adjustments put the branch on the side the stock moved toward.
#[derive(Debug, Clone)]
pub struct StockMove {
    pub product_id: ProductId,
    pub from_branch: Option<BranchId>,
    pub to_branch: Option<BranchId>,
    pub quantity: u32,
    pub reason: MoveReason,
    pub slip_id: Option<SlipId>,
    pub staff_id: StaffId,
    pub recorded_at: DateTime<Utc>,
}

impl StockMove {
    /// Opening quantity recorded when a product is registered
    pub fn initial_stock(
        product_id: ProductId,
        branch_id: BranchId,
        quantity: u32,
        staff_id: StaffId,
    ) -> Self {
        Self {
            product_id,
            from_branch: None,
            to_branch: Some(branch_id),
            quantity,
            reason: MoveReason::InitialStock,
            slip_id: None,
            staff_id,
            recorded_at: Utc::now(),
        }
    }

    /// Manual correction. `delta` keeps its sign here; the entry stores
    /// the magnitude with the branch on the gaining or losing side.
    pub fn adjustment(
        product_id: ProductId,
        branch_id: BranchId,
        delta: i64,
        staff_id: StaffId,
    ) -> Self {
        let (from_branch, to_branch) = if delta >= 0 {
            (None, Some(branch_id))
        } else {
            (Some(branch_id), None)
        };
        Self {
            product_id,
            from_branch,
            to_branch,
            quantity: delta.unsigned_abs().min(u32::MAX as u64) as u32,
            reason: MoveReason::Adjustment,
            slip_id: None,
            staff_id,
            recorded_at: Utc::now(),
        }
    }
}

/// One persisted audit trail entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditEntry {
    /// Storage-assigned, strictly increasing. Chronological order and the
    /// restart cursor for paged queries.
    pub seq: u64,
    #[schema(value_type = String)]
    pub product_id: ProductId,
    #[schema(value_type = Option<String>)]
    pub from_branch: Option<BranchId>,
    #[schema(value_type = Option<String>)]
    pub to_branch: Option<BranchId>,
    pub quantity: u32,
    pub reason: MoveReason,
    #[schema(value_type = Option<String>)]
    pub slip_id: Option<SlipId>,
    #[schema(value_type = String)]
    pub staff_id: StaffId,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Attach the assigned sequence number to a movement
    pub fn from_move(seq: u64, mv: StockMove) -> Self {
        Self {
            seq,
            product_id: mv.product_id,
            from_branch: mv.from_branch,
            to_branch: mv.to_branch,
            quantity: mv.quantity,
            reason: mv.reason,
            slip_id: mv.slip_id,
            staff_id: mv.staff_id,
            recorded_at: mv.recorded_at,
        }
    }
}

/// Filter for audit queries. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub product_id: Option<ProductId>,
    /// Matches entries touching this branch on either side
    pub branch_id: Option<BranchId>,
    pub slip_id: Option<SlipId>,
    /// Resume after this sequence number (exclusive)
    pub after_seq: Option<u64>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Default::default()
        }
    }

    /// Page size with default and hard cap applied
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT)
    }

    /// Filter predicate shared by the in-process store
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(product_id) = self.product_id {
            if entry.product_id != product_id {
                return false;
            }
        }
        if let Some(branch_id) = self.branch_id {
            let touches = entry.from_branch == Some(branch_id) || entry.to_branch == Some(branch_id);
            if !touches {
                return false;
            }
        }
        if let Some(slip_id) = self.slip_id {
            if entry.slip_id != Some(slip_id) {
                return false;
            }
        }
        if let Some(after) = self.after_seq {
            if entry.seq <= after {
                return false;
            }
        }
        true
    }
}

/// One page of audit entries in chronological (sequence) order
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    /// Cursor for the next page; absent when this page was not full
    pub next_after: Option<u64>,
}

/// Read-side facade over the audit trail.
///
/// There is intentionally no public append: entries enter the trail only
/// through ledger transactions.
pub struct LocationAuditTrail {
    store: Arc<dyn LedgerStore>,
}

impl LocationAuditTrail {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Run one paged query. Safe for concurrent use; a caller holding the
    /// returned cursor can resume later and see exactly the entries
    /// appended since, in order.
    pub async fn query(&self, query: AuditQuery) -> TransitResult<AuditPage> {
        let limit = query.effective_limit();
        let entries = self.store.query_audit(&query).await?;

        let next_after = if entries.len() == limit {
            entries.last().map(|e| e.seq)
        } else {
            None
        };

        Ok(AuditPage { entries, next_after })
    }

    /// Full movement history of one product, oldest first
    pub async fn product_history(
        &self,
        product_id: ProductId,
        after_seq: Option<u64>,
        limit: Option<usize>,
    ) -> TransitResult<AuditPage> {
        self.query(AuditQuery {
            product_id: Some(product_id),
            after_seq,
            limit,
            ..Default::default()
        })
        .await
    }
}
