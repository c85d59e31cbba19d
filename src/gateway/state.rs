//! Shared gateway state.

use std::sync::Arc;

use crate::audit::LocationAuditTrail;
use crate::branch::BranchRegistry;
use crate::gateway::auth::AuthService;
use crate::ledger::TransferLedger;
use crate::staff::StaffDirectory;

/// Application state shared by every gateway handler.
pub struct AppState {
    pub registry: Arc<BranchRegistry>,
    pub directory: Arc<StaffDirectory>,
    pub ledger: Arc<TransferLedger>,
    pub audit_trail: Arc<LocationAuditTrail>,
    pub auth: Arc<AuthService>,
    /// Storage backend label surfaced by the health endpoint
    pub backend: &'static str,
}

impl AppState {
    pub fn new(
        registry: Arc<BranchRegistry>,
        directory: Arc<StaffDirectory>,
        ledger: Arc<TransferLedger>,
        audit_trail: Arc<LocationAuditTrail>,
        auth: Arc<AuthService>,
        backend: &'static str,
    ) -> Self {
        Self {
            registry,
            directory,
            ledger,
            audit_trail,
            auth,
            backend,
        }
    }
}
