use crate::domain::location::{TargetId, TargetKind};

// ============================================================================
// Transport Order Commands
// ============================================================================

#[derive(Debug, Clone)]
pub enum TransportOrderCommand {
    /// Point the order at a target the redirect policy already accepted
    RedirectTarget { target: TargetId, target_kind: TargetKind },
}
