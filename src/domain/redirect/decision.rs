use serde::{Deserialize, Serialize};

use super::resolver::ResolvedTarget;
use crate::domain::location::TargetKind;

/// Verdict for a single redirect request. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectOutcome {
    Accepted(TargetKind),
    RejectedUnknownTarget,
    RejectedBlockedTarget(TargetKind),
}

impl RedirectOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RedirectOutcome::Accepted(_))
    }

    /// Label used for logs and the outcome counter
    pub fn label(&self) -> &'static str {
        match self {
            RedirectOutcome::Accepted(_) => "accepted",
            RedirectOutcome::RejectedUnknownTarget => "unknown_target",
            RedirectOutcome::RejectedBlockedTarget(_) => "blocked_target",
        }
    }
}

/// Acceptance policy for redirect targets.
///
/// Unresolved targets are unknown; resolved targets are accepted only while
/// they take incoming transport orders. Only the entity the resolver picked
/// is consulted.
pub fn decide(resolved: &ResolvedTarget) -> RedirectOutcome {
    match resolved {
        ResolvedTarget::Unresolved => RedirectOutcome::RejectedUnknownTarget,
        ResolvedTarget::ResolvedAsGroup(group) if !group.incoming_active => {
            RedirectOutcome::RejectedBlockedTarget(TargetKind::LocationGroup)
        }
        ResolvedTarget::ResolvedAsGroup(_) => RedirectOutcome::Accepted(TargetKind::LocationGroup),
        ResolvedTarget::ResolvedAsLocation(location) if !location.incoming_active => {
            RedirectOutcome::RejectedBlockedTarget(TargetKind::Location)
        }
        ResolvedTarget::ResolvedAsLocation(_) => RedirectOutcome::Accepted(TargetKind::Location),
    }
}
