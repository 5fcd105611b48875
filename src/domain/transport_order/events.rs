use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::location::{TargetId, TargetKind};

// ============================================================================
// Transport Order Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TransportOrderEvent {
    TargetRedirected(TargetRedirected),
}

impl TransportOrderEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            TransportOrderEvent::TargetRedirected(_) => "TransportOrderTargetRedirected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRedirected {
    pub previous_target: TargetId,
    pub new_target: TargetId,
    pub target_kind: TargetKind,
    pub redirected_at: DateTime<Utc>,
}
