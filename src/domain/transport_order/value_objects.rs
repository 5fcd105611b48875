use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Transport Order Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportOrderState {
    Created,
    Initialized,
    Started,
    Interrupted,
    #[serde(rename = "ONFAILURE")]
    OnFailure,
    Canceled,
    Finished,
}

impl TransportOrderState {
    pub const ALL: [TransportOrderState; 7] = [
        TransportOrderState::Created,
        TransportOrderState::Initialized,
        TransportOrderState::Started,
        TransportOrderState::Interrupted,
        TransportOrderState::OnFailure,
        TransportOrderState::Canceled,
        TransportOrderState::Finished,
    ];

    /// Orders in a final state keep their target forever
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TransportOrderState::OnFailure | TransportOrderState::Canceled | TransportOrderState::Finished
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportOrderState::Created => "CREATED",
            TransportOrderState::Initialized => "INITIALIZED",
            TransportOrderState::Started => "STARTED",
            TransportOrderState::Interrupted => "INTERRUPTED",
            TransportOrderState::OnFailure => "ONFAILURE",
            TransportOrderState::Canceled => "CANCELED",
            TransportOrderState::Finished => "FINISHED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == raw)
    }
}

impl fmt::Display for TransportOrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
