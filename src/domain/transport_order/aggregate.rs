use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commands::TransportOrderCommand;
use super::errors::TransportOrderError;
use super::events::{TargetRedirected, TransportOrderEvent};
use super::value_objects::TransportOrderState;
use crate::domain::location::TargetId;

// ============================================================================
// Transport Order Aggregate
// ============================================================================
//
// Commands are validated against current state and turned into events;
// state only changes by applying those events. `version` is the optimistic
// concurrency token owned by the repository.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOrder {
    // Identity
    pub id: Uuid,
    pub version: i64,

    // Current State
    pub transport_unit_bk: String,
    pub target: TargetId,
    pub state: TransportOrderState,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransportOrder {
    /// A freshly created order, as handed over by the creation workflow
    pub fn new(id: Uuid, transport_unit_bk: impl Into<String>, target: TargetId) -> Self {
        let now = Utc::now();
        Self {
            id,
            version: 1,
            transport_unit_bk: transport_unit_bk.into(),
            target,
            state: TransportOrderState::Created,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_state(mut self, state: TransportOrderState) -> Self {
        self.state = state;
        self
    }

    pub fn ensure_redirectable(&self) -> Result<(), TransportOrderError> {
        if self.state.is_final() {
            return Err(TransportOrderError::NotRedirectable {
                id: self.id,
                state: self.state,
            });
        }
        Ok(())
    }

    pub fn handle_command(&self, command: &TransportOrderCommand) -> Result<Vec<TransportOrderEvent>, TransportOrderError> {
        match command {
            TransportOrderCommand::RedirectTarget { target, target_kind } => {
                self.ensure_redirectable()?;

                if *target == self.target {
                    return Ok(vec![]);
                }

                Ok(vec![TransportOrderEvent::TargetRedirected(TargetRedirected {
                    previous_target: self.target.clone(),
                    new_target: target.clone(),
                    target_kind: *target_kind,
                    redirected_at: Utc::now(),
                })])
            }
        }
    }

    pub fn apply_event(&mut self, event: &TransportOrderEvent) {
        match event {
            TransportOrderEvent::TargetRedirected(e) => {
                self.target = e.new_target.clone();
                self.updated_at = e.redirected_at;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::TargetKind;

    fn order() -> TransportOrder {
        TransportOrder::new(Uuid::new_v4(), "00000000000000004711", TargetId::parse("FGIN0001").unwrap())
    }

    fn redirect_to(raw: &str) -> TransportOrderCommand {
        TransportOrderCommand::RedirectTarget {
            target: TargetId::parse(raw).unwrap(),
            target_kind: TargetKind::Location,
        }
    }

    #[test]
    fn test_new_order_starts_created() {
        let order = order();
        assert_eq!(order.state, TransportOrderState::Created);
        assert_eq!(order.version, 1);
        assert!(order.ensure_redirectable().is_ok());
    }

    #[test]
    fn test_redirect_emits_event_and_apply_changes_target() {
        let mut order = order();
        let events = order.handle_command(&redirect_to("ZILE")).unwrap();

        assert_eq!(events.len(), 1);
        let TransportOrderEvent::TargetRedirected(e) = &events[0];
        assert_eq!(e.previous_target.as_str(), "FGIN0001");
        assert_eq!(e.new_target.as_str(), "ZILE");

        // handle_command itself does not mutate
        assert_eq!(order.target.as_str(), "FGIN0001");

        order.apply_event(&events[0]);
        assert_eq!(order.target.as_str(), "ZILE");
    }

    #[test]
    fn test_redirect_to_current_target_emits_nothing() {
        let order = order();
        let events = order.handle_command(&redirect_to("FGIN0001")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_final_states_reject_redirect() {
        for state in TransportOrderState::ALL.into_iter().filter(|s| s.is_final()) {
            let order = order().with_state(state);
            let err = order.handle_command(&redirect_to("ZILE")).unwrap_err();
            assert_eq!(err, TransportOrderError::NotRedirectable { id: order.id, state });
        }
    }

    #[test]
    fn test_started_order_can_be_redirected() {
        let order = order().with_state(TransportOrderState::Started);
        assert_eq!(order.handle_command(&redirect_to("ZILE")).unwrap().len(), 1);
    }
}
