use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use super::commands::TransportOrderCommand;
use super::errors::RedirectError;
use crate::domain::location::TargetId;
use crate::domain::redirect::{decide, RedirectOutcome, TargetResolver};
use crate::metrics::Metrics;
use crate::store::{StoreError, TransportOrderRepository};

// ============================================================================
// Transport Order Command Handler
// ============================================================================
//
// Orchestrates: load order → resolve target → decide → aggregate → save
//
// A version conflict on save restarts the whole sequence with fresh state,
// at most `max_conflict_retries` times.
//
// ============================================================================

pub type RedirectResult = Result<(), RedirectError>;

pub struct TransportOrderCommandHandler {
    repository: Arc<dyn TransportOrderRepository>,
    resolver: TargetResolver,
    max_conflict_retries: u32,
    metrics: Option<Arc<Metrics>>,
}

impl TransportOrderCommandHandler {
    pub fn new(repository: Arc<dyn TransportOrderRepository>, resolver: TargetResolver) -> Self {
        Self {
            repository,
            resolver,
            max_conflict_retries: 3,
            metrics: None,
        }
    }

    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Redirect an order to `raw_target`. On any error the stored order is
    /// exactly what it was before the call.
    pub async fn redirect(&self, order_id: Uuid, raw_target: &str) -> RedirectResult {
        let started = Instant::now();
        let result = self.redirect_with_conflict_retry(order_id, raw_target).await;

        match &result {
            Ok(()) => tracing::info!(order_id = %order_id, target_id = raw_target, "Redirect accepted"),
            Err(e) if e.is_retryable() => {
                tracing::warn!(order_id = %order_id, target_id = raw_target, code = e.code(), error = %e, "Redirect failed")
            }
            Err(e) => {
                tracing::info!(order_id = %order_id, target_id = raw_target, code = e.code(), error = %e, "Redirect rejected")
            }
        }

        if let Some(metrics) = &self.metrics {
            let outcome = match &result {
                Ok(()) => "accepted".to_string(),
                Err(e) => e.code().to_ascii_lowercase(),
            };
            metrics.record_redirect(&outcome, started.elapsed().as_secs_f64());
        }

        result
    }

    async fn redirect_with_conflict_retry(&self, order_id: Uuid, raw_target: &str) -> RedirectResult {
        let target = TargetId::parse(raw_target)?;
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.try_redirect(order_id, &target).await {
                Err(RedirectError::Store(StoreError::VersionConflict { expected, actual })) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.record_version_conflict();
                    }

                    if attempt > self.max_conflict_retries {
                        return Err(RedirectError::ConcurrencyConflict {
                            id: order_id,
                            attempts: attempt,
                        });
                    }

                    tracing::warn!(
                        order_id = %order_id,
                        attempt = attempt,
                        expected = expected,
                        actual = actual,
                        "Concurrent modification, retrying redirect"
                    );
                }
                other => return other,
            }
        }
    }

    async fn try_redirect(&self, order_id: Uuid, target: &TargetId) -> RedirectResult {
        let order = self
            .repository
            .find(order_id)
            .await?
            .ok_or(RedirectError::OrderNotFound(order_id))?;

        order.ensure_redirectable()?;

        let resolved = self.resolver.resolve(target).await?;
        let outcome = decide(&resolved);

        tracing::debug!(
            order_id = %order_id,
            target_id = %target,
            resolved_as = resolved.kind().map(|kind| kind.as_str()).unwrap_or("nothing"),
            accepted = outcome.is_accepted(),
            outcome = outcome.label(),
            "Redirect decision"
        );

        let target_kind = match outcome {
            RedirectOutcome::Accepted(kind) => kind,
            RedirectOutcome::RejectedUnknownTarget => return Err(RedirectError::UnknownTarget(target.clone())),
            RedirectOutcome::RejectedBlockedTarget(kind) => {
                return Err(RedirectError::BlockedTarget {
                    target: target.clone(),
                    kind,
                })
            }
        };

        let expected_version = order.version;
        let events = order.handle_command(&TransportOrderCommand::RedirectTarget {
            target: target.clone(),
            target_kind,
        })?;

        if events.is_empty() {
            tracing::debug!(order_id = %order_id, target_id = %target, "Order already points at target");
            return Ok(());
        }

        let mut updated = order;
        for event in &events {
            updated.apply_event(event);
        }

        let new_version = self.repository.save(&updated, expected_version).await?;

        for event in &events {
            tracing::info!(
                order_id = %order_id,
                event_type = event.event_type(),
                new_version = new_version,
                "Applied transport order event"
            );
        }

        Ok(())
    }
}
