use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{AppConfig, DirectoryConfig, StoreBackend, StoreConfig};
use crate::domain::location::TargetId;
use crate::domain::redirect::TargetResolver;
use crate::domain::transport_order::{TransportOrder, TransportOrderCommandHandler};
use crate::gateway::{DirectoryGateway, HttpDirectoryGateway, InMemoryDirectory, ResilientDirectoryGateway};
use crate::metrics::Metrics;
use crate::store::{
    InMemoryTransportOrderRepository, ScyllaTransportOrderRepository, StoreError, TransportOrderRepository,
};

/// HTTP directory when a base URL is configured, the static entries
/// otherwise. Either way wrapped in timeout/retry/circuit breaker.
pub fn build_gateway(config: &DirectoryConfig, metrics: Arc<Metrics>) -> Result<Arc<dyn DirectoryGateway>> {
    let inner: Arc<dyn DirectoryGateway> = match &config.base_url {
        Some(url) => {
            tracing::info!(base_url = %url, "Using HTTP location directory");
            Arc::new(HttpDirectoryGateway::new(url.as_str()).context("Failed to build directory client")?)
        }
        None => {
            tracing::info!(
                groups = config.groups.len(),
                locations = config.locations.len(),
                "Using static location directory"
            );
            Arc::new(InMemoryDirectory::from_entries(config.groups.clone(), config.locations.clone()))
        }
    };

    let resilient = ResilientDirectoryGateway::new(
        inner,
        config.request_timeout(),
        config.retry.clone(),
        config.circuit_breaker.clone(),
    )
    .with_metrics(metrics);

    Ok(Arc::new(resilient))
}

pub async fn build_repository(config: &StoreConfig) -> Result<Arc<dyn TransportOrderRepository>> {
    let repository: Arc<dyn TransportOrderRepository> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryTransportOrderRepository::new()),
        StoreBackend::Scylla => Arc::new(
            ScyllaTransportOrderRepository::connect(&config.known_nodes, &config.keyspace)
                .await
                .context("Failed to connect to ScyllaDB")?,
        ),
    };

    for seed in &config.seed_orders {
        let target = TargetId::parse(&seed.target).with_context(|| format!("Seed order {} has a blank target", seed.id))?;
        let order = TransportOrder::new(seed.id, seed.transport_unit_bk.clone(), target);

        match repository.insert(&order).await {
            Ok(()) => tracing::info!(order_id = %order.id, "Seeded transport order"),
            Err(StoreError::Duplicate(id)) => tracing::debug!(order_id = %id, "Seed order already present"),
            Err(e) => return Err(e).context("Failed to seed transport order"),
        }
    }

    Ok(repository)
}

pub fn build_handler(
    config: &AppConfig,
    repository: Arc<dyn TransportOrderRepository>,
    gateway: Arc<dyn DirectoryGateway>,
    metrics: Arc<Metrics>,
) -> TransportOrderCommandHandler {
    TransportOrderCommandHandler::new(repository, TargetResolver::new(gateway))
        .with_max_conflict_retries(config.redirect.max_conflict_retries)
        .with_metrics(metrics)
}
