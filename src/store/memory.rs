use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TransportOrderRepository};
use crate::domain::transport_order::TransportOrder;

#[derive(Default)]
pub struct InMemoryTransportOrderRepository {
    orders: RwLock<HashMap<Uuid, TransportOrder>>,
}

impl InMemoryTransportOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransportOrderRepository for InMemoryTransportOrderRepository {
    async fn find(&self, id: Uuid) -> Result<Option<TransportOrder>, StoreError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn insert(&self, order: &TransportOrder) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::Duplicate(order.id));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn save(&self, order: &TransportOrder, expected_version: i64) -> Result<i64, StoreError> {
        let mut orders = self.orders.write().await;
        let stored = orders.get_mut(&order.id).ok_or(StoreError::Missing(order.id))?;

        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: stored.version,
            });
        }

        let new_version = expected_version + 1;
        *stored = TransportOrder {
            version: new_version,
            ..order.clone()
        };

        tracing::debug!(order_id = %order.id, new_version = new_version, "Saved transport order");
        Ok(new_version)
    }
}
