// ============================================================================
// Transport Order Storage
// ============================================================================
//
// `save` is a compare-and-set on `version`: it only writes when the stored
// version equals `expected_version`, and bumps it by one. Every writer of a
// transport order goes through it, so concurrent redirects cannot silently
// overwrite each other.
//
// ============================================================================

mod memory;
mod scylla_store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::transport_order::TransportOrder;

pub use self::memory::InMemoryTransportOrderRepository;
pub use self::scylla_store::ScyllaTransportOrderRepository;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: i64, actual: i64 },

    #[error("Transport order {0} already exists")]
    Duplicate(Uuid),

    #[error("Transport order {0} does not exist")]
    Missing(Uuid),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Corrupt transport order record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait TransportOrderRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<TransportOrder>, StoreError>;

    /// Store a new order as-is. Fails with `Duplicate` if the id is taken.
    async fn insert(&self, order: &TransportOrder) -> Result<(), StoreError>;

    /// Replace the stored order if its version still equals
    /// `expected_version`. Returns the new version.
    async fn save(&self, order: &TransportOrder, expected_version: i64) -> Result<i64, StoreError>;
}
