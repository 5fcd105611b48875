use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::response::query_result::QueryResult;
use scylla::value::{CqlValue, Row};
use uuid::Uuid;

use super::{StoreError, TransportOrderRepository};
use crate::domain::location::TargetId;
use crate::domain::transport_order::{TransportOrder, TransportOrderState};

// ============================================================================
// ScyllaDB Transport Order Repository
// ============================================================================
//
// One row per order. Writes are lightweight transactions:
// - insert: INSERT ... IF NOT EXISTS
// - save:   UPDATE ... IF version = ?
// The first result column is `[applied]`; on a failed condition Scylla also
// returns the current `version` (null when the row does not exist).
//
// ============================================================================

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS transport_orders (
    id uuid PRIMARY KEY,
    version bigint,
    transport_unit_bk text,
    target text,
    state text,
    created_at timestamp,
    updated_at timestamp
)";

const SELECT_ORDER: &str = "SELECT id, version, transport_unit_bk, target, state, created_at, updated_at
     FROM transport_orders WHERE id = ?";

const INSERT_ORDER: &str = "INSERT INTO transport_orders (
        id, version, transport_unit_bk, target, state, created_at, updated_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?) IF NOT EXISTS";

const UPDATE_ORDER: &str = "UPDATE transport_orders
     SET target = ?, state = ?, version = ?, updated_at = ?
     WHERE id = ? IF version = ?";

type OrderRow = (Uuid, i64, String, String, String, DateTime<Utc>, DateTime<Utc>);

pub struct ScyllaTransportOrderRepository {
    session: Arc<Session>,
}

impl ScyllaTransportOrderRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Connect, create keyspace and table if needed
    pub async fn connect(known_nodes: &[String], keyspace: &str) -> Result<Self, StoreError> {
        validate_keyspace(keyspace)?;

        tracing::info!(nodes = ?known_nodes, keyspace = keyspace, "Connecting to ScyllaDB");
        let session: Session = SessionBuilder::new()
            .known_nodes(known_nodes)
            .build()
            .await
            .map_err(backend)?;

        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
                     {{'class': 'SimpleStrategy', 'replication_factor': 1}}",
                    keyspace
                ),
                (),
            )
            .await
            .map_err(backend)?;

        session.use_keyspace(keyspace, false).await.map_err(backend)?;
        session.query_unpaged(CREATE_TABLE, ()).await.map_err(backend)?;

        Ok(Self::new(Arc::new(session)))
    }
}

#[async_trait]
impl TransportOrderRepository for ScyllaTransportOrderRepository {
    async fn find(&self, id: Uuid) -> Result<Option<TransportOrder>, StoreError> {
        let result = self.session.query_unpaged(SELECT_ORDER, (id,)).await.map_err(backend)?;
        let rows = result.into_rows_result().map_err(backend)?;

        match rows.maybe_first_row::<OrderRow>().map_err(backend)? {
            Some(row) => order_from_row(row).map(Some),
            None => Ok(None),
        }
    }

    async fn insert(&self, order: &TransportOrder) -> Result<(), StoreError> {
        let result = self
            .session
            .query_unpaged(
                INSERT_ORDER,
                (
                    order.id,
                    order.version,
                    order.transport_unit_bk.as_str(),
                    order.target.as_str(),
                    order.state.as_str(),
                    order.created_at,
                    order.updated_at,
                ),
            )
            .await
            .map_err(backend)?;

        let row = lwt_row(result)?;
        if !applied(&row)? {
            return Err(StoreError::Duplicate(order.id));
        }

        tracing::debug!(order_id = %order.id, "Inserted transport order");
        Ok(())
    }

    async fn save(&self, order: &TransportOrder, expected_version: i64) -> Result<i64, StoreError> {
        let new_version = expected_version + 1;

        let result = self
            .session
            .query_unpaged(
                UPDATE_ORDER,
                (
                    order.target.as_str(),
                    order.state.as_str(),
                    new_version,
                    order.updated_at,
                    order.id,
                    expected_version,
                ),
            )
            .await
            .map_err(backend)?;

        let row = lwt_row(result)?;
        if applied(&row)? {
            tracing::debug!(order_id = %order.id, new_version = new_version, "Saved transport order");
            return Ok(new_version);
        }

        match current_version(&row) {
            Some(actual) => Err(StoreError::VersionConflict {
                expected: expected_version,
                actual,
            }),
            None => Err(StoreError::Missing(order.id)),
        }
    }
}

fn backend(err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Keyspace names are interpolated into CQL, so only plain identifiers pass
fn validate_keyspace(keyspace: &str) -> Result<(), StoreError> {
    let valid = !keyspace.is_empty()
        && keyspace.len() <= 48
        && keyspace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && keyspace.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

    if valid {
        Ok(())
    } else {
        Err(StoreError::Backend(format!("invalid keyspace name: {:?}", keyspace)))
    }
}

fn order_from_row(row: OrderRow) -> Result<TransportOrder, StoreError> {
    let (id, version, transport_unit_bk, target, state, created_at, updated_at) = row;

    let target = TargetId::parse(&target)
        .map_err(|_| StoreError::Corrupt(format!("order {} has a blank target", id)))?;
    let state = TransportOrderState::parse(&state)
        .ok_or_else(|| StoreError::Corrupt(format!("order {} has unknown state {:?}", id, state)))?;

    Ok(TransportOrder {
        id,
        version,
        transport_unit_bk,
        target,
        state,
        created_at,
        updated_at,
    })
}

fn lwt_row(result: QueryResult) -> Result<Row, StoreError> {
    result
        .into_rows_result()
        .map_err(backend)?
        .maybe_first_row::<Row>()
        .map_err(backend)?
        .ok_or_else(|| StoreError::Corrupt("empty lightweight transaction result".to_string()))
}

fn applied(row: &Row) -> Result<bool, StoreError> {
    match row.columns.first() {
        Some(Some(CqlValue::Boolean(applied))) => Ok(*applied),
        other => Err(StoreError::Corrupt(format!("unexpected [applied] column: {:?}", other))),
    }
}

fn current_version(row: &Row) -> Option<i64> {
    row.columns.iter().skip(1).find_map(|column| match column {
        Some(CqlValue::BigInt(version)) => Some(*version),
        _ => None,
    })
}
