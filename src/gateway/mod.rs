// ============================================================================
// Location Directory Gateway
// ============================================================================
//
// The directory owns Locations and LocationGroups. This module defines the
// capability the redirect engine consumes plus the adapters that provide it:
//
// - `HttpDirectoryGateway`: talks to the directory service over HTTP
// - `InMemoryDirectory`: static directory for tests and offline runs
// - `ResilientDirectoryGateway`: timeout + retry + circuit breaker decorator
//
// ============================================================================

mod errors;
mod http;
mod memory;
mod resilient;

use async_trait::async_trait;

use crate::domain::location::{Location, LocationGroup, TargetId};

pub use errors::GatewayError;
pub use http::HttpDirectoryGateway;
pub use memory::InMemoryDirectory;
pub use resilient::ResilientDirectoryGateway;

pub const GET_LOCATION_GROUP: &str = "get_location_group";
pub const GET_LOCATION: &str = "get_location";

/// Read-only, idempotent lookups against the location directory.
///
/// `Ok(None)` means the directory answered and knows nothing under that name.
/// Transport trouble is always an `Err`, never `Ok(None)`.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    async fn get_location_group(&self, target: &TargetId) -> Result<Option<LocationGroup>, GatewayError>;

    async fn get_location(&self, target: &TargetId) -> Result<Option<Location>, GatewayError>;
}
