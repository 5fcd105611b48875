use std::sync::Arc;

use futures_util::future::try_join;

use crate::domain::location::{Location, LocationGroup, TargetId, TargetKind};
use crate::gateway::{DirectoryGateway, GatewayError};

/// What a target identifier denotes right now
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTarget {
    Unresolved,
    ResolvedAsGroup(LocationGroup),
    ResolvedAsLocation(Location),
}

impl ResolvedTarget {
    /// Group wins over a location registered under the same name
    pub fn from_lookups(group: Option<LocationGroup>, location: Option<Location>) -> Self {
        match (group, location) {
            (Some(group), _) => ResolvedTarget::ResolvedAsGroup(group),
            (None, Some(location)) => ResolvedTarget::ResolvedAsLocation(location),
            (None, None) => ResolvedTarget::Unresolved,
        }
    }

    pub fn kind(&self) -> Option<TargetKind> {
        match self {
            ResolvedTarget::Unresolved => None,
            ResolvedTarget::ResolvedAsGroup(_) => Some(TargetKind::LocationGroup),
            ResolvedTarget::ResolvedAsLocation(_) => Some(TargetKind::Location),
        }
    }
}

pub struct TargetResolver {
    gateway: Arc<dyn DirectoryGateway>,
}

impl TargetResolver {
    pub fn new(gateway: Arc<dyn DirectoryGateway>) -> Self {
        Self { gateway }
    }

    /// Look the identifier up as group and as location, concurrently.
    ///
    /// Gateway failures are returned as errors; only a successful "nothing
    /// found" from both lookups yields [`ResolvedTarget::Unresolved`].
    pub async fn resolve(&self, target: &TargetId) -> Result<ResolvedTarget, GatewayError> {
        let (group, location) = try_join(
            self.gateway.get_location_group(target),
            self.gateway.get_location(target),
        )
        .await?;

        tracing::debug!(
            target_id = %target,
            group_found = group.is_some(),
            location_found = location.is_some(),
            "Resolved redirect target"
        );

        Ok(ResolvedTarget::from_lookups(group, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryDirectory;
    use async_trait::async_trait;

    struct BrokenLocationLookup;

    #[async_trait]
    impl DirectoryGateway for BrokenLocationLookup {
        async fn get_location_group(&self, _target: &TargetId) -> Result<Option<LocationGroup>, GatewayError> {
            Ok(None)
        }

        async fn get_location(&self, _target: &TargetId) -> Result<Option<Location>, GatewayError> {
            Err(GatewayError::Timeout { operation: "get_location", timeout_ms: 100 })
        }
    }

    fn target(raw: &str) -> TargetId {
        TargetId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_resolves_location_when_no_group() {
        let directory = InMemoryDirectory::from_entries(vec![], vec![Location::new("UNKNOWN", true)]);
        let resolver = TargetResolver::new(Arc::new(directory));

        let resolved = resolver.resolve(&target("UNKNOWN")).await.unwrap();

        assert_eq!(resolved, ResolvedTarget::ResolvedAsLocation(Location::new("UNKNOWN", true)));
        assert_eq!(resolved.kind(), Some(TargetKind::Location));
    }

    #[tokio::test]
    async fn test_resolves_group_when_no_location() {
        let directory = InMemoryDirectory::from_entries(vec![LocationGroup::new("UNKNOWN", true)], vec![]);
        let resolver = TargetResolver::new(Arc::new(directory));

        let resolved = resolver.resolve(&target("UNKNOWN")).await.unwrap();

        assert_eq!(resolved.kind(), Some(TargetKind::LocationGroup));
    }

    #[tokio::test]
    async fn test_group_shadows_location_with_same_name() {
        let directory = InMemoryDirectory::from_entries(
            vec![LocationGroup::new("ZILE", true)],
            vec![Location::new("ZILE", false)],
        );
        let resolver = TargetResolver::new(Arc::new(directory));

        let resolved = resolver.resolve(&target("ZILE")).await.unwrap();

        assert_eq!(resolved, ResolvedTarget::ResolvedAsGroup(LocationGroup::new("ZILE", true)));
    }

    #[tokio::test]
    async fn test_unknown_target_is_unresolved() {
        let resolver = TargetResolver::new(Arc::new(InMemoryDirectory::new()));

        let resolved = resolver.resolve(&target("NOWHERE")).await.unwrap();

        assert_eq!(resolved, ResolvedTarget::Unresolved);
        assert_eq!(resolved.kind(), None);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_not_unresolved() {
        let resolver = TargetResolver::new(Arc::new(BrokenLocationLookup));

        let result = resolver.resolve(&target("FGIN0001")).await;

        assert!(matches!(result, Err(GatewayError::Timeout { .. })));
    }
}
