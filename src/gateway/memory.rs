use std::collections::HashMap;

use async_trait::async_trait;

use super::{DirectoryGateway, GatewayError};
use crate::domain::location::{Location, LocationGroup, TargetId};

/// Directory held in process memory, fixed at construction
#[derive(Default)]
pub struct InMemoryDirectory {
    groups: HashMap<String, LocationGroup>,
    locations: HashMap<String, Location>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(groups: Vec<LocationGroup>, locations: Vec<Location>) -> Self {
        Self {
            groups: groups.into_iter().map(|g| (g.name.clone(), g)).collect(),
            locations: locations.into_iter().map(|l| (l.id.clone(), l)).collect(),
        }
    }
}

#[async_trait]
impl DirectoryGateway for InMemoryDirectory {
    async fn get_location_group(&self, target: &TargetId) -> Result<Option<LocationGroup>, GatewayError> {
        Ok(self.groups.get(target.as_str()).cloned())
    }

    async fn get_location(&self, target: &TargetId) -> Result<Option<Location>, GatewayError> {
        Ok(self.locations.get(target.as_str()).cloned())
    }
}
