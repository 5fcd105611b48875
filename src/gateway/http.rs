use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::{DirectoryGateway, GatewayError};
use crate::domain::location::{Location, LocationGroup, TargetId};

const LOCATION_GROUPS_PATH: &str = "/v1/location-groups";
const LOCATIONS_PATH: &str = "/v1/locations";

/// Directory client speaking the directory service's REST API.
///
/// Timeouts and retries are not handled here; wrap it in
/// [`super::ResilientDirectoryGateway`].
pub struct HttpDirectoryGateway {
    client: Client,
    base_url: String,
}

impl HttpDirectoryGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        target: &TargetId,
    ) -> Result<Option<T>, GatewayError> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(url = %url, target_id = %target, "Querying location directory");

        let response = self
            .client
            .get(&url)
            .query(&[(key, target.as_str())])
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DirectoryGateway for HttpDirectoryGateway {
    async fn get_location_group(&self, target: &TargetId) -> Result<Option<LocationGroup>, GatewayError> {
        self.fetch(LOCATION_GROUPS_PATH, "name", target).await
    }

    async fn get_location(&self, target: &TargetId) -> Result<Option<Location>, GatewayError> {
        self.fetch(LOCATIONS_PATH, "locationId", target).await
    }
}
