use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::transport_order::RedirectError;

// ============================================================================
// Location Directory Value Objects
// ============================================================================
//
// Read-only views of entities owned by the external location directory.
//
// ============================================================================

/// Opaque name of a Location or a LocationGroup. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetId(String);

impl TargetId {
    pub fn parse(raw: &str) -> Result<Self, RedirectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RedirectError::InvalidTarget);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TargetId {
    type Error = RedirectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TargetId> for String {
    fn from(value: TargetId) -> Self {
        value.0
    }
}

/// Which namespace a target was resolved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Location,
    LocationGroup,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Location => "location",
            TargetKind::LocationGroup => "location_group",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "locationId")]
    pub id: String,
    #[serde(default = "active_by_default")]
    pub incoming_active: bool,
    #[serde(default = "active_by_default")]
    pub outgoing_active: bool,
    #[serde(default)]
    pub location_group_name: Option<String>,
}

impl Location {
    pub fn new(id: impl Into<String>, incoming_active: bool) -> Self {
        Self {
            id: id.into(),
            incoming_active,
            outgoing_active: true,
            location_group_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationGroup {
    pub name: String,
    #[serde(default = "active_by_default")]
    pub incoming_active: bool,
    #[serde(default = "active_by_default")]
    pub outgoing_active: bool,
    #[serde(default)]
    pub parent: Option<String>,
}

impl LocationGroup {
    pub fn new(name: impl Into<String>, incoming_active: bool) -> Self {
        Self {
            name: name.into(),
            incoming_active,
            outgoing_active: true,
            parent: None,
        }
    }
}
