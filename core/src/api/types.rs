use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Entity identifier as issued by the management server.
///
/// Decodes from a JSON string or integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => EntityId(id),
            RawId::Number(id) => EntityId(id.to_string()),
        })
    }
}

/// One row of the recent activity list.
///
/// All five keys must be present. The server sends `null` for the entity name of tasks not
/// tied to an entity and for the end time of tasks still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(deserialize_with = "present_or_null")]
    pub entity_display_name: Option<String>,
    pub display_name: String,
    pub submit_time_utc: String,
    #[serde(deserialize_with = "present_or_null")]
    pub end_time_utc: Option<String>,
    pub current_status: String,
}

// Unlike a bare `Option`, a missing key is still an error.
fn present_or_null<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// `[entityId, displayName]` pair of a breadcrumb path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(EntityId, String)", into = "(EntityId, String)")]
pub struct BreadcrumbEntry {
    pub id: EntityId,
    pub display_name: String,
}

impl BreadcrumbEntry {
    pub fn new(id: impl Into<EntityId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl From<(EntityId, String)> for BreadcrumbEntry {
    fn from((id, display_name): (EntityId, String)) -> Self {
        Self { id, display_name }
    }
}

impl From<BreadcrumbEntry> for (EntityId, String) {
    fn from(entry: BreadcrumbEntry) -> Self {
        (entry.id, entry.display_name)
    }
}
