use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::status::EntityStatus;
use crate::timestamps::parse_upstream_timestamp;

/// A warehouse destination descriptor as returned by the upstream backend.
/// Credentials and HMAC keys are write-only and never present in reads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: i64,
    pub name: String,
    /// Currently always `"bigquery"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub project_id: String,
    pub dataset: String,
    pub bucket_name: String,
    #[serde(default)]
    pub folder_path: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for creating a destination.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DestinationCreate {
    pub name: String,
    pub project_id: String,
    pub dataset: String,
    /// Service-account credential blob, forwarded as an opaque JSON string.
    pub credentials: String,
    pub bucket_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    pub hmac_key: String,
    pub hmac_secret: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl DestinationCreate {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("project_id", &self.project_id),
            ("dataset", &self.dataset),
            ("credentials", &self.credentials),
            ("bucket_name", &self.bucket_name),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        Ok(())
    }
}

/// Payload for updating a destination. Unset fields are omitted from the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DestinationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmac_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl DestinationUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField("name".to_string()).into());
            }
        }
        Ok(())
    }
}

/// Probe payload for testing a BigQuery destination without saving it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TestDestinationConnection {
    pub project_id: String,
    pub dataset: String,
    pub credentials: String,
    pub bucket_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    pub hmac_key: String,
    pub hmac_secret: String,
}

/// The destination as rendered by the dashboard.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DestinationView {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub project_id: String,
    pub dataset: String,
    pub bucket_name: String,
    pub folder_path: Option<String>,
    pub status: EntityStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Destination> for DestinationView {
    fn from(destination: Destination) -> Self {
        DestinationView {
            id: destination.id.to_string(),
            name: destination.name,
            kind: destination.kind,
            project_id: destination.project_id,
            dataset: destination.dataset,
            bucket_name: destination.bucket_name,
            folder_path: destination.folder_path,
            status: EntityStatus::from(destination.is_active),
            created_at: destination
                .created_at
                .as_deref()
                .and_then(parse_upstream_timestamp),
            updated_at: destination
                .updated_at
                .as_deref()
                .and_then(parse_upstream_timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_type_field_round_trips() {
        let destination: Destination = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "analytics",
            "type": "bigquery",
            "project_id": "acme-prod",
            "dataset": "raw",
            "bucket_name": "acme-staging",
            "is_active": false
        }))
        .unwrap();
        assert_eq!(destination.kind, "bigquery");
        let value = serde_json::to_value(&destination).unwrap();
        assert_eq!(value["type"], "bigquery");

        let view = DestinationView::from(destination);
        assert_eq!(view.id, "3");
        assert_eq!(view.status, EntityStatus::Inactive);
    }

    #[test]
    fn create_requires_credentials() {
        let create = DestinationCreate {
            name: "analytics".to_string(),
            project_id: "acme-prod".to_string(),
            dataset: "raw".to_string(),
            credentials: "  ".to_string(),
            bucket_name: "acme-staging".to_string(),
            folder_path: None,
            hmac_key: "k".to_string(),
            hmac_secret: "s".to_string(),
            is_active: true,
        };
        assert!(create.validate().is_err());
    }

    #[test]
    fn create_defaults_to_active() {
        let create: DestinationCreate = serde_json::from_value(serde_json::json!({
            "name": "analytics",
            "project_id": "acme-prod",
            "dataset": "raw",
            "credentials": "{}",
            "bucket_name": "acme-staging",
            "hmac_key": "k",
            "hmac_secret": "s"
        }))
        .unwrap();
        assert!(create.is_active);
    }
}
