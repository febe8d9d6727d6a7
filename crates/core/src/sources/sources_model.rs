use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::status::EntityStatus;
use crate::timestamps::parse_upstream_timestamp;

/// A source database descriptor as returned by the upstream backend.
/// The password is write-only and never present in reads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for creating a source.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SourceCreate {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl SourceCreate {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("host", &self.host),
            ("database", &self.database),
            ("user", &self.user),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        validate_port(self.port)?;
        Ok(())
    }
}

/// Payload for updating a source. Unset fields are omitted from the wire so
/// the upstream only touches what was provided.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SourceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl SourceUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField("name".to_string()).into());
            }
        }
        if let Some(port) = self.port {
            validate_port(port)?;
        }
        Ok(())
    }
}

/// Probe payload for testing a source connection without saving it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TestSourceConnection {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

fn validate_port(port: u16) -> Result<()> {
    if port == 0 {
        return Err(ValidationError::InvalidInput("port must be between 1 and 65535".to_string()).into());
    }
    Ok(())
}

/// The source as rendered by the dashboard: opaque string id, status derived
/// from the active flag, parsed timestamps.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceView {
    pub id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub status: EntityStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Source> for SourceView {
    fn from(source: Source) -> Self {
        SourceView {
            id: source.id.to_string(),
            name: source.name,
            host: source.host,
            port: source.port,
            database: source.database,
            user: source.user,
            status: EntityStatus::from(source.is_active),
            created_at: source.created_at.as_deref().and_then(parse_upstream_timestamp),
            updated_at: source.updated_at.as_deref().and_then(parse_upstream_timestamp),
        }
    }
}
