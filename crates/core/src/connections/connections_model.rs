use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ValidationError};
use crate::status::EntityStatus;
use crate::timestamps::parse_upstream_timestamp;

/// How a connection's runs are triggered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    #[default]
    Manual,
    Cron,
}

/// A source-to-destination pairing as returned by the upstream backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: i64,
    pub name: String,
    pub source_db_id: i64,
    pub source_db_name: String,
    pub destination_id: i64,
    pub destination_name: String,
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub cron_expression: Option<String>,
    pub timezone: String,
    pub is_active: bool,
    /// Opaque incremental-sync state owned by the upstream; relayed untouched.
    #[serde(default)]
    pub connection_state: Option<Value>,
    #[serde(default)]
    pub last_run_at: Option<String>,
    #[serde(default)]
    pub next_run_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for creating a connection.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConnectionCreate {
    pub name: String,
    pub source_db_id: i64,
    pub destination_id: i64,
    #[serde(default)]
    pub schedule_type: ScheduleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_state: Option<Value>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_active() -> bool {
    true
}

impl ConnectionCreate {
    /// Form-boundary validation. A manual schedule drops any stale cron
    /// expression rather than rejecting it.
    pub fn validate(&mut self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        match self.schedule_type {
            ScheduleType::Cron => match &self.cron_expression {
                Some(expr) => validate_cron_expression(expr)?,
                None => {
                    return Err(ValidationError::MissingField("cron_expression".to_string()).into())
                }
            },
            ScheduleType::Manual => self.cron_expression = None,
        }
        Ok(())
    }
}

/// Payload for updating a connection. Unset fields are omitted from the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ConnectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_db_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<ScheduleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_state: Option<Value>,
}

impl ConnectionUpdate {
    pub fn validate(&mut self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField("name".to_string()).into());
            }
        }
        match self.schedule_type {
            Some(ScheduleType::Cron) => {
                if let Some(expr) = &self.cron_expression {
                    validate_cron_expression(expr)?;
                }
            }
            Some(ScheduleType::Manual) => self.cron_expression = None,
            None => {}
        }
        Ok(())
    }
}

fn validate_cron_expression(expr: &str) -> Result<()> {
    if expr.split_whitespace().count() != 5 {
        return Err(ValidationError::InvalidInput(
            "cron expression must have 5 parts (minute, hour, day of month, month, day of week)"
                .to_string(),
        )
        .into());
    }
    Ok(())
}

/// The connection as rendered by the dashboard.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    pub id: String,
    pub name: String,
    pub source_id: String,
    pub source_name: String,
    pub destination_id: String,
    pub destination_name: String,
    pub schedule_type: ScheduleType,
    pub cron_expression: Option<String>,
    pub timezone: String,
    pub status: EntityStatus,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Connection> for ConnectionView {
    fn from(connection: Connection) -> Self {
        let parse = |raw: &Option<String>| raw.as_deref().and_then(parse_upstream_timestamp);
        ConnectionView {
            id: connection.id.to_string(),
            name: connection.name,
            source_id: connection.source_db_id.to_string(),
            source_name: connection.source_db_name,
            destination_id: connection.destination_id.to_string(),
            destination_name: connection.destination_name,
            schedule_type: connection.schedule_type,
            cron_expression: connection.cron_expression,
            timezone: connection.timezone,
            status: EntityStatus::from(connection.is_active),
            last_run_at: parse(&connection.last_run_at),
            next_run_at: parse(&connection.next_run_at),
            created_at: parse(&connection.created_at),
            updated_at: parse(&connection.updated_at),
        }
    }
}
