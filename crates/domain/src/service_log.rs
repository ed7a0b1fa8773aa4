use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::page::Listed;

/// Kind of event recorded for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLogEventType {
    /// The instance moved between statuses.
    StatusChange,
    /// The instance reported a failure.
    Failure,
    /// An event kind this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl ServiceLogEventType {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusChange => "status_change",
            Self::Failure => "failure",
            Self::Unknown => "unknown",
        }
    }
}

/// Server-issued service log entry for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLog {
    /// Stable entry identifier.
    pub id: String,
    /// Instance the event belongs to.
    pub instance_name: String,
    /// Namespace of the instance.
    pub namespace: String,
    /// Event kind.
    pub event_type: ServiceLogEventType,
    /// Previous status for status changes.
    #[serde(default)]
    pub from_status: Option<String>,
    /// Status after the event.
    pub to_status: String,
    /// Human-readable summary.
    pub message: String,
    /// Extra diagnostic detail.
    #[serde(default)]
    pub details: Option<String>,
    /// Time the event was observed.
    pub timestamp: DateTime<Utc>,
}

impl Listed for ServiceLog {
    const COLLECTION_KEY: &'static str = "service_logs";
}

#[cfg(test)]
mod tests {
    use super::{ServiceLog, ServiceLogEventType};

    #[test]
    fn decodes_status_change() {
        let entry = serde_json::from_str::<ServiceLog>(
            r#"{
                "id": "1",
                "instance_name": "cache-1",
                "namespace": "team-a",
                "event_type": "status_change",
                "from_status": "Pending",
                "to_status": "Running",
                "message": "instance is running",
                "timestamp": "2025-03-01T10:15:00Z"
            }"#,
        );

        assert!(entry.is_ok_and(|entry| {
            entry.event_type == ServiceLogEventType::StatusChange
                && entry.from_status.as_deref() == Some("Pending")
                && entry.details.is_none()
        }));
    }

    #[test]
    fn unrecognized_event_type_is_kept_as_unknown() {
        let entry = serde_json::from_str::<ServiceLog>(
            r#"{"id":"1","instance_name":"c","namespace":"n","event_type":"reboot",
                "to_status":"Running","message":"m","timestamp":"2025-03-01T10:15:00Z"}"#,
        );
        assert!(entry.is_ok_and(|entry| entry.event_type == ServiceLogEventType::Unknown));
    }

    #[test]
    fn page_with_one_new_event_kind_still_decodes() {
        let body = br#"{
            "service_logs": [
                {"id": "1", "instance_name": "cache-1", "namespace": "team-a",
                 "event_type": "failure", "to_status": "Failed", "message": "down",
                 "timestamp": "2025-03-01T10:15:00Z"},
                {"id": "2", "instance_name": "cache-1", "namespace": "team-a",
                 "event_type": "scaled", "to_status": "Running", "message": "scaled to 5",
                 "timestamp": "2025-03-01T10:16:00Z"}
            ],
            "count": 2, "total": 2, "page": 1
        }"#;

        let page = crate::Page::<ServiceLog>::from_json_slice(body);

        assert!(page.is_ok_and(|page| {
            page.items()[0].event_type == ServiceLogEventType::Failure
                && page.items()[1].event_type == ServiceLogEventType::Unknown
        }));
    }
}
