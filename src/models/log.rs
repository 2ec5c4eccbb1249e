//! Log record and ingestion models.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// One timestamped sub-event attached to a log record
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct LogEntry {
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Severity or category label (e.g. "INFO", "ERROR")
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-text detail
    pub message: String,
}

/// One ingested request/response summary, carrying at least one entry
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Opaque identifier for the request trace
    pub trace_id: String,
    /// HTTP method of the traced request
    pub method: String,
    /// Request path of the traced request
    pub endpoint: String,
    /// HTTP status code of the traced response
    pub status: u16,
    /// Duration of the traced request in milliseconds
    pub response_time_ms: f64,
    /// Ordered sub-entries; never empty once persisted
    pub entries: Vec<LogEntry>,
}

impl LogRecord {
    /// Latest entry timestamp, if the record has entries.
    pub fn latest_entry_timestamp(&self) -> Option<DateTime<Utc>> {
        self.entries.iter().map(|e| e.timestamp).max()
    }

    /// Whether the record's status counts as a success (200 or 304).
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 304)
    }

    /// Whether the record's status is an error status (4xx/5xx).
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.status)
    }
}

/// Request body for `POST /api/logs`
#[derive(Debug, Clone, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct IngestLogRequest {
    pub trace_id: String,
    pub method: String,
    pub endpoint: String,
    pub status: u16,
    pub response_time_ms: f64,
    /// Optional sub-entries; a single synthetic INFO entry is created when empty
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

impl From<IngestLogRequest> for LogRecord {
    /// Builds the record to persist, applying the single-synthetic-entry rule:
    /// a call without entries yields exactly one INFO entry stamped with the
    /// current time.
    fn from(req: IngestLogRequest) -> Self {
        let entries = if req.entries.is_empty() {
            vec![LogEntry {
                timestamp: Utc::now(),
                kind: "INFO".to_string(),
                message: "No details provided".to_string(),
            }]
        } else {
            req.entries
        };

        LogRecord {
            trace_id: req.trace_id,
            method: req.method,
            endpoint: req.endpoint,
            status: req.status,
            response_time_ms: req.response_time_ms,
            entries,
        }
    }
}
