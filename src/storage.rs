//! SQLite-backed persistence for log records and control configuration.
//!
//! Two independent tables with no cross-references: an append-only `logs`
//! table and a `controls` table keyed by endpoint. Nested values (entries,
//! limit/schedule/toggle groups) are stored as JSON text columns.

use crate::models::{ControlConfig, LimitValues, LogRecord, ScheduleValues, Toggles};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use std::path::Path;
use thiserror::Error;

/// Failures surfaced by the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt stored record: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Handle to the embedded database; the only state shared between requests
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    /// Open (or create) the database at `path` and initialize the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                trace_id TEXT NOT NULL,
                method TEXT NOT NULL,
                endpoint TEXT NOT NULL,
                status INTEGER NOT NULL,
                response_time_ms REAL NOT NULL,
                entries TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS controls (
                endpoint TEXT PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                limit_values TEXT NOT NULL,
                schedule_values TEXT NOT NULL,
                toggles TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Append one log record. Records are immutable once written; there is
    /// no update or delete path.
    pub fn insert_log(&self, record: &LogRecord) -> Result<(), StoreError> {
        let entries = serde_json::to_string(&record.entries)?;
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO logs (trace_id, method, endpoint, status, response_time_ms, entries)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.trace_id,
                record.method,
                record.endpoint,
                record.status,
                record.response_time_ms,
                entries,
            ],
        )?;

        Ok(())
    }

    /// All log records in insertion order.
    pub fn all_logs(&self) -> Result<Vec<LogRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT trace_id, method, endpoint, status, response_time_ms, entries
             FROM logs ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u16>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (trace_id, method, endpoint, status, response_time_ms, entries) = row?;
            records.push(LogRecord {
                trace_id,
                method,
                endpoint,
                status,
                response_time_ms,
                entries: serde_json::from_str(&entries)?,
            });
        }

        Ok(records)
    }

    /// Insert or replace the control configuration for one endpoint.
    ///
    /// A single conditional insert keeps the upsert atomic: concurrent PUTs
    /// for the same endpoint serialize to one of the two payloads with no
    /// merge. The creation timestamp is never refreshed by updates.
    pub fn upsert_control(
        &self,
        endpoint: &str,
        limit_values: &LimitValues,
        schedule_values: &ScheduleValues,
        toggles: &Toggles,
    ) -> Result<ControlConfig, StoreError> {
        let limit_json = serde_json::to_string(limit_values)?;
        let schedule_json = serde_json::to_string(schedule_values)?;
        let toggles_json = serde_json::to_string(toggles)?;
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO controls (endpoint, timestamp, limit_values, schedule_values, toggles)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(endpoint) DO UPDATE SET
                limit_values = excluded.limit_values,
                schedule_values = excluded.schedule_values,
                toggles = excluded.toggles",
            params![
                endpoint,
                Utc::now().timestamp_millis(),
                limit_json,
                schedule_json,
                toggles_json,
            ],
        )?;

        let row = conn.query_row(
            "SELECT endpoint, timestamp, limit_values, schedule_values, toggles
             FROM controls WHERE endpoint = ?1",
            params![endpoint],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )?;

        control_from_row(row)
    }

    /// All control configurations ordered by creation timestamp ascending.
    pub fn all_controls(&self) -> Result<Vec<ControlConfig>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT endpoint, timestamp, limit_values, schedule_values, toggles
             FROM controls ORDER BY timestamp ASC, rowid ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut controls = Vec::new();
        for row in rows {
            controls.push(control_from_row(row?)?);
        }

        Ok(controls)
    }
}

fn control_from_row(
    (endpoint, timestamp_ms, limit_json, schedule_json, toggles_json): (
        String,
        i64,
        String,
        String,
        String,
    ),
) -> Result<ControlConfig, StoreError> {
    Ok(ControlConfig {
        endpoint,
        timestamp: DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_else(Utc::now),
        limit_values: serde_json::from_str(&limit_json)?,
        schedule_values: serde_json::from_str(&schedule_json)?,
        toggles: serde_json::from_str(&toggles_json)?,
    })
}
