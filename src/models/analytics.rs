//! Analytics query parameters, intermediate statistics, and response models.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query parameters shared by the monthly analytics endpoints
///
/// Values are accepted as raw strings so that non-numeric input can be
/// rejected with a validation error instead of a framework-level failure.
#[derive(Debug, Clone, Deserialize, Apiv2Schema)]
pub struct MonthQuery {
    /// Calendar year, e.g. "2025"
    pub year: Option<String>,
    /// Calendar month 1-12
    pub month: Option<String>,
}

/// An error status code and how many records carried it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct StatusCount {
    pub status: u16,
    pub count: u64,
}

/// Aggregates computed over one resolved month (internal shape)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyStats {
    pub total_requests: u64,
    pub success: u64,
    pub fail: u64,
    pub uptime_percent: f64,
    pub error_percent: f64,
    pub max_error_status: Option<StatusCount>,
    pub last_error_timestamp: Option<DateTime<Utc>>,
    pub total_response_time: f64,
    pub avg_response_time: f64,
}

/// Response body for `GET /api/logs/analysis`
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// Resolved year; null when no data exists anywhere
    pub year: Option<i32>,
    /// Resolved month; null when no data exists anywhere
    pub month: Option<u32>,
    pub total_requests: u64,
    pub success: u64,
    pub fail: u64,
    pub uptime_percent: f64,
    pub error_percent: f64,
    pub max_error_status: Option<StatusCount>,
    pub last_error_timestamp: Option<DateTime<Utc>>,
    pub total_response_time: f64,
    pub avg_response_time: f64,
    /// True when the requested month had no data and the latest month
    /// with data was substituted
    pub is_fallback: bool,
}

impl AnalysisResponse {
    pub fn from_stats(stats: MonthlyStats, year: i32, month: u32, is_fallback: bool) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            total_requests: stats.total_requests,
            success: stats.success,
            fail: stats.fail,
            uptime_percent: stats.uptime_percent,
            error_percent: stats.error_percent,
            max_error_status: stats.max_error_status,
            last_error_timestamp: stats.last_error_timestamp,
            total_response_time: stats.total_response_time,
            avg_response_time: stats.avg_response_time,
            is_fallback,
        }
    }

    /// The explicit "no data anywhere" result: null month, zeroed aggregates.
    pub fn empty() -> Self {
        Self {
            year: None,
            month: None,
            total_requests: 0,
            success: 0,
            fail: 0,
            uptime_percent: 0.0,
            error_percent: 0.0,
            max_error_status: None,
            last_error_timestamp: None,
            total_response_time: 0.0,
            avg_response_time: 0.0,
            is_fallback: false,
        }
    }
}

/// Uptime percentage for one calendar day of the resolved month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct DayUptime {
    /// Midnight UTC of the day
    pub date: DateTime<Utc>,
    /// success / total * 100 over the day's entries; 0 for empty days
    pub uptime_percent: f64,
}

/// Response body for `GET /api/logs/chart`
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    /// One point per calendar day of the resolved month, ascending
    pub data: Vec<DayUptime>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub is_fallback: bool,
}

/// One in-range entry flattened with its owning record's request fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct GroupedLogLine {
    pub trace_id: String,
    pub method: String,
    pub endpoint: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

/// Response body for `GET /api/logs/time`: in-range entries grouped by
/// base endpoint, keyed ascending
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct GroupedLogsResponse {
    pub data: BTreeMap<String, Vec<GroupedLogLine>>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}
