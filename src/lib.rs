//! Tracer API - log ingestion and monthly analytics over request traces
//!
//! A small HTTP service that ingests structured request/response log
//! records from a client application, persists them in an embedded store,
//! and serves aggregate analytics (success/failure counts, uptime
//! percentage, per-day series, grouped-by-endpoint views) over an explicit
//! or inferred calendar month. It also keeps a mutable per-endpoint
//! control configuration with upsert semantics.
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Persisted records and request/response models
//! - `handlers/` - HTTP request handlers for each endpoint
//! - `services/` - Credential checking and the analytics engine
//! - `storage` - SQLite-backed persistence for both collections
//! - `config/` - Configuration structures and environment loading
//! - `error` - Request failure taxonomy

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod storage;

// Re-export commonly used types and functions for convenience
pub use config::{AuthConfig, ServerConfig};
pub use error::ApiError;
pub use handlers::{
    create_app, create_openapi_spec, get_analysis, get_controls, get_logs, get_logs_time,
    get_uptime_chart, health, post_logs, put_control,
};
pub use models::{
    AnalysisResponse, ChartResponse, ControlConfig, DayUptime, GroupedLogLine,
    GroupedLogsResponse, HealthResponse, IngestLogRequest, LimitValues, LogEntry, LogRecord,
    MonthQuery, MonthlyStats, ScheduleValues, StatusCount, Toggles, UpsertControlRequest,
};
pub use services::{
    API_KEY_HEADER, ApiKeyClaims, ResolvedMonth, analyze_month, base_endpoint, daily_uptime,
    generate_api_key, group_logs_by_endpoint, month_range, parse_month_query, resolve_month,
    verify_api_key,
};
pub use storage::{Storage, StoreError};
