//! Log ingestion and monthly analytics endpoint handlers.

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::models::{
    AnalysisResponse, ChartResponse, GroupedLogsResponse, IngestLogRequest, LogRecord, MonthQuery,
};
use crate::services::analytics::{
    ResolvedMonth, analyze_month, daily_uptime, group_logs_by_endpoint, parse_month_query,
    resolve_month,
};
use crate::services::auth::verify_api_key;
use crate::storage::Storage;
use actix_web::{HttpRequest, web};
use paperclip::actix::{CreatedJson, api_v2_operation};
use std::collections::BTreeMap;
use tracing::info;

/// Log ingestion endpoint
///
/// Persists one log record per call. A record submitted without entries
/// gets a single synthetic INFO entry stamped with the current time, so
/// every stored record carries at least one entry.
#[api_v2_operation(
    summary = "Ingest Log Record",
    description = "Appends one request/response log record to the store.",
    tags("Logs"),
    responses(
        (status = 201, description = "Log record created", body = LogRecord),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn post_logs(
    req: HttpRequest,
    auth: web::Data<AuthConfig>,
    storage: web::Data<Storage>,
    payload: web::Json<IngestLogRequest>,
) -> Result<CreatedJson<LogRecord>, ApiError> {
    verify_api_key(&req, &auth)?;

    let record = LogRecord::from(payload.into_inner());
    storage.insert_log(&record)?;

    info!(
        trace_id = %record.trace_id,
        endpoint = %record.endpoint,
        status = record.status,
        "log record appended"
    );

    Ok(CreatedJson(record))
}

/// Full log listing endpoint
///
/// Returns every stored record, most recent entry timestamp first; records
/// with equal timestamps keep insertion order.
#[api_v2_operation(
    summary = "List Log Records",
    description = "Returns all log records sorted by latest entry timestamp, descending.",
    tags("Logs"),
    responses(
        (status = 200, description = "All log records", body = Vec<LogRecord>),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_logs(storage: web::Data<Storage>) -> Result<web::Json<Vec<LogRecord>>, ApiError> {
    let mut records = storage.all_logs()?;
    records.sort_by(|a, b| b.latest_entry_timestamp().cmp(&a.latest_entry_timestamp()));

    Ok(web::Json(records))
}

/// Monthly grouped listing endpoint
///
/// Groups the resolved month's entries by base endpoint (first three path
/// segments). The resolved month may differ from the request when the
/// requested month holds no data.
#[api_v2_operation(
    summary = "Monthly Logs by Endpoint",
    description = "Returns the resolved month's entries grouped by base endpoint.",
    tags("Logs"),
    responses(
        (status = 200, description = "Grouped log entries", body = GroupedLogsResponse),
        (status = 400, description = "Invalid year or month"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_logs_time(
    storage: web::Data<Storage>,
    query: web::Query<MonthQuery>,
) -> Result<web::Json<GroupedLogsResponse>, ApiError> {
    let requested = parse_month_query(&query)?;
    let records = storage.all_logs()?;

    let response = match resolve_month(&records, requested) {
        ResolvedMonth::Month { year, month, .. } => GroupedLogsResponse {
            data: group_logs_by_endpoint(&records, year, month),
            year: Some(year),
            month: Some(month),
        },
        ResolvedMonth::Empty => GroupedLogsResponse {
            data: BTreeMap::new(),
            year: None,
            month: None,
        },
    };

    Ok(web::Json(response))
}

/// Monthly analysis endpoint
///
/// Aggregate statistics over the resolved month: request totals,
/// success/failure counts, uptime and error percentages, peak error
/// status, last error time and response-time totals.
#[api_v2_operation(
    summary = "Monthly Analysis",
    description = "Returns aggregate statistics for the resolved month.",
    tags("Logs"),
    responses(
        (status = 200, description = "Monthly aggregates", body = AnalysisResponse),
        (status = 400, description = "Invalid year or month"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_analysis(
    storage: web::Data<Storage>,
    query: web::Query<MonthQuery>,
) -> Result<web::Json<AnalysisResponse>, ApiError> {
    let requested = parse_month_query(&query)?;
    let records = storage.all_logs()?;

    let response = match resolve_month(&records, requested) {
        ResolvedMonth::Month {
            year,
            month,
            is_fallback,
        } => {
            let stats = analyze_month(&records, year, month);
            info!(
                year,
                month,
                is_fallback,
                total_requests = stats.total_requests,
                "monthly analysis computed"
            );
            AnalysisResponse::from_stats(stats, year, month, is_fallback)
        }
        ResolvedMonth::Empty => AnalysisResponse::empty(),
    };

    Ok(web::Json(response))
}

/// Per-day uptime chart endpoint
///
/// One point per calendar day of the resolved month; days without entries
/// report 0.
#[api_v2_operation(
    summary = "Monthly Uptime Chart",
    description = "Returns the per-day uptime series for the resolved month.",
    tags("Logs"),
    responses(
        (status = 200, description = "Per-day uptime series", body = ChartResponse),
        (status = 400, description = "Invalid year or month"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_uptime_chart(
    storage: web::Data<Storage>,
    query: web::Query<MonthQuery>,
) -> Result<web::Json<ChartResponse>, ApiError> {
    let requested = parse_month_query(&query)?;
    let records = storage.all_logs()?;

    let response = match resolve_month(&records, requested) {
        ResolvedMonth::Month {
            year,
            month,
            is_fallback,
        } => ChartResponse {
            data: daily_uptime(&records, year, month),
            year: Some(year),
            month: Some(month),
            is_fallback,
        },
        ResolvedMonth::Empty => ChartResponse {
            data: Vec::new(),
            year: None,
            month: None,
            is_fallback: false,
        },
    };

    Ok(web::Json(response))
}
