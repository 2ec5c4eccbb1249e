//! Monthly analytics over the log store.
//!
//! This is the heart of the service: deciding which calendar month a read
//! request reports on (explicit, or fall back to the latest month with
//! data) and computing the derived statistics over that month. All
//! aggregation is explicit in-memory logic over the full record sequence;
//! month windows are half-open `[first-of-month, first-of-next-month)` in
//! UTC.

use crate::error::ApiError;
use crate::models::{
    DayUptime, GroupedLogLine, LogRecord, MonthQuery, MonthlyStats, StatusCount,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;

/// The calendar month a read request reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedMonth {
    Month {
        year: i32,
        month: u32,
        /// True when the requested month had no data and the latest month
        /// containing any entry was substituted
        is_fallback: bool,
    },
    /// No entry exists anywhere; reads report empty aggregates, not errors
    Empty,
}

/// Parse the optional `year`/`month` query parameters.
///
/// Both supplied and numeric yields a requested month; a supplied value
/// that does not parse, a month outside 1-12, or a date chrono cannot
/// represent is a validation error. Absent values mean "latest month with
/// data".
pub fn parse_month_query(query: &MonthQuery) -> Result<Option<(i32, u32)>, ApiError> {
    let invalid = || ApiError::Validation("invalid year or month".to_string());

    let year = query
        .year
        .as_deref()
        .map(|y| y.trim().parse::<i32>().map_err(|_| invalid()))
        .transpose()?;
    let month = query
        .month
        .as_deref()
        .map(|m| m.trim().parse::<u32>().map_err(|_| invalid()))
        .transpose()?;

    match (year, month) {
        (Some(year), Some(month)) => {
            if !(1..=12).contains(&month) || month_range(year, month).is_none() {
                return Err(invalid());
            }
            Ok(Some((year, month)))
        }
        _ => Ok(None),
    }
}

/// Resolve the reporting month for a request.
pub fn resolve_month(records: &[LogRecord], requested: Option<(i32, u32)>) -> ResolvedMonth {
    if let Some((year, month)) = requested {
        if month_has_entries(records, year, month) {
            return ResolvedMonth::Month {
                year,
                month,
                is_fallback: false,
            };
        }
        return match latest_month(records) {
            Some((year, month)) => ResolvedMonth::Month {
                year,
                month,
                is_fallback: true,
            },
            None => ResolvedMonth::Empty,
        };
    }

    match latest_month(records) {
        Some((year, month)) => ResolvedMonth::Month {
            year,
            month,
            is_fallback: false,
        },
        None => ResolvedMonth::Empty,
    }
}

/// Half-open UTC window `[first-of-month, first-of-next-month)`.
pub fn month_range(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// Calendar year/month of the single latest entry across all records.
fn latest_month(records: &[LogRecord]) -> Option<(i32, u32)> {
    records
        .iter()
        .filter_map(LogRecord::latest_entry_timestamp)
        .max()
        .map(|ts| (ts.year(), ts.month()))
}

fn month_has_entries(records: &[LogRecord], year: i32, month: u32) -> bool {
    let Some((start, end)) = month_range(year, month) else {
        return false;
    };
    records.iter().any(|record| {
        record
            .entries
            .iter()
            .any(|e| e.timestamp >= start && e.timestamp < end)
    })
}

/// Aggregate statistics over the resolved month.
///
/// A record participates when at least one of its entries falls inside the
/// window; success and fail partition participating records by status in
/// {200, 304}.
pub fn analyze_month(records: &[LogRecord], year: i32, month: u32) -> MonthlyStats {
    let Some((start, end)) = month_range(year, month) else {
        return MonthlyStats::default();
    };

    let mut stats = MonthlyStats::default();
    let mut error_counts: BTreeMap<u16, u64> = BTreeMap::new();

    for record in records {
        let latest_in_range = record
            .entries
            .iter()
            .map(|e| e.timestamp)
            .filter(|ts| *ts >= start && *ts < end)
            .max();
        let Some(latest_in_range) = latest_in_range else {
            continue;
        };

        stats.total_requests += 1;
        stats.total_response_time += record.response_time_ms;
        if record.is_success() {
            stats.success += 1;
        } else {
            stats.fail += 1;
        }

        if record.is_error() {
            *error_counts.entry(record.status).or_insert(0) += 1;
            if stats.last_error_timestamp.is_none_or(|ts| latest_in_range > ts) {
                stats.last_error_timestamp = Some(latest_in_range);
            }
        }
    }

    if stats.total_requests > 0 {
        let total = stats.total_requests as f64;
        stats.uptime_percent = stats.success as f64 / total * 100.0;
        stats.error_percent = stats.fail as f64 / total * 100.0;
        stats.avg_response_time = stats.total_response_time / total;
    }

    // Lowest status wins a tie, by the strictly-greater comparison over the
    // ascending key order.
    for (&status, &count) in &error_counts {
        let is_new_peak = stats
            .max_error_status
            .as_ref()
            .is_none_or(|best| count > best.count);
        if is_new_peak {
            stats.max_error_status = Some(StatusCount { status, count });
        }
    }

    stats
}

/// Per-day uptime series for the resolved month.
///
/// Entries (not records) are partitioned by day-of-month; each in-range
/// entry contributes one count judged by its owning record's status. Every
/// calendar day appears exactly once, empty days reporting 0.
pub fn daily_uptime(records: &[LogRecord], year: i32, month: u32) -> Vec<DayUptime> {
    let Some((start, end)) = month_range(year, month) else {
        return Vec::new();
    };
    let days = (end.date_naive() - start.date_naive()).num_days();

    let mut totals = vec![(0u64, 0u64); days as usize];
    for record in records {
        let success = record.is_success();
        for entry in &record.entries {
            if entry.timestamp >= start && entry.timestamp < end {
                let day = entry.timestamp.day0() as usize;
                totals[day].0 += 1;
                if success {
                    totals[day].1 += 1;
                }
            }
        }
    }

    (0..days)
        .map(|d| {
            let (total, success) = totals[d as usize];
            DayUptime {
                date: start + Duration::days(d),
                uptime_percent: if total > 0 {
                    success as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// In-range entries grouped by base endpoint, ascending by entry timestamp
/// within each group (the query-order is kept through grouping, never
/// re-sorted afterwards).
pub fn group_logs_by_endpoint(
    records: &[LogRecord],
    year: i32,
    month: u32,
) -> BTreeMap<String, Vec<GroupedLogLine>> {
    let Some((start, end)) = month_range(year, month) else {
        return BTreeMap::new();
    };

    let mut lines: Vec<GroupedLogLine> = Vec::new();
    for record in records {
        for entry in &record.entries {
            if entry.timestamp >= start && entry.timestamp < end {
                lines.push(GroupedLogLine {
                    trace_id: record.trace_id.clone(),
                    method: record.method.clone(),
                    endpoint: record.endpoint.clone(),
                    status: record.status,
                    timestamp: entry.timestamp,
                });
            }
        }
    }
    lines.sort_by_key(|line| line.timestamp);

    let mut grouped: BTreeMap<String, Vec<GroupedLogLine>> = BTreeMap::new();
    for line in lines {
        grouped
            .entry(base_endpoint(&line.endpoint))
            .or_default()
            .push(line);
    }

    grouped
}

/// Grouping key for an endpoint path: its first three path segments,
/// e.g. `/api/v1/users/42` -> `/api/v1/users`.
pub fn base_endpoint(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .take(3)
        .collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogEntry;
    use chrono::TimeZone;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn record(status: u16, response_time_ms: f64, timestamps: &[&str]) -> LogRecord {
        record_at("/api/users/42", status, response_time_ms, timestamps)
    }

    fn record_at(
        endpoint: &str,
        status: u16,
        response_time_ms: f64,
        timestamps: &[&str],
    ) -> LogRecord {
        LogRecord {
            trace_id: format!("trace-{status}"),
            method: "GET".to_string(),
            endpoint: endpoint.to_string(),
            status,
            response_time_ms,
            entries: timestamps
                .iter()
                .map(|t| LogEntry {
                    timestamp: ts(t),
                    kind: "INFO".to_string(),
                    message: "event".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn month_range_is_half_open() {
        let (start, end) = month_range(2025, 9).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_range_rolls_december_into_next_year() {
        let (start, end) = month_range(2025, 12).unwrap();
        assert_eq!(start.year(), 2025);
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_rejects_non_numeric_and_out_of_range_input() {
        let query = MonthQuery {
            year: Some("twenty".to_string()),
            month: Some("9".to_string()),
        };
        assert!(parse_month_query(&query).is_err());

        let query = MonthQuery {
            year: Some("2025".to_string()),
            month: Some("13".to_string()),
        };
        assert!(parse_month_query(&query).is_err());

        let query = MonthQuery {
            year: Some("2025".to_string()),
            month: Some("0".to_string()),
        };
        assert!(parse_month_query(&query).is_err());
    }

    #[test]
    fn parse_accepts_both_or_neither() {
        let query = MonthQuery {
            year: Some("2025".to_string()),
            month: Some("9".to_string()),
        };
        assert_eq!(parse_month_query(&query).unwrap(), Some((2025, 9)));

        let query = MonthQuery {
            year: None,
            month: None,
        };
        assert_eq!(parse_month_query(&query).unwrap(), None);

        // one absent: fall through to latest-month resolution
        let query = MonthQuery {
            year: Some("2025".to_string()),
            month: None,
        };
        assert_eq!(parse_month_query(&query).unwrap(), None);
    }

    #[test]
    fn parse_rejects_non_numeric_even_when_partner_is_absent() {
        let query = MonthQuery {
            year: Some("bad".to_string()),
            month: None,
        };
        assert!(parse_month_query(&query).is_err());
    }

    #[test]
    fn requested_month_with_data_is_served_directly() {
        let records = vec![record(200, 10.0, &["2025-09-10T12:00:00Z"])];
        assert_eq!(
            resolve_month(&records, Some((2025, 9))),
            ResolvedMonth::Month {
                year: 2025,
                month: 9,
                is_fallback: false
            }
        );
    }

    #[test]
    fn empty_requested_month_falls_back_to_latest() {
        let records = vec![
            record(200, 10.0, &["2025-07-10T12:00:00Z"]),
            record(200, 10.0, &["2025-09-10T12:00:00Z"]),
        ];
        assert_eq!(
            resolve_month(&records, Some((2025, 8))),
            ResolvedMonth::Month {
                year: 2025,
                month: 9,
                is_fallback: true
            }
        );
    }

    #[test]
    fn no_query_resolves_latest_without_fallback_flag() {
        let records = vec![record(200, 10.0, &["2024-12-31T23:59:59Z"])];
        assert_eq!(
            resolve_month(&records, None),
            ResolvedMonth::Month {
                year: 2024,
                month: 12,
                is_fallback: false
            }
        );
    }

    #[test]
    fn empty_store_resolves_to_empty() {
        assert_eq!(resolve_month(&[], None), ResolvedMonth::Empty);
        assert_eq!(resolve_month(&[], Some((2025, 9))), ResolvedMonth::Empty);
    }

    #[test]
    fn latest_month_considers_every_entry_of_every_record() {
        let records = vec![
            record(200, 10.0, &["2025-03-01T00:00:00Z", "2025-06-15T08:00:00Z"]),
            record(200, 10.0, &["2025-05-20T00:00:00Z"]),
        ];
        assert_eq!(
            resolve_month(&records, None),
            ResolvedMonth::Month {
                year: 2025,
                month: 6,
                is_fallback: false
            }
        );
    }

    #[test]
    fn single_success_record_analysis() {
        let records = vec![record(200, 40.0, &["2025-09-10T00:00:00Z"])];
        let stats = analyze_month(&records, 2025, 9);

        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.success, 1);
        assert_eq!(stats.fail, 0);
        assert_eq!(stats.uptime_percent, 100.0);
        assert_eq!(stats.error_percent, 0.0);
        assert_eq!(stats.max_error_status, None);
        assert_eq!(stats.last_error_timestamp, None);
        assert_eq!(stats.total_response_time, 40.0);
        assert_eq!(stats.avg_response_time, 40.0);
    }

    #[test]
    fn uptime_and_error_percent_partition() {
        let records = vec![
            record(200, 10.0, &["2025-09-01T00:00:00Z"]),
            record(304, 20.0, &["2025-09-02T00:00:00Z"]),
            record(500, 30.0, &["2025-09-03T00:00:00Z"]),
            record(404, 40.0, &["2025-09-04T00:00:00Z"]),
        ];
        let stats = analyze_month(&records, 2025, 9);

        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.fail, 2);
        assert_eq!(stats.uptime_percent + stats.error_percent, 100.0);
        assert_eq!(stats.total_response_time, 100.0);
        assert_eq!(stats.avg_response_time, 25.0);
    }

    #[test]
    fn records_outside_the_window_do_not_participate() {
        let records = vec![
            record(200, 10.0, &["2025-08-31T23:59:59Z"]),
            record(200, 10.0, &["2025-10-01T00:00:00Z"]),
            record(500, 10.0, &["2025-09-15T00:00:00Z"]),
        ];
        let stats = analyze_month(&records, 2025, 9);
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.fail, 1);
    }

    #[test]
    fn max_error_status_picks_highest_count() {
        let records = vec![
            record(500, 10.0, &["2025-09-01T00:00:00Z"]),
            record(500, 10.0, &["2025-09-02T00:00:00Z"]),
            record(404, 10.0, &["2025-09-03T00:00:00Z"]),
        ];
        let stats = analyze_month(&records, 2025, 9);
        assert_eq!(
            stats.max_error_status,
            Some(StatusCount {
                status: 500,
                count: 2
            })
        );
    }

    #[test]
    fn non_error_failures_do_not_count_toward_error_status() {
        // 302 is neither a success nor a 4xx/5xx error
        let records = vec![record(302, 10.0, &["2025-09-01T00:00:00Z"])];
        let stats = analyze_month(&records, 2025, 9);
        assert_eq!(stats.fail, 1);
        assert_eq!(stats.max_error_status, None);
        assert_eq!(stats.last_error_timestamp, None);
    }

    #[test]
    fn last_error_timestamp_is_latest_in_range_error_entry() {
        let records = vec![
            record(500, 10.0, &["2025-09-05T00:00:00Z", "2025-09-20T06:30:00Z"]),
            record(404, 10.0, &["2025-09-10T00:00:00Z"]),
            record(200, 10.0, &["2025-09-25T00:00:00Z"]),
        ];
        let stats = analyze_month(&records, 2025, 9);
        assert_eq!(stats.last_error_timestamp, Some(ts("2025-09-20T06:30:00Z")));
    }

    #[test]
    fn daily_series_covers_every_day_with_zero_fill() {
        let records = vec![
            record(200, 10.0, &["2025-09-10T08:00:00Z"]),
            record(500, 10.0, &["2025-09-10T09:00:00Z"]),
        ];
        let series = daily_uptime(&records, 2025, 9);

        assert_eq!(series.len(), 30);
        assert_eq!(series[0].date, ts("2025-09-01T00:00:00Z"));
        assert_eq!(series[0].uptime_percent, 0.0);
        assert_eq!(series[9].date, ts("2025-09-10T00:00:00Z"));
        assert_eq!(series[9].uptime_percent, 50.0);
        assert_eq!(series[29].date, ts("2025-09-30T00:00:00Z"));
    }

    #[test]
    fn daily_series_counts_each_entry_of_a_record() {
        // one failing record with two entries on the same day, one passing
        // record with a single entry: 1 success out of 3 counts
        let records = vec![
            record(500, 10.0, &["2025-09-05T01:00:00Z", "2025-09-05T02:00:00Z"]),
            record(200, 10.0, &["2025-09-05T03:00:00Z"]),
        ];
        let series = daily_uptime(&records, 2025, 9);
        assert!((series[4].uptime_percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn daily_series_length_matches_february() {
        assert_eq!(daily_uptime(&[], 2025, 2).len(), 28);
        assert_eq!(daily_uptime(&[], 2024, 2).len(), 29);
    }

    #[test]
    fn base_endpoint_takes_first_three_segments() {
        assert_eq!(base_endpoint("/api/v1/users/42"), "/api/v1/users");
        assert_eq!(base_endpoint("/api/v1/users"), "/api/v1/users");
        assert_eq!(base_endpoint("/api/x"), "/api/x");
        assert_eq!(base_endpoint("/"), "/");
    }

    #[test]
    fn grouping_keys_by_base_endpoint_in_timestamp_order() {
        let records = vec![
            record_at("/api/v1/users/42", 200, 10.0, &["2025-09-02T00:00:00Z"]),
            record_at("/api/v1/users/7", 404, 10.0, &["2025-09-01T00:00:00Z"]),
            record_at("/api/v1/orders/3", 200, 10.0, &["2025-09-03T00:00:00Z"]),
            record_at("/api/v1/users/9", 200, 10.0, &["2025-10-01T00:00:00Z"]),
        ];
        let grouped = group_logs_by_endpoint(&records, 2025, 9);

        assert_eq!(grouped.len(), 2);
        let users = &grouped["/api/v1/users"];
        assert_eq!(users.len(), 2);
        // ascending by entry timestamp within the group
        assert_eq!(users[0].endpoint, "/api/v1/users/7");
        assert_eq!(users[0].status, 404);
        assert_eq!(users[1].endpoint, "/api/v1/users/42");
        assert_eq!(grouped["/api/v1/orders"].len(), 1);
    }

    #[test]
    fn grouping_emits_one_line_per_in_range_entry() {
        let records = vec![record_at(
            "/api/v1/users/42",
            200,
            10.0,
            &[
                "2025-09-01T00:00:00Z",
                "2025-09-02T00:00:00Z",
                "2025-10-01T00:00:00Z",
            ],
        )];
        let grouped = group_logs_by_endpoint(&records, 2025, 9);
        assert_eq!(grouped["/api/v1/users"].len(), 2);
    }
}
