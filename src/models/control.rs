//! Per-endpoint control configuration models.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Rate limit values for a monitored endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct LimitValues {
    #[serde(default)]
    pub number: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
}

/// Schedule window for a monitored endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ScheduleValues {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Feature toggles for a monitored endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Toggles {
    #[serde(default = "default_true")]
    pub api: bool,
    #[serde(default = "default_true")]
    pub tracer: bool,
    #[serde(default)]
    pub schedule: bool,
    #[serde(default)]
    pub limit: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            api: true,
            tracer: true,
            schedule: false,
            limit: false,
        }
    }
}

/// Control configuration for one endpoint; at most one record per endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct ControlConfig {
    /// Unique endpoint key
    pub endpoint: String,
    /// Creation time; not refreshed by later upserts
    pub timestamp: DateTime<Utc>,
    pub limit_values: LimitValues,
    pub schedule_values: ScheduleValues,
    pub toggles: Toggles,
}

/// Request body for `PUT /api/logs/control`
#[derive(Debug, Clone, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertControlRequest {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub limit_values: Option<LimitValues>,
    #[serde(default)]
    pub schedule_values: Option<ScheduleValues>,
    #[serde(default)]
    pub toggles: Option<Toggles>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_default_values() {
        let toggles = Toggles::default();
        assert!(toggles.api);
        assert!(toggles.tracer);
        assert!(!toggles.schedule);
        assert!(!toggles.limit);
    }

    #[test]
    fn partial_toggles_fill_unset_fields_with_defaults() {
        let toggles: Toggles = serde_json::from_value(serde_json::json!({ "limit": true })).unwrap();
        assert!(toggles.api);
        assert!(toggles.tracer);
        assert!(!toggles.schedule);
        assert!(toggles.limit);
    }

    #[test]
    fn upsert_request_tolerates_missing_fields() {
        let req: UpsertControlRequest =
            serde_json::from_value(serde_json::json!({ "endpoint": "/api/x" })).unwrap();
        assert_eq!(req.endpoint, "/api/x");
        assert!(req.limit_values.is_none());
        assert!(req.schedule_values.is_none());
        assert!(req.toggles.is_none());

        let empty: UpsertControlRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.endpoint.is_empty());
    }

    #[test]
    fn control_config_serializes_camel_case() {
        let config = ControlConfig {
            endpoint: "/api/x".to_string(),
            timestamp: Utc::now(),
            limit_values: LimitValues::default(),
            schedule_values: ScheduleValues::default(),
            toggles: Toggles::default(),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("limitValues").is_some());
        assert!(json.get("scheduleValues").is_some());
        assert_eq!(json["toggles"]["api"], true);
    }
}
