//! `vitals query` against the Play Developer Reporting API.
//!
//! Upstream rows are nested (`startTime`, `dimensions[]`, `metrics[]`); they
//! are flattened into one flat metric row each so the family can offer CSV.

use super::validate_package;
use crate::client::ApiClient;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::pagination::{accumulate, Deadline, Page, PageRequest, PageSource, PaginationOptions};
use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::info;

pub const SERVICE: &str = "playdeveloperreporting";

pub const MAX_QUERY_DAYS: u32 = 365;

/// Reporting time zone for DAILY aggregation.
const REPORTING_TIME_ZONE: &str = "America/Los_Angeles";

const COMMON_DIMENSIONS: &[&str] = &[
    "apiLevel",
    "versionCode",
    "deviceModel",
    "deviceBrand",
    "deviceType",
    "countryCode",
    "deviceRamBucket",
    "deviceSocMake",
    "deviceSocModel",
    "deviceCpuMake",
    "deviceCpuModel",
    "deviceGpuMake",
    "deviceGpuModel",
    "deviceGpuVersion",
    "deviceVulkanVersion",
    "deviceGlEsVersion",
    "deviceScreenSize",
    "deviceScreenDpi",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSet {
    CrashRate,
    AnrRate,
    ExcessiveWakeupRate,
    StuckBackgroundWakelockRate,
    SlowStartRate,
    SlowRenderingRate,
    ErrorCount,
}

impl MetricSet {
    pub const ALL: [MetricSet; 7] = [
        MetricSet::CrashRate,
        MetricSet::AnrRate,
        MetricSet::ExcessiveWakeupRate,
        MetricSet::StuckBackgroundWakelockRate,
        MetricSet::SlowStartRate,
        MetricSet::SlowRenderingRate,
        MetricSet::ErrorCount,
    ];

    /// Short CLI name, e.g. `crash-rate`.
    pub fn cli_name(self) -> &'static str {
        match self {
            MetricSet::CrashRate => "crash-rate",
            MetricSet::AnrRate => "anr-rate",
            MetricSet::ExcessiveWakeupRate => "excessive-wakeup-rate",
            MetricSet::StuckBackgroundWakelockRate => "stuck-background-wakelock-rate",
            MetricSet::SlowStartRate => "slow-start-rate",
            MetricSet::SlowRenderingRate => "slow-rendering-rate",
            MetricSet::ErrorCount => "error-count",
        }
    }

    /// Resource name used in the upstream URL.
    pub fn resource(self) -> &'static str {
        match self {
            MetricSet::CrashRate => "crashRateMetricSet",
            MetricSet::AnrRate => "anrRateMetricSet",
            MetricSet::ExcessiveWakeupRate => "excessiveWakeupRateMetricSet",
            MetricSet::StuckBackgroundWakelockRate => "stuckBackgroundWakelockRateMetricSet",
            MetricSet::SlowStartRate => "slowStartRateMetricSet",
            MetricSet::SlowRenderingRate => "slowRenderingRateMetricSet",
            MetricSet::ErrorCount => "errorCountMetricSet",
        }
    }

    /// Accepts the CLI name or the upstream resource name.
    pub fn parse(raw: &str) -> Result<MetricSet, ApiError> {
        let raw = raw.trim();
        MetricSet::ALL
            .into_iter()
            .find(|set| set.cli_name() == raw || set.resource() == raw)
            .ok_or_else(|| {
                let names: Vec<&str> = MetricSet::ALL.iter().map(|s| s.cli_name()).collect();
                ApiError::Validation(format!(
                    "unknown metric set '{}' (expected one of: {})",
                    raw,
                    names.join(", ")
                ))
            })
    }

    pub fn default_metrics(self) -> &'static [&'static str] {
        match self {
            MetricSet::CrashRate => &["crashRate", "userPerceivedCrashRate", "distinctUsers"],
            MetricSet::AnrRate => &["anrRate", "userPerceivedAnrRate", "distinctUsers"],
            MetricSet::ExcessiveWakeupRate => &["excessiveWakeupRate", "distinctUsers"],
            MetricSet::StuckBackgroundWakelockRate => &["stuckBgWakelockRate", "distinctUsers"],
            MetricSet::SlowStartRate => &["slowStartRate", "distinctUsers"],
            MetricSet::SlowRenderingRate => &["slowRenderingRate20Fps", "distinctUsers"],
            MetricSet::ErrorCount => &["errorReportCount", "distinctUsers"],
        }
    }

    pub fn supports_dimension(self, dimension: &str) -> bool {
        let extra: &[&str] = match self {
            MetricSet::SlowStartRate => &["startType"],
            MetricSet::ErrorCount => &["reportType", "issueId"],
            _ => &[],
        };
        COMMON_DIMENSIONS.contains(&dimension) || extra.contains(&dimension)
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

#[derive(Debug, Clone)]
pub struct VitalsQuery {
    pub package: String,
    pub metric_set: String,
    pub metrics: Vec<String>,
    pub dimensions: Vec<String>,
    pub days: u32,
}

impl VitalsQuery {
    pub fn validate(&self) -> Result<MetricSet, ApiError> {
        validate_package(&self.package)?;
        let set = MetricSet::parse(&self.metric_set)?;
        if self.days == 0 || self.days > MAX_QUERY_DAYS {
            return Err(ApiError::Validation(format!(
                "--days must be between 1 and {}",
                MAX_QUERY_DAYS
            )));
        }
        if self.metrics.iter().any(|m| m.trim().is_empty()) {
            return Err(ApiError::Validation("--metric cannot be empty".to_string()));
        }
        Ok(set)
    }

    pub async fn run(
        &self,
        client: &ApiClient,
        pagination: &PaginationOptions,
        deadline: &Deadline,
    ) -> Result<Envelope, ApiError> {
        let set = self.validate()?;
        let (dimensions, warnings) = self.supported_dimensions(set);
        let metrics: Vec<String> = if self.metrics.is_empty() {
            set.default_metrics().iter().map(|m| m.to_string()).collect()
        } else {
            self.metrics.iter().map(|m| m.trim().to_string()).collect()
        };

        let source = MetricRows {
            client,
            package: self.package.trim(),
            set,
            body: json!({
                "timelineSpec": timeline_spec(self.days, Utc::now().date_naive()),
                "dimensions": dimensions,
                "metrics": metrics,
            }),
        };
        let mut accumulated = accumulate(&source, pagination, deadline).await?;
        info!(
            package = %self.package,
            metric_set = %set,
            rows = accumulated.items.len(),
            pages = accumulated.pages,
            "Queried vitals"
        );

        let rows = std::mem::take(&mut accumulated.items);
        let envelope = Envelope::new(Value::Array(rows))
            .with_services([SERVICE])
            .with_warnings(warnings);
        Ok(accumulated.annotate(envelope))
    }

    /// Requested dimensions the metric set understands, plus a warning for each dropped one.
    fn supported_dimensions(&self, set: MetricSet) -> (Vec<String>, Vec<String>) {
        let mut kept = Vec::new();
        let mut warnings = Vec::new();
        for dimension in &self.dimensions {
            let dimension = dimension.trim();
            if set.supports_dimension(dimension) {
                if !kept.iter().any(|d| d == dimension) {
                    kept.push(dimension.to_string());
                }
            } else {
                warnings.push(format!(
                    "dimension '{}' is not supported by {}; ignored",
                    dimension,
                    set.resource()
                ));
            }
        }
        (kept, warnings)
    }
}

struct MetricRows<'a> {
    client: &'a ApiClient,
    package: &'a str,
    set: MetricSet,
    body: Value,
}

#[async_trait]
impl<'a> PageSource for MetricRows<'a> {
    type Item = Value;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Value>, ApiError> {
        let url = self
            .client
            .reporting_url(&format!("apps/{}/{}:query", self.package, self.set.resource()));
        let mut body = self.body.clone();
        if let Value::Object(map) = &mut body {
            if let Some(size) = request.page_size {
                map.insert("pageSize".to_string(), json!(size));
            }
            if !request.page_token.is_empty() {
                map.insert("pageToken".to_string(), json!(request.page_token));
            }
        }

        let response = self.client.post_json(&url, &body).await?;
        let next_token = response
            .get("nextPageToken")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let rows = response
            .get("rows")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().map(flatten_row).collect())
            .unwrap_or_default();
        Ok(Page::new(rows, next_token))
    }
}

/// DAILY window of `days` full days ending yesterday. The upstream treats
/// `endTime` as exclusive, so it is set to `today`.
fn timeline_spec(days: u32, today: NaiveDate) -> Value {
    let end = today;
    let start = end - ChronoDuration::days(i64::from(days));
    json!({
        "aggregationPeriod": "DAILY",
        "startTime": date_json(start),
        "endTime": date_json(end),
    })
}

fn date_json(date: NaiveDate) -> Value {
    json!({
        "year": date.year(),
        "month": date.month(),
        "day": date.day(),
        "timeZone": {"id": REPORTING_TIME_ZONE},
    })
}

/// Flatten one upstream row into `{date, <dimension>..., <metric>...}`.
fn flatten_row(row: &Value) -> Value {
    let mut flat = Map::new();

    if let Some(start) = row.get("startTime") {
        let part = |key: &str| start.get(key).and_then(Value::as_u64);
        let date = match (part("year"), part("month"), part("day")) {
            (Some(y), Some(m), Some(d)) => format!("{:04}-{:02}-{:02}", y, m, d),
            _ => String::new(),
        };
        flat.insert("date".to_string(), Value::String(date));
    }

    for dimension in row
        .get("dimensions")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let Some(name) = dimension.get("dimension").and_then(Value::as_str) else {
            continue;
        };
        let value = ["stringValue", "int64Value", "valueLabel"]
            .iter()
            .find_map(|key| dimension.get(*key))
            .cloned()
            .unwrap_or(Value::Null);
        flat.insert(name.to_string(), value);
    }

    for metric in row
        .get("metrics")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let Some(name) = metric.get("metric").and_then(Value::as_str) else {
            continue;
        };
        let value = metric
            .pointer("/decimalValue/value")
            .cloned()
            .or_else(|| {
                metric
                    .as_object()
                    .and_then(|m| m.iter().find(|(k, _)| k.as_str() != "metric"))
                    .map(|(_, v)| v.clone())
            })
            .unwrap_or(Value::Null);
        flat.insert(name.to_string(), value);
    }

    Value::Object(flat)
}
