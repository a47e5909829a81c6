//! Telemetry DTOs

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::{AppliedFilters, TelemetryPage, TelemetryParams, TelemetryStats};
use crate::domain::Reading;

/// Query string of `GET /api/data`. Values are validated by the service so
/// that a bad `limit` gets a precise message instead of a generic rejection.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DataQuery {
    /// Maximum number of readings (positive integer, default 100)
    pub limit: Option<String>,
    /// Inclusive lower bound, ISO-8601
    pub start_date: Option<String>,
    /// Inclusive upper bound, ISO-8601
    pub end_date: Option<String>,
}

impl From<DataQuery> for TelemetryParams {
    fn from(q: DataQuery) -> Self {
        Self {
            limit: q.limit,
            start_date: q.start_date,
            end_date: q.end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedDto {
    pub field1: Option<f64>,
    pub field2: Option<f64>,
    /// RFC 3339, UTC
    pub created_at: String,
}

impl From<Reading> for FeedDto {
    fn from(r: Reading) -> Self {
        Self {
            field1: r.field1,
            field2: r.field2,
            created_at: rfc3339(&r.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChannelDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FiltersAppliedDto {
    pub limit: u64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<AppliedFilters> for FiltersAppliedDto {
    fn from(f: AppliedFilters) -> Self {
        Self {
            limit: f.limit,
            start_date: f.start_date.as_ref().map(rfc3339),
            end_date: f.end_date.as_ref().map(rfc3339),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsDto {
    pub total: usize,
    pub valid: usize,
    pub filters_applied: FiltersAppliedDto,
}

impl From<TelemetryStats> for StatsDto {
    fn from(s: TelemetryStats) -> Self {
        Self {
            total: s.total,
            valid: s.valid,
            filters_applied: s.filters_applied.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DataResponse {
    pub feeds: Vec<FeedDto>,
    pub channel: ChannelDto,
    pub stats: StatsDto,
}

impl DataResponse {
    pub fn new(page: TelemetryPage, channel: ChannelDto) -> Self {
        Self {
            feeds: page.readings.into_iter().map(FeedDto::from).collect(),
            channel,
            stats: page.stats.into(),
        }
    }
}

fn rfc3339(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_render_with_explicit_utc_offset() {
        let feed = FeedDto::from(Reading {
            field1: Some(1.0),
            field2: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap(),
        });
        assert_eq!(feed.created_at, "2024-06-01T10:30:00+00:00");
    }
}
