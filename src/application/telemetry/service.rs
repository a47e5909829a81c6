//! Range-filtered retrieval of sensor readings

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::params::{non_empty, parse_bound, parse_limit, TelemetryParams};
use crate::domain::{DomainResult, Reading, ReadingFilter, RepositoryProvider};

/// Filters that ended up shaping the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFilters {
    pub limit: u64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct TelemetryStats {
    pub total: usize,
    /// Readings with both measurements present.
    pub valid: usize,
    pub filters_applied: AppliedFilters,
}

/// Readings in chronological order plus summary statistics.
#[derive(Debug, Clone)]
pub struct TelemetryPage {
    pub readings: Vec<Reading>,
    pub stats: TelemetryStats,
}

pub struct TelemetryService {
    repos: Arc<dyn RepositoryProvider>,
    default_limit: u64,
}

impl TelemetryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, default_limit: u64) -> Self {
        Self {
            repos,
            default_limit,
        }
    }

    /// The most recent `limit` readings inside the range, oldest first.
    ///
    /// The store is asked for newest-first so `limit` selects the latest rows;
    /// the page is then reversed into chronological order.
    pub async fn query(&self, params: TelemetryParams) -> DomainResult<TelemetryPage> {
        let limit = parse_limit(non_empty(&params.limit), self.default_limit)?;
        let filter = ReadingFilter {
            start: parse_bound("start_date", non_empty(&params.start_date))?,
            end: parse_bound("end_date", non_empty(&params.end_date))?,
        };

        let mut readings = self.repos.readings().find_latest(&filter, limit).await?;
        readings.reverse();

        let valid = readings.iter().filter(|r| r.is_complete()).count();
        debug!(limit, total = readings.len(), valid, "Telemetry query served");

        Ok(TelemetryPage {
            stats: TelemetryStats {
                total: readings.len(),
                valid,
                filters_applied: AppliedFilters {
                    limit,
                    start_date: filter.start,
                    end_date: filter.end,
                },
            },
            readings,
        })
    }

    /// Number of stored readings, used by the health check.
    pub async fn count(&self) -> DomainResult<u64> {
        self.repos.readings().count_readings().await
    }
}
