use chrono::{DateTime, Utc};

/// One telemetry sample as written by the ingestion process.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub field1: Option<f64>,
    pub field2: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Reading {
    /// Both measurements are present.
    pub fn is_complete(&self) -> bool {
        self.field1.is_some() && self.field2.is_some()
    }
}

/// Inclusive `created_at` bounds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ReadingFilter {
    pub fn matches(&self, at: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| *at >= s) && self.end.map_or(true, |e| *at <= e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filter_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let filter = ReadingFilter {
            start: Some(start),
            end: Some(end),
        };

        assert!(filter.matches(&start));
        assert!(filter.matches(&end));
        assert!(!filter.matches(&(end + chrono::Duration::seconds(1))));
        assert!(ReadingFilter::default().matches(&start));
    }
}
