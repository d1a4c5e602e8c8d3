//! Visits per calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{Database, DayCount, DbResult};

/// Visit counts per day over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayWiseReport {
    /// Inclusive lower bound, unbounded when absent
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound, unbounded when absent
    pub end: Option<NaiveDate>,
    /// Sum of all bucket counts
    pub total_visits: u64,
    /// Generation timestamp (RFC 3339)
    pub generated_at: String,
    /// One entry per day with at least one visit, ascending
    pub buckets: Vec<DayCount>,
}

impl DayWiseReport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the buckets as `day,count` CSV.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("day,count\n");
        for bucket in &self.buckets {
            csv.push_str(&format!("{},{}\n", bucket.day.format("%Y-%m-%d"), bucket.count));
        }
        csv
    }
}

/// Builds day-wise visit reports.
pub struct DayWiseReporter<'a> {
    db: &'a Database,
}

impl<'a> DayWiseReporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Visit counts per day within `[start, end]`, ascending by day.
    ///
    /// Days without visits are omitted. A window whose start lies after its
    /// end yields no buckets.
    pub fn day_wise_counts(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<Vec<DayCount>> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Ok(Vec::new());
            }
        }
        self.db.day_wise_counts(start, end)
    }

    /// Full report for the window.
    pub fn report(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DbResult<DayWiseReport> {
        let buckets = self.day_wise_counts(start, end)?;
        let total_visits = buckets.iter().map(|b| u64::from(b.count)).sum();

        Ok(DayWiseReport {
            start,
            end,
            total_visits,
            generated_at: chrono::Utc::now().to_rfc3339(),
            buckets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisitDraft;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let days = [
            date(2024, 1, 1),
            date(2024, 1, 1),
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 2),
        ];
        for day in days {
            let visit = VisitDraft::for_patient("Alice").into_visit(1, day);
            db.insert_visit(&visit).unwrap();
        }
        db
    }

    #[test]
    fn test_report_totals() {
        let db = setup_db();
        let reporter = DayWiseReporter::new(&db);

        let report = reporter
            .report(Some(date(2024, 1, 1)), Some(date(2024, 1, 2)))
            .unwrap();
        assert_eq!(report.total_visits, 5);
        assert_eq!(
            report.buckets,
            vec![
                DayCount { day: date(2024, 1, 1), count: 3 },
                DayCount { day: date(2024, 1, 2), count: 2 },
            ]
        );
    }

    #[test]
    fn test_start_after_end_is_empty() {
        let db = setup_db();
        let reporter = DayWiseReporter::new(&db);

        let buckets = reporter
            .day_wise_counts(Some(date(2024, 1, 2)), Some(date(2024, 1, 1)))
            .unwrap();
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_start_after_all_visits() {
        let db = setup_db();
        let reporter = DayWiseReporter::new(&db);

        let report = reporter.report(Some(date(2025, 1, 1)), None).unwrap();
        assert!(report.buckets.is_empty());
        assert_eq!(report.total_visits, 0);
    }

    #[test]
    fn test_csv_export() {
        let db = setup_db();
        let reporter = DayWiseReporter::new(&db);
        let report = reporter.report(None, None).unwrap();

        assert_eq!(report.to_csv(), "day,count\n2024-01-01,3\n2024-01-02,2\n");
    }

    #[test]
    fn test_json_export() {
        let db = setup_db();
        let reporter = DayWiseReporter::new(&db);
        let report = reporter.report(None, Some(date(2024, 1, 1))).unwrap();

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["total_visits"], 3);
        assert_eq!(value["buckets"][0]["day"], "2024-01-01");
        assert_eq!(value["buckets"][0]["count"], 3);
        assert!(value["start"].is_null());
    }
}
