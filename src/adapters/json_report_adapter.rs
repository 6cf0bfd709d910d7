//! JSON report output.
//!
//! Serializes the report with the dashboard's camelCase field names so the
//! output can be fed straight into a chart front end.

use std::fs;
use std::path::Path;

use crate::domain::error::JournalError;
use crate::ports::report_port::{JournalReport, ReportPort};

pub struct JsonReportAdapter;

pub fn render(report: &JournalReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &JournalReport, output_path: &Path) -> Result<(), JournalError> {
        let report_error = |reason: String| JournalError::Report {
            path: output_path.display().to_string(),
            reason,
        };
        let body = render(report).map_err(|e| report_error(e.to_string()))?;
        fs::write(output_path, body).map_err(|e| report_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::DashboardAnalytics;
    use crate::domain::stats::TradeStats;
    use crate::domain::trade::TradeRecord;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use tempfile::TempDir;

    fn report() -> JournalReport {
        let trades = vec![TradeRecord {
            symbol: Some("ETH".into()),
            status: Some("closed".into()),
            pnl: Some(-25.0),
            entry_date: Some("2024-03-05T10:00:00Z".into()),
            ..Default::default()
        }];
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        JournalReport::new(DashboardAnalytics::compute_at(&trades, now))
    }

    #[test]
    fn uses_dashboard_field_names() {
        let value: Value = serde_json::from_str(&render(&report()).unwrap()).unwrap();
        let analytics = &value["analytics"];
        assert_eq!(value["title"], "Trading Journal Report");
        assert_eq!(analytics["totalTrades"], 1);
        assert_eq!(analytics["totalPnL"], -25.0);
        assert_eq!(analytics["pnlOverTime"][0]["date"], "2024-03-05");
        assert_eq!(analytics["monthlyPerformance"][0]["month"], "2024-03");
        assert!(value.get("stats").is_none());
    }

    #[test]
    fn includes_stats_when_present() {
        let value: Value = serde_json::from_str(
            &render(&report().with_stats(TradeStats::default())).unwrap(),
        )
        .unwrap();
        assert!(value["stats"].is_object());
    }

    #[test]
    fn write_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        JsonReportAdapter.write(&report(), &path).unwrap();
        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["analytics"]["losingTrades"], 1);
    }

    #[test]
    fn write_failure_is_report_error() {
        let result = JsonReportAdapter.write(&report(), Path::new("/nonexistent/dir/r.json"));
        assert!(matches!(result, Err(JournalError::Report { .. })));
    }
}
