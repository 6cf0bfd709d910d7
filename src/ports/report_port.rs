//! Report generation port trait.

use crate::domain::analytics::DashboardAnalytics;
use crate::domain::error::JournalError;
use crate::domain::stats::TradeStats;
use serde::Serialize;
use std::path::Path;

pub const DEFAULT_REPORT_TITLE: &str = "Trading Journal Report";

/// Everything a report renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalReport {
    pub title: String,
    pub analytics: DashboardAnalytics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TradeStats>,
}

impl JournalReport {
    pub fn new(analytics: DashboardAnalytics) -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            analytics,
            stats: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_stats(mut self, stats: TradeStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

/// Port for writing journal reports.
pub trait ReportPort {
    fn write(&self, report: &JournalReport, output_path: &Path) -> Result<(), JournalError>;
}
