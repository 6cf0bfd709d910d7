//! Markdown report generation.
//!
//! Assembles the section tables from [`tables`] into a single document and
//! writes it to disk.

pub mod tables;

use std::fs;
use std::path::Path;

use crate::domain::error::JournalError;
use crate::ports::report_port::{JournalReport, ReportPort};

pub struct MarkdownReportAdapter;

/// Render the full Markdown document for a report.
pub fn render(report: &JournalReport) -> String {
    let a = &report.analytics;
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", report.title));

    out.push_str("## Summary\n\n");
    out.push_str(&tables::render_summary_table(a));
    out.push('\n');

    out.push_str("## Monthly Performance\n\n");
    out.push_str(&tables::render_monthly_table(&a.monthly_performance));
    out.push('\n');

    out.push_str("## Asset Type Distribution\n\n");
    out.push_str(&tables::render_asset_table(&a.asset_type_distribution));
    out.push('\n');

    out.push_str("## Cumulative P&L\n\n");
    out.push_str(&tables::render_pnl_curve(&a.pnl_over_time));
    out.push('\n');

    out.push_str("## Recent Trades\n\n");
    out.push_str(&tables::render_recent_trades(&a.recent_trades));

    if let Some(stats) = &report.stats {
        out.push('\n');
        out.push_str("## Extended Statistics\n\n");
        out.push_str(&tables::render_stats_table(stats));
    }

    out
}

impl ReportPort for MarkdownReportAdapter {
    fn write(&self, report: &JournalReport, output_path: &Path) -> Result<(), JournalError> {
        fs::write(output_path, render(report)).map_err(|e| JournalError::Report {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
