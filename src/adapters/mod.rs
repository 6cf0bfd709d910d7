//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_adapter;
pub mod json_report_adapter;
pub mod markdown_report;

use std::path::{Path, PathBuf};

use crate::ports::report_port::ReportPort;
use crate::ports::trade_port::TradeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Infer from the file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
            .unwrap_or(Self::Json)
    }

    pub fn source(self, path: PathBuf) -> Box<dyn TradeSource> {
        match self {
            Self::Json => Box::new(json_adapter::JsonTradeAdapter::new(path)),
            Self::Csv => Box::new(csv_adapter::CsvTradeAdapter::new(path)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infer from the file extension, defaulting to Markdown.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
            .unwrap_or(Self::Markdown)
    }

    pub fn writer(self) -> Box<dyn ReportPort> {
        match self {
            Self::Markdown => Box::new(markdown_report::MarkdownReportAdapter),
            Self::Json => Box::new(json_report_adapter::JsonReportAdapter),
        }
    }
}
