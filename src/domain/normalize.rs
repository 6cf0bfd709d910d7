//! Canonical intermediate form of a trade record.
//!
//! All alias resolution and fallback policy lives here so the aggregation
//! formulas only ever see one shape.

use super::trade::{TradeRecord, TradeStatus};
use chrono::{DateTime, Utc};

pub const UNKNOWN_ASSET_TYPE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTrade<'a> {
    pub record: &'a TradeRecord,
    /// Position in the input collection.
    pub index: usize,
    pub status: Option<TradeStatus>,
    pub asset_label: String,
    pub quantity: f64,
    pub entry_price: f64,
    pub pnl: Option<f64>,
    /// Effective entry timestamp; `now` when the record has none that parses.
    pub entered_at: DateTime<Utc>,
    pub timestamp_fallback: bool,
}

impl<'a> NormalizedTrade<'a> {
    pub fn from_record(record: &'a TradeRecord, index: usize, now: DateTime<Utc>) -> Self {
        let entry = record.entry_timestamp();
        Self {
            record,
            index,
            status: record.status(),
            asset_label: asset_label(record),
            quantity: record.quantity().unwrap_or(0.0),
            entry_price: record.entry_price.filter(|p| p.is_finite()).unwrap_or(0.0),
            pnl: record.pnl(),
            entered_at: entry.unwrap_or(now),
            timestamp_fallback: entry.is_none(),
        }
    }

    /// Quantity times entry price.
    pub fn notional(&self) -> f64 {
        self.quantity * self.entry_price
    }

    pub fn is_open(&self) -> bool {
        self.status == Some(TradeStatus::Open)
    }

    /// The realized result, for trades that are closed and carry one.
    pub fn closed_pnl(&self) -> Option<f64> {
        match self.status {
            Some(TradeStatus::Closed) => self.pnl,
            _ => None,
        }
    }
}

/// Group label for a record's asset type: the canonical name for known types,
/// the trimmed text otherwise, and `"Unknown"` when there is nothing to use.
pub fn asset_label(record: &TradeRecord) -> String {
    if let Some(asset) = record.asset_type() {
        return asset.as_str().to_string();
    }
    match record.asset_type.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => UNKNOWN_ASSET_TYPE.to_string(),
    }
}

/// Normalize every record against a single shared fallback timestamp.
pub fn normalize_all(records: &[TradeRecord], now: DateTime<Utc>) -> Vec<NormalizedTrade<'_>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| NormalizedTrade::from_record(record, index, now))
        .collect()
}
