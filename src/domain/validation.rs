//! Trade record validation, matching the journal's create-trade rules.

use super::error::ValidationIssue;
use super::trade::{AssetType, TradeRecord, TradeSide, TradeStatus};

pub const MAX_NOTES_LEN: usize = 5000;

/// A record that failed one or more rules.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidTrade {
    pub index: usize,
    /// The record's id, else its symbol.
    pub label: String,
    pub issues: Vec<ValidationIssue>,
}

pub fn validate_trade(record: &TradeRecord) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match record.asset_type.as_deref() {
        None => issues.push(ValidationIssue::new("assetType", "is required")),
        Some(text) if AssetType::parse(text).is_none() => issues.push(ValidationIssue::new(
            "assetType",
            format!("unknown asset type '{text}'"),
        )),
        Some(_) => {}
    }

    if record
        .symbol
        .as_deref()
        .is_none_or(|s| s.trim().is_empty())
    {
        issues.push(ValidationIssue::new("symbol", "is required"));
    }

    match record.side.as_deref() {
        None => issues.push(ValidationIssue::new("side", "is required")),
        Some(text) if TradeSide::parse(text).is_none() => issues.push(ValidationIssue::new(
            "side",
            format!("unknown side '{text}'"),
        )),
        Some(_) => {}
    }

    if let Some(text) = record.status.as_deref() {
        if TradeStatus::parse(text).is_none() {
            issues.push(ValidationIssue::new(
                "status",
                format!("unknown status '{text}'"),
            ));
        }
    }

    match record.size.or(record.quantity) {
        None => issues.push(ValidationIssue::new("size", "is required")),
        Some(_) if record.quantity().is_none_or(|q| q <= 0.0) => {
            issues.push(ValidationIssue::new("size", "must be positive"))
        }
        Some(_) => {}
    }

    match record.entry_price {
        None => issues.push(ValidationIssue::new("entryPrice", "is required")),
        Some(price) => check_positive(&mut issues, "entryPrice", price),
    }

    if !record.has_entry_timestamp() {
        issues.push(ValidationIssue::new("entryDateTime", "is required"));
    } else if record.entry_timestamp().is_none() {
        issues.push(ValidationIssue::new("entryDateTime", "is not a valid date"));
    }

    if (record.exit_date_time.is_some() || record.exit_date.is_some())
        && record.exit_timestamp().is_none()
    {
        issues.push(ValidationIssue::new("exitDateTime", "is not a valid date"));
    }

    for (field, value) in [
        ("exitPrice", record.exit_price),
        ("stopLoss", record.stop_loss),
        ("takeProfit", record.take_profit),
    ] {
        if let Some(value) = value {
            check_positive(&mut issues, field, value);
        }
    }

    for (field, value) in [("commission", record.commission), ("fees", record.fees)] {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                issues.push(ValidationIssue::new(field, "must not be negative"));
            }
        }
    }

    if let Some(notes) = &record.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            issues.push(ValidationIssue::new(
                "notes",
                format!("must be at most {MAX_NOTES_LEN} characters"),
            ));
        }
    }

    if let Some(currency) = &record.currency {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            issues.push(ValidationIssue::new(
                "currency",
                "must be a 3-letter currency code",
            ));
        }
    }

    issues
}

fn check_positive(issues: &mut Vec<ValidationIssue>, field: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        issues.push(ValidationIssue::new(field, "must be positive"));
    }
}

/// Every failing record, in input order.
pub fn validate_trades(records: &[TradeRecord]) -> Vec<InvalidTrade> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let issues = validate_trade(record);
            if issues.is_empty() {
                None
            } else {
                Some(InvalidTrade {
                    index,
                    label: record.label().to_string(),
                    issues,
                })
            }
        })
        .collect()
}
