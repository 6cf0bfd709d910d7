//! Configuration validation.
//!
//! Validates every journal config field before any trades are loaded.

use crate::domain::error::JournalError;
use crate::domain::trade::AssetType;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const INPUT_FORMATS: [&str; 2] = ["json", "csv"];
pub const REPORT_FORMATS: [&str; 3] = ["markdown", "md", "json"];

pub fn validate_journal_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_input_format(config)?;
    validate_filter(config)?;
    validate_risk_free_rate(config)?;
    validate_report_format(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> JournalError {
    JournalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_choice(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    choices: &[&str],
) -> Result<(), JournalError> {
    if let Some(value) = config.get_string(section, key) {
        if !choices.contains(&value.trim().to_ascii_lowercase().as_str()) {
            return Err(invalid(
                section,
                key,
                format!("must be one of: {}", choices.join(", ")),
            ));
        }
    }
    Ok(())
}

fn validate_input_format(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_choice(config, "journal", "format", &INPUT_FORMATS)
}

fn validate_report_format(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_choice(config, "report", "format", &REPORT_FORMATS)
}

/// Parse an optional `YYYY-MM-DD` value.
pub fn parse_config_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, JournalError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid(section, key, "invalid date format (expected YYYY-MM-DD)")),
    }
}

fn validate_filter(config: &dyn ConfigPort) -> Result<(), JournalError> {
    if let Some(asset) = config.get_string("filter", "asset_type") {
        if !asset.trim().is_empty() && AssetType::parse(&asset).is_none() {
            let known: Vec<&str> = AssetType::ALL.iter().map(|a| a.as_str()).collect();
            return Err(invalid(
                "filter",
                "asset_type",
                format!("must be one of: {}", known.join(", ")),
            ));
        }
    }

    let start = parse_config_date(config, "filter", "start_date")?;
    let end = parse_config_date(config, "filter", "end_date")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "filter",
                "start_date",
                "start_date must be on or before end_date",
            ));
        }
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let value = config.get_double("stats", "risk_free_rate", 0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "stats",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}
