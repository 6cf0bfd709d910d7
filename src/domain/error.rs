//! Domain error types.

/// A single rule broken by a trade record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationIssue {
    pub field: String,
    pub reason: String,
}

impl ValidationIssue {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for tradejournal.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("failed to load trades from {source_name}: {reason}")]
    TradeSource { source_name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to write report {path}: {reason}")]
    Report { path: String, reason: String },

    #[error("{invalid} of {total} trade records failed validation")]
    InvalidTrades { invalid: usize, total: usize },
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::ConfigParse { .. }
            | JournalError::ConfigMissing { .. }
            | JournalError::ConfigInvalid { .. } => 2,
            JournalError::TradeSource { .. } => 3,
            JournalError::Report { .. } => 4,
            JournalError::InvalidTrades { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_issue_display() {
        let issue = ValidationIssue::new("entryPrice", "must be positive");
        assert_eq!(issue.to_string(), "entryPrice: must be positive");
    }

    #[test]
    fn invalid_trades_display() {
        let err = JournalError::InvalidTrades {
            invalid: 2,
            total: 7,
        };
        assert_eq!(err.to_string(), "2 of 7 trade records failed validation");
    }

    #[test]
    fn config_invalid_display() {
        let err = JournalError::ConfigInvalid {
            section: "filter".into(),
            key: "start_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [filter] start_date: invalid date format (expected YYYY-MM-DD)"
        );
    }
}
