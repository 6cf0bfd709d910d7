//! JSON file trade source.
//!
//! Accepts the shapes the journal API has returned: a bare array of trades, or
//! an object carrying the array under `trades` or `data`. Elements that are not
//! JSON objects are skipped with a warning. Fields of the wrong type inside an
//! object read as absent, so the trade itself still loads.

use crate::domain::error::JournalError;
use crate::domain::trade::TradeRecord;
use crate::ports::trade_port::TradeSource;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

pub struct JsonTradeAdapter {
    path: PathBuf,
}

impl JsonTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn error(&self, reason: String) -> JournalError {
        JournalError::TradeSource {
            source_name: self.describe(),
            reason,
        }
    }
}

/// Parse a JSON document into trade records.
pub fn parse_trades(content: &str) -> Result<Vec<TradeRecord>, String> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("trades").or_else(|| map.remove("data")) {
            Some(Value::Array(items)) => items,
            _ => return Err("expected an array under \"trades\" or \"data\"".to_string()),
        },
        _ => return Err("expected an array of trades".to_string()),
    };

    let mut trades = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            tracing::warn!(index, "skipping trade that is not a JSON object");
            continue;
        }
        match serde_json::from_value::<TradeRecord>(item) {
            Ok(trade) => trades.push(trade),
            Err(e) => tracing::warn!(index, error = %e, "skipping malformed trade"),
        }
    }
    Ok(trades)
}

impl TradeSource for JsonTradeAdapter {
    fn list_trades(&self) -> Result<Vec<TradeRecord>, JournalError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.error(format!("failed to read file: {e}")))?;
        let trades = parse_trades(&content).map_err(|reason| self.error(reason))?;
        tracing::debug!(count = trades.len(), source = %self.describe(), "loaded trades");
        Ok(trades)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
