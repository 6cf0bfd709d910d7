#![allow(dead_code)]

use tradejournal::domain::error::JournalError;
use tradejournal::domain::trade::TradeRecord;
use tradejournal::ports::trade_port::TradeSource;

pub struct MockTradeSource {
    pub trades: Vec<TradeRecord>,
    pub error: Option<String>,
}

impl MockTradeSource {
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            error: None,
        }
    }

    pub fn with_trades(mut self, trades: Vec<TradeRecord>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl TradeSource for MockTradeSource {
    fn list_trades(&self) -> Result<Vec<TradeRecord>, JournalError> {
        if let Some(reason) = &self.error {
            return Err(JournalError::TradeSource {
                source_name: self.describe(),
                reason: reason.clone(),
            });
        }
        Ok(self.trades.clone())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// A closed trade entered at midnight UTC on `date` (`YYYY-MM-DD`).
pub fn closed_trade(symbol: &str, date: &str, pnl: f64) -> TradeRecord {
    TradeRecord {
        id: Some(format!("{symbol}-{date}")),
        symbol: Some(symbol.to_string()),
        asset_type: Some("stock".to_string()),
        side: Some("buy".to_string()),
        status: Some("closed".to_string()),
        quantity: Some(10.0),
        entry_price: Some(100.0),
        exit_price: Some(100.0 + pnl / 10.0),
        pnl: Some(pnl),
        entry_date: Some(date.into()),
        exit_date: Some(date.into()),
        ..Default::default()
    }
}

pub fn open_trade(symbol: &str, date: &str, quantity: f64, entry_price: f64) -> TradeRecord {
    TradeRecord {
        id: Some(format!("{symbol}-{date}")),
        symbol: Some(symbol.to_string()),
        asset_type: Some("stock".to_string()),
        side: Some("buy".to_string()),
        status: Some("open".to_string()),
        quantity: Some(quantity),
        entry_price: Some(entry_price),
        entry_date: Some(date.into()),
        ..Default::default()
    }
}

pub fn with_asset(mut trade: TradeRecord, asset: &str) -> TradeRecord {
    trade.asset_type = Some(asset.to_string());
    trade
}

pub fn with_account(mut trade: TradeRecord, account: &str) -> TradeRecord {
    trade.account_id = Some(account.to_string());
    trade
}
