//! CSV file trade source.
//!
//! The first row names the columns. Header matching ignores case, underscores,
//! dashes and spaces, so `entry_price`, `entryPrice` and `Entry Price` are the
//! same column. Blank cells are absent values; tags are `;`-separated.

use crate::domain::error::JournalError;
use crate::domain::trade::{RawTimestamp, TradeRecord};
use crate::ports::trade_port::TradeSource;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

struct Row<'a> {
    record: &'a csv::StringRecord,
    columns: &'a HashMap<String, usize>,
}

impl Row<'_> {
    fn text(&self, column: &str) -> Option<String> {
        let index = *self.columns.get(column)?;
        self.record
            .get(index)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn number(&self, column: &str) -> Option<f64> {
        self.text(column).and_then(|v| v.parse().ok())
    }

    fn timestamp(&self, column: &str) -> Option<RawTimestamp> {
        self.text(column).map(RawTimestamp::Text)
    }

    fn tags(&self) -> Option<Vec<String>> {
        self.text("tags").map(|v| {
            v.split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    fn to_trade(&self) -> TradeRecord {
        TradeRecord {
            id: self.text("id"),
            user_id: self.text("userid"),
            account_id: self.text("accountid"),
            symbol: self.text("symbol"),
            asset_type: self.text("assettype"),
            side: self.text("side"),
            size: self.number("size"),
            quantity: self.number("quantity"),
            entry_price: self.number("entryprice"),
            exit_price: self.number("exitprice"),
            entry_date_time: self.timestamp("entrydatetime"),
            entry_date: self.timestamp("entrydate"),
            exit_date_time: self.timestamp("exitdatetime"),
            exit_date: self.timestamp("exitdate"),
            status: self.text("status"),
            pnl: self.number("pnl"),
            pnl_percent: self.number("pnlpercent"),
            stop_loss: self.number("stoploss"),
            take_profit: self.number("takeprofit"),
            commission: self.number("commission"),
            fees: self.number("fees"),
            strategy: self.text("strategy"),
            strategy_id: self.text("strategyid"),
            tags: self.tags(),
            notes: self.text("notes"),
            currency: self.text("currency"),
            timezone: self.text("timezone"),
        }
    }
}

/// Parse CSV content into trade records.
pub fn parse_trades(content: &str) -> Result<Vec<TradeRecord>, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: HashMap<String, usize> = rdr
        .headers()
        .map_err(|e| format!("CSV header error: {e}"))?
        .iter()
        .enumerate()
        .map(|(index, name)| (normalize_header(name), index))
        .collect();

    let mut trades = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| format!("CSV parse error: {e}"))?;
        let row = Row {
            record: &record,
            columns: &columns,
        };
        trades.push(row.to_trade());
    }
    Ok(trades)
}

impl TradeSource for CsvTradeAdapter {
    fn list_trades(&self) -> Result<Vec<TradeRecord>, JournalError> {
        let content = fs::read_to_string(&self.path).map_err(|e| JournalError::TradeSource {
            source_name: self.describe(),
            reason: format!("failed to read file: {e}"),
        })?;
        let trades = parse_trades(&content).map_err(|reason| JournalError::TradeSource {
            source_name: self.describe(),
            reason,
        })?;
        tracing::debug!(count = trades.len(), source = %self.describe(), "loaded trades");
        Ok(trades)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::TradeStatus;
    use tempfile::TempDir;

    const SAMPLE: &str = "id,symbol,asset_type,side,quantity,entry_price,exit_price,entry_date,status,pnl,tags\n\
        t1,AAPL,STOCK,BUY,100,175.50,182.30,2025-01-20T09:30:00Z,CLOSED,680,tech;earnings-play\n\
        t2,BTC,CRYPTO,LONG,0.5,42000,,2025-01-21,OPEN,,\n";

    #[test]
    fn normalize_header_variants() {
        assert_eq!(normalize_header("entry_price"), "entryprice");
        assert_eq!(normalize_header("entryPrice"), "entryprice");
        assert_eq!(normalize_header("Entry Price"), "entryprice");
        assert_eq!(normalize_header("entry-date-time"), "entrydatetime");
    }

    #[test]
    fn parses_rows() {
        let trades = parse_trades(SAMPLE).unwrap();
        assert_eq!(trades.len(), 2);

        let first = &trades[0];
        assert_eq!(first.id.as_deref(), Some("t1"));
        assert_eq!(first.quantity(), Some(100.0));
        assert_eq!(first.exit_price, Some(182.30));
        assert_eq!(first.status(), Some(TradeStatus::Closed));
        assert_eq!(first.pnl(), Some(680.0));
        assert_eq!(
            first.tags,
            Some(vec!["tech".to_string(), "earnings-play".to_string()])
        );
        assert!(first.entry_timestamp().is_some());

        let second = &trades[1];
        assert_eq!(second.exit_price, None);
        assert_eq!(second.pnl, None);
        assert_eq!(second.tags, None);
        assert_eq!(second.status(), Some(TradeStatus::Open));
    }

    #[test]
    fn camel_case_headers_and_size_alias() {
        let csv = "symbol,assetType,size,entryPrice,entryDateTime\nEURUSD,forex,10000,1.08,2024-05-01 08:00:00\n";
        let trades = parse_trades(csv).unwrap();
        assert_eq!(trades[0].size, Some(10000.0));
        assert_eq!(trades[0].asset_type.as_deref(), Some("forex"));
        assert!(trades[0].entry_timestamp().is_some());
    }

    #[test]
    fn unparseable_numbers_are_absent() {
        let csv = "symbol,pnl,entry_price\nX,n/a,abc\n";
        let trades = parse_trades(csv).unwrap();
        assert_eq!(trades[0].pnl, None);
        assert_eq!(trades[0].entry_price, None);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "symbol,status,pnl\nA,closed\n";
        let trades = parse_trades(csv).unwrap();
        assert_eq!(trades[0].status.as_deref(), Some("closed"));
        assert_eq!(trades[0].pnl, None);
    }

    #[test]
    fn list_trades_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        fs::write(&path, SAMPLE).unwrap();
        let trades = CsvTradeAdapter::new(path).list_trades().unwrap();
        assert_eq!(trades.len(), 2);
    }

    #[test]
    fn list_trades_missing_file() {
        let adapter = CsvTradeAdapter::new(PathBuf::from("/nonexistent/trades.csv"));
        assert!(matches!(
            adapter.list_trades(),
            Err(JournalError::TradeSource { .. })
        ));
    }
}
