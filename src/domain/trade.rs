//! Trade records as they arrive from the journal store, plus the enumerations
//! used to interpret them.
//!
//! Records are deliberately loose: every field is optional, numbers may arrive
//! as text and timestamps come in several shapes. Interpretation happens through
//! the accessor methods so that a single malformed field never rejects a record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Stock,
    Forex,
    Crypto,
    Futures,
    Options,
}

impl AssetType {
    pub const ALL: [AssetType; 5] = [
        AssetType::Stock,
        AssetType::Forex,
        AssetType::Crypto,
        AssetType::Futures,
        AssetType::Options,
    ];

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stock" => Some(AssetType::Stock),
            "forex" => Some(AssetType::Forex),
            "crypto" => Some(AssetType::Crypto),
            "futures" => Some(AssetType::Futures),
            "options" => Some(AssetType::Options),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Forex => "forex",
            AssetType::Crypto => "crypto",
            AssetType::Futures => "futures",
            AssetType::Options => "options",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a trade. `long` and `short` collapse onto buy and sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" | "long" => Some(TradeSide::Buy),
            "sell" | "short" => Some(TradeSide::Sell),
            _ => None,
        }
    }

    /// +1 for buys, -1 for sells.
    pub fn sign(self) -> f64 {
        match self {
            TradeSide::Buy => 1.0,
            TradeSide::Sell => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
    Closed,
    Cancelled,
}

impl TradeStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Some(TradeStatus::Open),
            "closed" => Some(TradeStatus::Closed),
            "cancelled" | "canceled" => Some(TradeStatus::Cancelled),
            _ => None,
        }
    }
}

/// A timestamp in any of the shapes the journal store has produced over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    /// Milliseconds since the Unix epoch.
    Millis(f64),
    /// Document-store timestamp object.
    Epoch { seconds: i64, nanoseconds: u32 },
    /// Present but not a timestamp shape we recognise.
    Invalid,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampRepr {
    Text(String),
    Millis(f64),
    Epoch {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Other(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for RawTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match TimestampRepr::deserialize(deserializer)? {
            TimestampRepr::Text(text) => RawTimestamp::Text(text),
            TimestampRepr::Millis(ms) => RawTimestamp::Millis(ms),
            TimestampRepr::Epoch {
                seconds,
                nanoseconds,
            } => RawTimestamp::Epoch {
                seconds,
                nanoseconds,
            },
            TimestampRepr::Other(_) => RawTimestamp::Invalid,
        })
    }
}

impl RawTimestamp {
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Text(text) => parse_timestamp_text(text),
            RawTimestamp::Millis(ms) if ms.is_finite() => {
                DateTime::from_timestamp_millis(*ms as i64)
            }
            RawTimestamp::Millis(_) => None,
            RawTimestamp::Epoch {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            RawTimestamp::Invalid => None,
        }
    }

    /// Whether the value counts as given. Blank text and a zero epoch do not.
    pub fn is_set(&self) -> bool {
        match self {
            RawTimestamp::Text(text) => !text.trim().is_empty(),
            RawTimestamp::Millis(ms) => *ms != 0.0 && !ms.is_nan(),
            RawTimestamp::Epoch { .. } | RawTimestamp::Invalid => true,
        }
    }
}

impl From<&str> for RawTimestamp {
    fn from(text: &str) -> Self {
        RawTimestamp::Text(text.to_string())
    }
}

/// Parse RFC 3339, naive ISO date-times (taken as UTC) and bare `YYYY-MM-DD`
/// dates (UTC midnight).
pub fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Accepts a JSON number or numeric text; anything else reads as absent.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberRepr {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<NumberRepr>::deserialize(deserializer)? {
        Some(NumberRepr::Number(n)) => Some(n),
        Some(NumberRepr::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(NumberRepr::Other(_)) | None => None,
    })
}

/// Accepts text, or a number rendered as text; anything else reads as absent.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextRepr {
        Text(String),
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<TextRepr>::deserialize(deserializer)? {
        Some(TextRepr::Text(text)) => Some(text),
        Some(TextRepr::Number(n)) => Some(n.to_string()),
        Some(TextRepr::Other(_)) | None => None,
    })
}

/// Keeps the string elements of a tag list; any other shape reads as absent.
fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagRepr {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagsRepr {
        List(Vec<TagRepr>),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<TagsRepr>::deserialize(deserializer)? {
        Some(TagsRepr::List(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    TagRepr::Text(tag) => Some(tag),
                    TagRepr::Other(_) => None,
                })
                .collect(),
        ),
        Some(TagsRepr::Other(_)) | None => None,
    })
}

/// One logged trade, as stored by the journal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub account_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub asset_type: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub side: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub size: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub entry_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub exit_price: Option<f64>,
    pub entry_date_time: Option<RawTimestamp>,
    pub entry_date: Option<RawTimestamp>,
    pub exit_date_time: Option<RawTimestamp>,
    pub exit_date: Option<RawTimestamp>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub pnl: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub pnl_percent: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub stop_loss: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub take_profit: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub commission: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub fees: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub strategy: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub strategy_id: Option<String>,
    #[serde(deserialize_with = "lenient_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub timezone: Option<String>,
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

impl TradeRecord {
    pub fn status(&self) -> Option<TradeStatus> {
        self.status.as_deref().and_then(TradeStatus::parse)
    }

    pub fn asset_type(&self) -> Option<AssetType> {
        self.asset_type.as_deref().and_then(AssetType::parse)
    }

    pub fn side(&self) -> Option<TradeSide> {
        self.side.as_deref().and_then(TradeSide::parse)
    }

    /// First usable value of `size`, then `quantity`. Zero counts as unset.
    pub fn quantity(&self) -> Option<f64> {
        usable(self.size).or_else(|| usable(self.quantity))
    }

    /// Realized P&L, only when it is a finite number.
    pub fn pnl(&self) -> Option<f64> {
        self.pnl.filter(|v| v.is_finite())
    }

    /// The first set value of `entryDateTime`, then `entryDate`, parsed. A set
    /// but unparseable `entryDateTime` does not fall through to `entryDate`.
    pub fn entry_timestamp(&self) -> Option<DateTime<Utc>> {
        first_set(&self.entry_date_time, &self.entry_date).and_then(RawTimestamp::parse)
    }

    /// The first set value of `exitDateTime`, then `exitDate`, parsed.
    pub fn exit_timestamp(&self) -> Option<DateTime<Utc>> {
        first_set(&self.exit_date_time, &self.exit_date).and_then(RawTimestamp::parse)
    }

    pub fn has_entry_timestamp(&self) -> bool {
        first_set(&self.entry_date_time, &self.entry_date).is_some()
    }

    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.symbol.as_deref())
            .unwrap_or("<unnamed>")
    }
}

fn first_set<'a>(
    primary: &'a Option<RawTimestamp>,
    alias: &'a Option<RawTimestamp>,
) -> Option<&'a RawTimestamp> {
    [primary, alias]
        .into_iter()
        .flatten()
        .find(|t| t.is_set())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn asset_type_parse_is_case_insensitive() {
        assert_eq!(AssetType::parse("STOCK"), Some(AssetType::Stock));
        assert_eq!(AssetType::parse("Crypto"), Some(AssetType::Crypto));
        assert_eq!(AssetType::parse(" forex "), Some(AssetType::Forex));
        assert_eq!(AssetType::parse("bonds"), None);
        assert_eq!(AssetType::Options.to_string(), "options");
    }

    #[test]
    fn side_long_short_collapse() {
        assert_eq!(TradeSide::parse("LONG"), Some(TradeSide::Buy));
        assert_eq!(TradeSide::parse("short"), Some(TradeSide::Sell));
        assert_eq!(TradeSide::parse("Buy"), Some(TradeSide::Buy));
        assert_eq!(TradeSide::parse("hold"), None);
        assert_eq!(TradeSide::Sell.sign(), -1.0);
    }

    #[test]
    fn status_parse() {
        assert_eq!(TradeStatus::parse("CLOSED"), Some(TradeStatus::Closed));
        assert_eq!(TradeStatus::parse("Open"), Some(TradeStatus::Open));
        assert_eq!(TradeStatus::parse("canceled"), Some(TradeStatus::Cancelled));
        assert_eq!(TradeStatus::parse("pending"), None);
    }

    #[test]
    fn parse_timestamp_text_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 20, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp_text("2025-01-20T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp_text("2025-01-20T09:30:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp_text("2025-01-20T11:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp_text("2025-01-20T09:30:00"), Some(expected));
        assert_eq!(parse_timestamp_text("2025-01-20 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp_text("2025-01-20T09:30"), Some(expected));
        assert_eq!(
            parse_timestamp_text("2025-01-20"),
            Some(Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp_text(""), None);
        assert_eq!(parse_timestamp_text("yesterday"), None);
    }

    #[test]
    fn deserialize_seeded_trade() {
        let json = r#"{
            "symbol": "AAPL",
            "assetType": "STOCK",
            "side": "BUY",
            "quantity": 100,
            "entryPrice": 175.50,
            "exitPrice": 182.30,
            "entryDate": "2025-01-20T09:30:00Z",
            "exitDate": "2025-01-22T15:45:00Z",
            "pnl": 680,
            "status": "CLOSED",
            "strategy": "Momentum Trading",
            "tags": ["tech", "earnings-play"]
        }"#;
        let trade: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(trade.symbol.as_deref(), Some("AAPL"));
        assert_eq!(trade.asset_type(), Some(AssetType::Stock));
        assert_eq!(trade.side(), Some(TradeSide::Buy));
        assert_eq!(trade.quantity(), Some(100.0));
        assert_eq!(trade.status(), Some(TradeStatus::Closed));
        assert_eq!(trade.pnl(), Some(680.0));
        assert_eq!(
            trade.entry_timestamp(),
            Some(Utc.with_ymd_and_hms(2025, 1, 20, 9, 30, 0).unwrap())
        );
        assert_eq!(
            trade.tags,
            Some(vec!["tech".to_string(), "earnings-play".to_string()])
        );
    }

    #[test]
    fn deserialize_lenient_numbers() {
        let json = r#"{"size": "12.5", "entryPrice": "abc", "pnl": null, "fees": [1]}"#;
        let trade: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(trade.size, Some(12.5));
        assert_eq!(trade.entry_price, None);
        assert_eq!(trade.pnl, None);
        assert_eq!(trade.fees, None);
    }

    #[test]
    fn deserialize_timestamp_shapes() {
        let json = r#"{
            "entryDateTime": {"_seconds": 1737365400, "_nanoseconds": 0},
            "entryDate": 1737365400000,
            "exitDateTime": true
        }"#;
        let trade: TradeRecord = serde_json::from_str(json).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 1, 20, 9, 30, 0).unwrap();
        assert_eq!(trade.entry_date_time.as_ref().and_then(|t| t.parse()), Some(expected));
        assert_eq!(trade.entry_date.as_ref().and_then(|t| t.parse()), Some(expected));
        assert_eq!(trade.exit_date_time, Some(RawTimestamp::Invalid));
        assert_eq!(trade.exit_timestamp(), None);
    }

    #[test]
    fn quantity_prefers_size_alias() {
        let trade = TradeRecord {
            size: Some(3.0),
            quantity: Some(7.0),
            ..Default::default()
        };
        assert_eq!(trade.quantity(), Some(3.0));

        let trade = TradeRecord {
            size: Some(0.0),
            quantity: Some(7.0),
            ..Default::default()
        };
        assert_eq!(trade.quantity(), Some(7.0));

        assert_eq!(TradeRecord::default().quantity(), None);
    }

    #[test]
    fn entry_timestamp_uses_first_set_alias() {
        let trade = TradeRecord {
            entry_date_time: Some("not a date".into()),
            entry_date: Some("2024-03-05".into()),
            ..Default::default()
        };
        assert_eq!(trade.entry_timestamp(), None);
        assert!(trade.has_entry_timestamp());

        let trade = TradeRecord {
            entry_date_time: Some("  ".into()),
            entry_date: Some("2024-03-05".into()),
            ..Default::default()
        };
        assert_eq!(
            trade.entry_timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );

        let trade = TradeRecord {
            entry_date_time: Some(RawTimestamp::Millis(0.0)),
            ..Default::default()
        };
        assert!(!trade.has_entry_timestamp());
    }

    #[test]
    fn deserialize_lenient_text_fields() {
        let json = r#"{
            "id": 42,
            "symbol": "AAPL",
            "strategy": 7,
            "notes": {"text": "oops"},
            "side": ["buy"],
            "tags": "swing"
        }"#;
        let trade: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(trade.id.as_deref(), Some("42"));
        assert_eq!(trade.symbol.as_deref(), Some("AAPL"));
        assert_eq!(trade.strategy.as_deref(), Some("7"));
        assert_eq!(trade.notes, None);
        assert_eq!(trade.side, None);
        assert_eq!(trade.tags, None);

        let trade: TradeRecord =
            serde_json::from_str(r#"{"tags": ["tech", 3, null, "swing"]}"#).unwrap();
        assert_eq!(
            trade.tags,
            Some(vec!["tech".to_string(), "swing".to_string()])
        );
    }

    #[test]
    fn pnl_ignores_non_finite() {
        let trade = TradeRecord {
            pnl: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(trade.pnl(), None);
    }

    #[test]
    fn label_prefers_id() {
        let trade = TradeRecord {
            id: Some("t-1".into()),
            symbol: Some("AAPL".into()),
            ..Default::default()
        };
        assert_eq!(trade.label(), "t-1");
        assert_eq!(TradeRecord::default().label(), "<unnamed>");
    }
}
