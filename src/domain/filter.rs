//! Narrowing a trade collection by account, asset type and entry date.

use super::trade::{AssetType, TradeRecord};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeFilter {
    pub account_id: Option<String>,
    pub asset_type: Option<AssetType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TradeFilter {
    pub fn is_empty(&self) -> bool {
        self.account_id.is_none()
            && self.asset_type.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Date bounds are inclusive whole UTC days. Records whose entry time does
    /// not parse are dropped only when a bound is set.
    pub fn matches(&self, record: &TradeRecord) -> bool {
        if let Some(account) = &self.account_id {
            if record.account_id.as_deref() != Some(account.as_str()) {
                return false;
            }
        }
        if let Some(asset) = self.asset_type {
            if record.asset_type() != Some(asset) {
                return false;
            }
        }
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Some(entered) = record.entry_timestamp() else {
            return false;
        };
        if let Some(start) = self.start_date {
            if entered < start_of_day(start) {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if entered > end_of_day(end) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: Vec<TradeRecord>) -> Vec<TradeRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|| start_of_day(date))
}
