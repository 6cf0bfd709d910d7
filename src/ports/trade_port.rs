//! Trade source port trait.

use crate::domain::error::JournalError;
use crate::domain::trade::TradeRecord;

/// Supplies the current user's trade collection on demand.
pub trait TradeSource {
    fn list_trades(&self) -> Result<Vec<TradeRecord>, JournalError>;

    /// Human-readable origin, used in log lines and error messages.
    fn describe(&self) -> String;
}
