//! Dashboard analytics: a single-pass reduction of the trade journal into the
//! figures the dashboard shows.
//!
//! A trade counts towards the realized statistics only when it is closed *and*
//! carries a P&L. Volume and asset distribution cover every record, open or not.

use super::normalize::{NormalizedTrade, normalize_all};
use super::trade::TradeRecord;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const RECENT_TRADES_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlPoint {
    pub date: NaiveDate,
    pub pnl: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTypeSlice {
    pub name: String,
    /// Summed quantity times entry price.
    pub value: f64,
    pub trades: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPerformance {
    /// `YYYY-MM`
    pub month: String,
    pub pnl: f64,
    pub trades: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub active_positions: usize,
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
    pub total_volume: f64,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage in [0, 100].
    pub win_rate: f64,
    pub average_win: f64,
    /// Magnitude of the average losing trade.
    pub average_loss: f64,
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub recent_trades: Vec<TradeRecord>,
    pub pnl_over_time: Vec<PnlPoint>,
    pub asset_type_distribution: Vec<AssetTypeSlice>,
    pub monthly_performance: Vec<MonthlyPerformance>,
}

impl DashboardAnalytics {
    /// Compute against the current wall-clock time, used as the entry timestamp
    /// of records that have none.
    pub fn compute(records: &[TradeRecord]) -> Self {
        Self::compute_at(records, Utc::now())
    }

    pub fn compute_at(records: &[TradeRecord], now: DateTime<Utc>) -> Self {
        let trades = normalize_all(records, now);

        let closed: Vec<(&NormalizedTrade<'_>, f64)> = trades
            .iter()
            .filter_map(|t| t.closed_pnl().map(|pnl| (t, pnl)))
            .collect();
        let open_trades = trades.iter().filter(|t| t.is_open()).count();

        let wins: Vec<f64> = closed.iter().map(|&(_, p)| p).filter(|&p| p > 0.0).collect();
        let losses: Vec<f64> = closed.iter().map(|&(_, p)| p).filter(|&p| p < 0.0).collect();

        let average_win = mean(&wins);
        let average_loss = mean(&losses).abs();
        let profit_factor = if average_loss > 0.0 {
            average_win / average_loss
        } else {
            0.0
        };

        let (best_trade, worst_trade) = if closed.is_empty() {
            (0.0, 0.0)
        } else {
            closed.iter().fold(
                (f64::NEG_INFINITY, f64::INFINITY),
                |(best, worst), &(_, p)| (best.max(p), worst.min(p)),
            )
        };

        let mut chronological = closed.clone();
        chronological.sort_by_key(|(t, _)| (t.entered_at, t.index));
        let (pnl_over_time, max_drawdown) = replay_equity(&chronological);

        DashboardAnalytics {
            total_trades: trades.len(),
            open_trades,
            closed_trades: closed.len(),
            active_positions: open_trades,
            total_pnl: sum(closed.iter().map(|&(_, p)| p)),
            total_volume: sum(trades.iter().map(NormalizedTrade::notional)),
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            win_rate: ratio(wins.len(), closed.len()) * 100.0,
            average_win,
            average_loss,
            profit_factor,
            max_drawdown,
            best_trade,
            worst_trade,
            recent_trades: recent_trades(&trades),
            pnl_over_time,
            asset_type_distribution: asset_type_distribution(&trades),
            monthly_performance: monthly_performance(&closed),
        }
    }
}

fn sum(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        sum(values.iter().copied()) / values.len() as f64
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Walk closed trades in entry order, building the cumulative curve and the
/// largest peak-to-trough decline. The peak starts at zero.
fn replay_equity(chronological: &[(&NormalizedTrade<'_>, f64)]) -> (Vec<PnlPoint>, f64) {
    let mut points = Vec::with_capacity(chronological.len());
    let mut cumulative = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;

    for &(trade, pnl) in chronological {
        cumulative += pnl;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = peak - cumulative;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
        points.push(PnlPoint {
            date: trade.entered_at.date_naive(),
            pnl,
            cumulative,
        });
    }

    (points, max_drawdown)
}

fn asset_type_distribution(trades: &[NormalizedTrade<'_>]) -> Vec<AssetTypeSlice> {
    let mut slices: Vec<AssetTypeSlice> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for trade in trades {
        let slot = *positions.entry(trade.asset_label.as_str()).or_insert_with(|| {
            slices.push(AssetTypeSlice {
                name: trade.asset_label.clone(),
                value: 0.0,
                trades: 0,
            });
            slices.len() - 1
        });
        slices[slot].value += trade.notional();
        slices[slot].trades += 1;
    }

    slices
}

fn monthly_performance(closed: &[(&NormalizedTrade<'_>, f64)]) -> Vec<MonthlyPerformance> {
    let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for &(trade, pnl) in closed {
        let key = trade.entered_at.format("%Y-%m").to_string();
        let entry = months.entry(key).or_insert((0.0, 0));
        entry.0 += pnl;
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|(month, (pnl, trades))| MonthlyPerformance { month, pnl, trades })
        .collect()
}

/// Most recent entries first; ties keep input order.
fn recent_trades(trades: &[NormalizedTrade<'_>]) -> Vec<TradeRecord> {
    let mut newest_first: Vec<&NormalizedTrade<'_>> = trades.iter().collect();
    newest_first.sort_by(|a, b| {
        b.entered_at
            .cmp(&a.entered_at)
            .then_with(|| a.index.cmp(&b.index))
    });
    newest_first
        .into_iter()
        .take(RECENT_TRADES_LIMIT)
        .map(|t| t.record.clone())
        .collect()
}
