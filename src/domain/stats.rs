//! Extended journal statistics: streaks, risk-adjusted ratios and R-multiples.
//!
//! Unlike the dashboard figures, a trade is treated as closed here when it has
//! both an exit price and a realized P&L, whatever its status text says.
//! Trades are replayed in entry order.

use super::calculations::{calculate_kelly_percentage, calculate_pnl_percent, calculate_r_multiple};
use super::normalize::{NormalizedTrade, normalize_all};
use super::trade::TradeRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStats {
    pub total_trades: usize,
    pub closed_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub break_even_trades: usize,
    pub win_rate: f64,
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
    #[serde(rename = "averagePnL")]
    pub average_pnl: f64,
    pub expectancy: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub average_win: f64,
    pub average_loss: f64,
    /// Gross wins over gross losses.
    pub profit_factor: f64,
    pub payoff_ratio: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    /// Positive while winning, negative while losing.
    pub current_streak: i64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_percent: f64,
    pub r_multiple_average: f64,
    pub kelly_percentage: f64,
    pub average_holding_days: f64,
}

struct ClosedTrade<'t, 'r> {
    trade: &'t NormalizedTrade<'r>,
    pnl: f64,
}

impl ClosedTrade<'_, '_> {
    /// Recorded percent return, else derived from prices and side, else zero.
    fn percent_return(&self) -> f64 {
        let record = self.trade.record;
        if let Some(pct) = record.pnl_percent.filter(|p| p.is_finite()) {
            return pct;
        }
        match (record.exit_price, record.side()) {
            (Some(exit), Some(side)) if exit.is_finite() => {
                calculate_pnl_percent(self.trade.entry_price, exit, side)
            }
            _ => 0.0,
        }
    }

    fn r_multiple(&self) -> Option<f64> {
        let stop = self.trade.record.stop_loss.filter(|s| s.is_finite() && *s != 0.0)?;
        if self.trade.entry_price == 0.0 || self.pnl == 0.0 {
            return None;
        }
        Some(calculate_r_multiple(
            self.pnl,
            self.trade.entry_price,
            stop,
            self.trade.quantity,
        ))
    }

    fn holding_days(&self) -> Option<f64> {
        if self.trade.timestamp_fallback {
            return None;
        }
        let exit = self.trade.record.exit_timestamp()?;
        Some((exit - self.trade.entered_at).num_seconds() as f64 / SECONDS_PER_DAY)
    }
}

impl TradeStats {
    pub fn compute(records: &[TradeRecord], risk_free_rate: f64) -> Self {
        Self::compute_at(records, risk_free_rate, Utc::now())
    }

    pub fn compute_at(records: &[TradeRecord], risk_free_rate: f64, now: DateTime<Utc>) -> Self {
        let mut trades = normalize_all(records, now);
        trades.sort_by_key(|t| (t.entered_at, t.index));

        let closed: Vec<ClosedTrade<'_, '_>> = trades
            .iter()
            .filter(|t| t.record.exit_price.is_some())
            .filter_map(|t| t.pnl.map(|pnl| ClosedTrade { trade: t, pnl }))
            .collect();

        let wins: Vec<f64> = closed.iter().map(|c| c.pnl).filter(|&p| p > 0.0).collect();
        let losses: Vec<f64> = closed.iter().map(|c| c.pnl).filter(|&p| p < 0.0).collect();

        let total_pnl = sum(closed.iter().map(|c| c.pnl));
        let gross_wins = sum(wins.iter().copied());
        let gross_losses = sum(losses.iter().copied()).abs();

        let average_pnl = mean_of(total_pnl, closed.len());
        let average_win = mean_of(gross_wins, wins.len());
        let average_loss = mean_of(gross_losses, losses.len());
        let win_rate = if closed.is_empty() {
            0.0
        } else {
            wins.len() as f64 / closed.len() as f64 * 100.0
        };

        let streaks = compute_streaks(&closed);
        let (max_drawdown, max_drawdown_percent) = compute_drawdown(&closed);

        let returns: Vec<f64> = closed.iter().map(ClosedTrade::percent_return).collect();
        let (sharpe_ratio, sortino_ratio) = compute_risk_adjusted(&returns, risk_free_rate);

        let r_multiples: Vec<f64> = closed.iter().filter_map(ClosedTrade::r_multiple).collect();
        let holding: Vec<f64> = closed.iter().filter_map(ClosedTrade::holding_days).collect();

        TradeStats {
            total_trades: trades.len(),
            closed_trades: closed.len(),
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            break_even_trades: closed.len() - wins.len() - losses.len(),
            win_rate,
            total_pnl,
            average_pnl,
            expectancy: average_pnl,
            best_trade: wins.iter().copied().reduce(f64::max).unwrap_or(0.0),
            worst_trade: losses.iter().copied().reduce(f64::min).unwrap_or(0.0),
            average_win,
            average_loss,
            profit_factor: if gross_losses > 0.0 {
                gross_wins / gross_losses
            } else {
                0.0
            },
            payoff_ratio: if average_loss > 0.0 {
                average_win / average_loss
            } else {
                0.0
            },
            max_consecutive_wins: streaks.max_wins,
            max_consecutive_losses: streaks.max_losses,
            current_streak: streaks.current,
            sharpe_ratio,
            sortino_ratio,
            calmar_ratio: total_pnl / if max_drawdown == 0.0 { 1.0 } else { max_drawdown },
            max_drawdown,
            max_drawdown_percent,
            r_multiple_average: mean_of(sum(r_multiples.iter().copied()), r_multiples.len()),
            kelly_percentage: calculate_kelly_percentage(win_rate, average_win, average_loss),
            average_holding_days: mean_of(sum(holding.iter().copied()), holding.len()),
        }
    }
}

fn sum(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

fn mean_of(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

struct Streaks {
    max_wins: usize,
    max_losses: usize,
    current: i64,
}

/// A trade that did not make money extends a losing streak.
fn compute_streaks(closed: &[ClosedTrade<'_, '_>]) -> Streaks {
    let mut streaks = Streaks {
        max_wins: 0,
        max_losses: 0,
        current: 0,
    };
    let mut wins = 0usize;
    let mut losses = 0usize;

    for trade in closed {
        if trade.pnl > 0.0 {
            wins += 1;
            losses = 0;
            streaks.max_wins = streaks.max_wins.max(wins);
            streaks.current = wins as i64;
        } else {
            losses += 1;
            wins = 0;
            streaks.max_losses = streaks.max_losses.max(losses);
            streaks.current = -(losses as i64);
        }
    }

    streaks
}

/// Absolute and percentage drawdown of the cumulative P&L, peak starting at zero.
/// The percentage is the one observed at the absolute maximum.
fn compute_drawdown(closed: &[ClosedTrade<'_, '_>]) -> (f64, f64) {
    let mut equity = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;
    let mut max_dd_pct = 0.0_f64;

    for trade in closed {
        equity += trade.pnl;
        if equity > peak {
            peak = equity;
        }
        let dd = peak - equity;
        if dd > max_dd {
            max_dd = dd;
            max_dd_pct = if peak > 0.0 { dd / peak * 100.0 } else { 0.0 };
        }
    }

    (max_dd, max_dd_pct)
}

fn compute_risk_adjusted(returns: &[f64], risk_free_rate: f64) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }

    let n = returns.len() as f64;
    let mean = sum(returns.iter().copied()) / n;
    let variance = sum(returns.iter().map(|r| (r - mean).powi(2))) / n;
    let stddev = variance.sqrt();

    let sharpe = if stddev > 0.0 {
        (mean - risk_free_rate) / stddev
    } else {
        0.0
    };

    let downside: Vec<f64> = returns
        .iter()
        .copied()
        .filter(|&r| r < risk_free_rate)
        .collect();
    if downside.is_empty() {
        return (sharpe, 0.0);
    }
    let downside_dev = (sum(downside.iter().map(|r| (r - risk_free_rate).powi(2)))
        / downside.len() as f64)
        .sqrt();
    let sortino = if downside_dev > 0.0 {
        (mean - risk_free_rate) / downside_dev
    } else {
        0.0
    };

    (sharpe, sortino)
}
