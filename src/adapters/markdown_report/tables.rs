//! Markdown table formatting for journal reports.
//!
//! Provides functions to generate Markdown for:
//! - Headline dashboard figures
//! - Monthly performance and asset type breakdowns
//! - Cumulative P&L curve
//! - Recent trades
//! - Extended statistics

use crate::domain::analytics::{AssetTypeSlice, DashboardAnalytics, MonthlyPerformance, PnlPoint};
use crate::domain::calculations::format_holding_time;
use crate::domain::stats::TradeStats;
use crate::domain::trade::TradeRecord;

pub fn format_signed(value: f64) -> String {
    format!("{value:+.2}")
}

fn format_pct(value: f64) -> String {
    format!("{value:.1}%")
}

fn table_header(columns: &[&str], right_aligned_from: usize) -> String {
    let mut out = format!("| {} |\n|", columns.join(" | "));
    for i in 0..columns.len() {
        out.push_str(if i >= right_aligned_from { "---:|" } else { "---|" });
    }
    out.push('\n');
    out
}

pub fn render_summary_table(a: &DashboardAnalytics) -> String {
    let rows: [(&str, String); 14] = [
        ("Total Trades", a.total_trades.to_string()),
        ("Open Positions", a.open_trades.to_string()),
        ("Closed Trades", a.closed_trades.to_string()),
        ("Total P&L", format_signed(a.total_pnl)),
        ("Total Volume", format!("{:.2}", a.total_volume)),
        ("Winning Trades", a.winning_trades.to_string()),
        ("Losing Trades", a.losing_trades.to_string()),
        ("Win Rate", format_pct(a.win_rate)),
        ("Average Win", format!("{:.2}", a.average_win)),
        ("Average Loss", format!("{:.2}", a.average_loss)),
        ("Profit Factor", format!("{:.2}", a.profit_factor)),
        ("Max Drawdown", format!("{:.2}", a.max_drawdown)),
        ("Best Trade", format_signed(a.best_trade)),
        ("Worst Trade", format_signed(a.worst_trade)),
    ];

    let mut out = table_header(&["Metric", "Value"], 1);
    for (label, value) in rows {
        out.push_str(&format!("| {label} | {value} |\n"));
    }
    out
}

pub fn render_monthly_table(months: &[MonthlyPerformance]) -> String {
    if months.is_empty() {
        return "_No closed trades._\n".to_string();
    }

    let mut out = table_header(&["Month", "P&L", "Trades"], 1);
    for m in months {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            m.month,
            format_signed(m.pnl),
            m.trades
        ));
    }
    out
}

pub fn render_asset_table(slices: &[AssetTypeSlice]) -> String {
    if slices.is_empty() {
        return "_No trades._\n".to_string();
    }

    let total: f64 = slices.iter().fold(0.0, |acc, s| acc + s.value);
    let mut out = table_header(&["Asset Type", "Volume", "Share", "Trades"], 1);
    for s in slices {
        let share = if total > 0.0 { s.value / total * 100.0 } else { 0.0 };
        out.push_str(&format!(
            "| {} | {:.2} | {} | {} |\n",
            s.name,
            s.value,
            format_pct(share),
            s.trades
        ));
    }
    out
}

pub fn render_pnl_curve(points: &[PnlPoint]) -> String {
    if points.is_empty() {
        return "_No closed trades._\n".to_string();
    }

    let mut out = table_header(&["#", "Date", "P&L", "Cumulative"], 2);
    for (i, p) in points.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            i + 1,
            p.date.format("%Y-%m-%d"),
            format_signed(p.pnl),
            format_signed(p.cumulative)
        ));
    }
    out
}

fn cell(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

fn price_cell(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_recent_trades(trades: &[TradeRecord]) -> String {
    if trades.is_empty() {
        return "_No trades recorded._\n".to_string();
    }

    let mut out = table_header(
        &["Entry", "Symbol", "Side", "Status", "Qty", "Entry Px", "Exit Px", "P&L", "Held"],
        4,
    );
    for t in trades {
        let entered = t.entry_timestamp();
        let entry_cell = entered
            .map(|e| e.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let held = entered
            .map(|e| format_holding_time(e, t.exit_timestamp()))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            entry_cell,
            cell(t.symbol.as_deref()),
            cell(t.side.as_deref()),
            cell(t.status.as_deref()),
            t.quantity().map(|q| q.to_string()).unwrap_or_else(|| "-".to_string()),
            price_cell(t.entry_price),
            price_cell(t.exit_price),
            t.pnl().map(format_signed).unwrap_or_else(|| "-".to_string()),
            held,
        ));
    }
    out
}

pub fn render_stats_table(s: &TradeStats) -> String {
    let rows: [(&str, String); 17] = [
        ("Break-even Trades", s.break_even_trades.to_string()),
        ("Average P&L", format_signed(s.average_pnl)),
        ("Expectancy", format_signed(s.expectancy)),
        ("Gross Profit Factor", format!("{:.2}", s.profit_factor)),
        ("Payoff Ratio", format!("{:.2}", s.payoff_ratio)),
        ("Max Consecutive Wins", s.max_consecutive_wins.to_string()),
        ("Max Consecutive Losses", s.max_consecutive_losses.to_string()),
        ("Current Streak", format!("{:+}", s.current_streak)),
        ("Sharpe Ratio", format!("{:.2}", s.sharpe_ratio)),
        ("Sortino Ratio", format!("{:.2}", s.sortino_ratio)),
        ("Calmar Ratio", format!("{:.2}", s.calmar_ratio)),
        ("Max Drawdown", format!("{:.2}", s.max_drawdown)),
        ("Max Drawdown %", format_pct(s.max_drawdown_percent)),
        ("Average R-Multiple", format!("{:.2}", s.r_multiple_average)),
        ("Kelly %", format_pct(s.kelly_percentage)),
        ("Average Holding (days)", format!("{:.1}", s.average_holding_days)),
        ("Closed Trades", s.closed_trades.to_string()),
    ];

    let mut out = table_header(&["Statistic", "Value"], 1);
    for (label, value) in rows {
        out.push_str(&format!("| {label} | {value} |\n"));
    }
    out
}
