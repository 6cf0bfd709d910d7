//! Per-trade arithmetic shared by statistics, validation and reports.

use super::trade::TradeSide;
use chrono::{DateTime, Utc};

/// Kelly fractions above this are capped when sizing from journal history.
pub const KELLY_CAP_PCT: f64 = 25.0;

pub fn calculate_pnl(entry_price: f64, exit_price: f64, quantity: f64, side: TradeSide) -> f64 {
    side.sign() * (exit_price - entry_price) * quantity
}

pub fn calculate_pnl_percent(entry_price: f64, exit_price: f64, side: TradeSide) -> f64 {
    if entry_price <= 0.0 {
        return 0.0;
    }
    side.sign() * (exit_price - entry_price) / entry_price * 100.0
}

/// Reward over risk for a planned trade.
pub fn calculate_risk_reward(entry_price: f64, stop_loss: f64, take_profit: f64) -> f64 {
    let risk = (entry_price - stop_loss).abs();
    let reward = (take_profit - entry_price).abs();
    if risk > 0.0 { reward / risk } else { 0.0 }
}

pub fn calculate_r_multiple(pnl: f64, entry_price: f64, stop_loss: f64, quantity: f64) -> f64 {
    let risk = (entry_price - stop_loss).abs() * quantity;
    if risk > 0.0 { pnl / risk } else { 0.0 }
}

/// Kelly percentage from a win rate in percent, clamped to `[0, KELLY_CAP_PCT]`.
pub fn calculate_kelly_percentage(win_rate_pct: f64, average_win: f64, average_loss: f64) -> f64 {
    if average_loss == 0.0 || average_win == 0.0 {
        return 0.0;
    }
    let b = average_win / average_loss;
    let p = win_rate_pct / 100.0;
    let q = 1.0 - p;
    let kelly = (p * b - q) / b;
    (kelly * 100.0).clamp(0.0, KELLY_CAP_PCT)
}

/// Human holding time: whole days, else hours, else minutes.
pub fn format_holding_time(entry: DateTime<Utc>, exit: Option<DateTime<Utc>>) -> String {
    let Some(exit) = exit else {
        return "Open".to_string();
    };
    let held = exit - entry;
    if held.num_days() > 0 {
        format!("{}d", held.num_days())
    } else if held.num_hours() > 0 {
        format!("{}h", held.num_hours())
    } else {
        format!("{}m", held.num_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    #[test]
    fn pnl_long_and_short() {
        assert_relative_eq!(calculate_pnl(100.0, 110.0, 5.0, TradeSide::Buy), 50.0);
        assert_relative_eq!(calculate_pnl(100.0, 110.0, 5.0, TradeSide::Sell), -50.0);
        assert_relative_eq!(calculate_pnl(100.0, 90.0, 5.0, TradeSide::Sell), 50.0);
    }

    #[test]
    fn pnl_percent() {
        assert_relative_eq!(calculate_pnl_percent(200.0, 210.0, TradeSide::Buy), 5.0);
        assert_relative_eq!(calculate_pnl_percent(200.0, 210.0, TradeSide::Sell), -5.0);
        assert_relative_eq!(calculate_pnl_percent(0.0, 210.0, TradeSide::Buy), 0.0);
    }

    #[test]
    fn risk_reward() {
        assert_relative_eq!(calculate_risk_reward(100.0, 95.0, 115.0), 3.0);
        assert_relative_eq!(calculate_risk_reward(100.0, 100.0, 115.0), 0.0);
    }

    #[test]
    fn r_multiple() {
        assert_relative_eq!(calculate_r_multiple(100.0, 50.0, 45.0, 10.0), 2.0);
        assert_relative_eq!(calculate_r_multiple(-25.0, 50.0, 45.0, 10.0), -0.5);
        assert_relative_eq!(calculate_r_multiple(100.0, 50.0, 50.0, 10.0), 0.0);
    }

    #[test]
    fn kelly_is_clamped() {
        // p = 0.6, b = 2 -> (1.2 - 0.4) / 2 = 0.4 -> 40%, capped at 25%.
        assert_relative_eq!(calculate_kelly_percentage(60.0, 200.0, 100.0), 25.0);
        // p = 0.5, b = 1.5 -> (0.75 - 0.5) / 1.5 = 16.67%
        assert_relative_eq!(
            calculate_kelly_percentage(50.0, 150.0, 100.0),
            100.0 / 6.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(calculate_kelly_percentage(20.0, 100.0, 100.0), 0.0);
        assert_relative_eq!(calculate_kelly_percentage(60.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn holding_time_units() {
        let entry = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        assert_eq!(format_holding_time(entry, None), "Open");
        assert_eq!(format_holding_time(entry, Some(entry + Duration::days(3))), "3d");
        assert_eq!(format_holding_time(entry, Some(entry + Duration::hours(5))), "5h");
        assert_eq!(format_holding_time(entry, Some(entry + Duration::minutes(42))), "42m");
    }
}
