//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::{InputFormat, ReportFormat};
use crate::domain::analytics::DashboardAnalytics;
use crate::domain::config_validation::{parse_config_date, validate_journal_config};
use crate::domain::error::JournalError;
use crate::domain::filter::TradeFilter;
use crate::domain::stats::TradeStats;
use crate::domain::trade::{AssetType, TradeRecord};
use crate::domain::validation::validate_trades;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::JournalReport;
use crate::ports::trade_port::TradeSource;

#[derive(Parser, Debug)]
#[command(name = "tradejournal", about = "Trading journal analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute dashboard analytics and optionally write a report
    Analyze(AnalyzeArgs),
    /// Print extended trade statistics
    Stats(StatsArgs),
    /// Check every trade record against the journal's field rules
    Validate(SourceArgs),
}

/// Where trades come from and which of them to keep.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Trade export file (JSON or CSV)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// INI config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Input format: json or csv (default: from extension)
    #[arg(long)]
    pub format: Option<String>,
    #[arg(long)]
    pub account: Option<String>,
    #[arg(long, value_parser = parse_asset_type)]
    pub asset_type: Option<AssetType>,
    /// First entry date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last entry date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Report file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Report format: markdown or json (default: from extension)
    #[arg(long)]
    pub report_format: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    /// Include extended statistics in the report
    #[arg(long)]
    pub with_stats: bool,
    #[arg(long)]
    pub risk_free_rate: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long)]
    pub risk_free_rate: Option<f64>,
}

fn parse_asset_type(value: &str) -> Result<AssetType, String> {
    AssetType::parse(value).ok_or_else(|| {
        let known: Vec<&str> = AssetType::ALL.iter().map(|a| a.as_str()).collect();
        format!("must be one of: {}", known.join(", "))
    })
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze(args) => analyze(&args).map(|_| ()),
        Command::Stats(args) => stats(&args).map(|_| ()),
        Command::Validate(args) => validate(&args).map(|_| ()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

/// Load and validate the config file, or an empty config when none is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, JournalError> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    tracing::info!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_journal_config(&adapter)?;
    Ok(adapter)
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> JournalError {
    JournalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Command-line flags win over the config file.
pub fn resolve_input(
    args: &SourceArgs,
    config: &dyn ConfigPort,
) -> Result<(PathBuf, InputFormat), JournalError> {
    let path = match &args.input {
        Some(p) => p.clone(),
        None => config
            .get_string("journal", "input")
            .map(PathBuf::from)
            .ok_or_else(|| JournalError::ConfigMissing {
                section: "journal".into(),
                key: "input".into(),
            })?,
    };

    let format = match args
        .format
        .clone()
        .or_else(|| config.get_string("journal", "format"))
    {
        Some(f) => InputFormat::parse(&f)
            .ok_or_else(|| invalid("journal", "format", "must be one of: json, csv"))?,
        None => InputFormat::from_path(&path),
    };

    Ok((path, format))
}

pub fn build_filter(args: &SourceArgs, config: &dyn ConfigPort) -> Result<TradeFilter, JournalError> {
    let asset_type = match args.asset_type {
        Some(a) => Some(a),
        None => match config.get_string("filter", "asset_type") {
            Some(value) => Some(
                AssetType::parse(&value)
                    .ok_or_else(|| invalid("filter", "asset_type", "unknown asset type"))?,
            ),
            None => None,
        },
    };

    let start_date = match args.from {
        Some(d) => Some(d),
        None => parse_config_date(config, "filter", "start_date")?,
    };
    let end_date = match args.to {
        Some(d) => Some(d),
        None => parse_config_date(config, "filter", "end_date")?,
    };
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(invalid(
                "filter",
                "start_date",
                "start_date must be on or before end_date",
            ));
        }
    }

    Ok(TradeFilter {
        account_id: args
            .account
            .clone()
            .or_else(|| config.get_string("filter", "account_id")),
        asset_type,
        start_date,
        end_date,
    })
}

pub fn resolve_risk_free_rate(flag: Option<f64>, config: &dyn ConfigPort) -> Result<f64, JournalError> {
    let rate = flag.unwrap_or_else(|| config.get_double("stats", "risk_free_rate", 0.0));
    if !(0.0..1.0).contains(&rate) {
        return Err(invalid(
            "stats",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(rate)
}

/// Fetch every record from the source and keep those the filter accepts.
pub fn load_trades(
    source: &dyn TradeSource,
    filter: &TradeFilter,
) -> Result<Vec<TradeRecord>, JournalError> {
    tracing::info!("Loading trades from {}", source.describe());
    let records = source.list_trades()?;
    let loaded = records.len();
    let kept = filter.apply(records);
    if !filter.is_empty() {
        tracing::info!("Filter kept {} of {} trades", kept.len(), loaded);
    }
    Ok(kept)
}

fn load_from_args(
    args: &SourceArgs,
) -> Result<(FileConfigAdapter, Vec<TradeRecord>), JournalError> {
    let config = load_config(args.config.as_deref())?;
    let (path, format) = resolve_input(args, &config)?;
    let filter = build_filter(args, &config)?;
    let source = format.source(path);
    let trades = load_trades(source.as_ref(), &filter)?;
    Ok((config, trades))
}

pub fn analyze(args: &AnalyzeArgs) -> Result<JournalReport, JournalError> {
    let (config, trades) = load_from_args(&args.source)?;
    let analytics = DashboardAnalytics::compute(&trades);
    print!("{}", format_analytics_summary(&analytics));

    let mut report = JournalReport::new(analytics);
    if let Some(title) = args
        .title
        .clone()
        .or_else(|| config.get_string("report", "title"))
    {
        report = report.with_title(title);
    }
    if args.with_stats || config.get_bool("report", "include_stats", false) {
        let rate = resolve_risk_free_rate(args.risk_free_rate, &config)?;
        report = report.with_stats(TradeStats::compute(&trades, rate));
    }

    let output = args
        .output
        .clone()
        .or_else(|| config.get_string("report", "output").map(PathBuf::from));
    if let Some(output) = output {
        let format = match args
            .report_format
            .clone()
            .or_else(|| config.get_string("report", "format"))
        {
            Some(f) => ReportFormat::parse(&f)
                .ok_or_else(|| invalid("report", "format", "must be one of: markdown, md, json"))?,
            None => ReportFormat::from_path(&output),
        };
        format.writer().write(&report, &output)?;
        tracing::info!("Report written to: {}", output.display());
    }

    Ok(report)
}

pub fn stats(args: &StatsArgs) -> Result<TradeStats, JournalError> {
    let (config, trades) = load_from_args(&args.source)?;
    let rate = resolve_risk_free_rate(args.risk_free_rate, &config)?;
    let stats = TradeStats::compute(&trades, rate);
    print!("{}", format_stats_summary(&stats));
    Ok(stats)
}

/// Returns the number of records checked. Any failing record is an error.
pub fn validate(args: &SourceArgs) -> Result<usize, JournalError> {
    let (_, trades) = load_from_args(args)?;
    let invalid = validate_trades(&trades);

    for bad in &invalid {
        for issue in &bad.issues {
            println!("record {} ({}): {}", bad.index, bad.label, issue);
        }
    }

    if invalid.is_empty() {
        println!("All {} trade records are valid", trades.len());
        Ok(trades.len())
    } else {
        Err(JournalError::InvalidTrades {
            invalid: invalid.len(),
            total: trades.len(),
        })
    }
}

pub fn format_analytics_summary(a: &DashboardAnalytics) -> String {
    let mut out = String::new();
    out.push_str("=== Journal Summary ===\n");
    out.push_str(&format!(
        "Total Trades:     {} ({} open, {} closed)\n",
        a.total_trades, a.open_trades, a.closed_trades
    ));
    out.push_str(&format!("Total P&L:        {:+.2}\n", a.total_pnl));
    out.push_str(&format!("Total Volume:     {:.2}\n", a.total_volume));
    out.push_str(&format!(
        "Win Rate:         {:.1}% ({} W / {} L)\n",
        a.win_rate, a.winning_trades, a.losing_trades
    ));
    out.push_str(&format!("Average Win:      {:.2}\n", a.average_win));
    out.push_str(&format!("Average Loss:     {:.2}\n", a.average_loss));
    out.push_str(&format!("Profit Factor:    {:.2}\n", a.profit_factor));
    out.push_str(&format!("Max Drawdown:     {:.2}\n", a.max_drawdown));
    out.push_str(&format!(
        "Best / Worst:     {:+.2} / {:+.2}\n",
        a.best_trade, a.worst_trade
    ));

    if !a.monthly_performance.is_empty() {
        out.push_str("\n=== Monthly ===\n");
        for m in &a.monthly_performance {
            out.push_str(&format!("  {}:  {} trades, {:+.2}\n", m.month, m.trades, m.pnl));
        }
    }
    out
}

pub fn format_stats_summary(s: &TradeStats) -> String {
    let mut out = String::new();
    out.push_str("=== Trade Statistics ===\n");
    out.push_str(&format!(
        "Closed Trades:    {} ({} W / {} L / {} BE)\n",
        s.closed_trades, s.winning_trades, s.losing_trades, s.break_even_trades
    ));
    out.push_str(&format!("Win Rate:         {:.1}%\n", s.win_rate));
    out.push_str(&format!("Total P&L:        {:+.2}\n", s.total_pnl));
    out.push_str(&format!("Expectancy:       {:+.2}\n", s.expectancy));
    out.push_str(&format!("Profit Factor:    {:.2}\n", s.profit_factor));
    out.push_str(&format!("Payoff Ratio:     {:.2}\n", s.payoff_ratio));
    out.push_str(&format!(
        "Streaks:          {} W / {} L (current {:+})\n",
        s.max_consecutive_wins, s.max_consecutive_losses, s.current_streak
    ));
    out.push_str(&format!("Sharpe Ratio:     {:.2}\n", s.sharpe_ratio));
    out.push_str(&format!("Sortino Ratio:    {:.2}\n", s.sortino_ratio));
    out.push_str(&format!("Calmar Ratio:     {:.2}\n", s.calmar_ratio));
    out.push_str(&format!(
        "Max Drawdown:     {:.2} ({:.1}%)\n",
        s.max_drawdown, s.max_drawdown_percent
    ));
    out.push_str(&format!("Avg R-Multiple:   {:.2}\n", s.r_multiple_average));
    out.push_str(&format!("Kelly:            {:.1}%\n", s.kelly_percentage));
    out.push_str(&format!("Avg Holding:      {:.1} days\n", s.average_holding_days));
    out
}
