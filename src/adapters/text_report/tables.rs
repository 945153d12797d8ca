//! Plain-text table formatting for reports.
//!
//! Provides functions to render:
//! - the analysis summary header
//! - the metrics table with a tier column
//! - monthly compounded returns for both sides

use crate::adapters::text_report::rating::{rate, MetricKind};
use crate::domain::analysis::AnalysisResult;
use crate::domain::formatting::FormattedMetrics;
use crate::domain::return_series::AlignedReturns;
use crate::domain::rolling::RollingPoint;
use chrono::Datelike;
use std::collections::BTreeMap;

const LABEL_WIDTH: usize = 26;
const VALUE_WIDTH: usize = 12;

pub fn render_summary(result: &AnalysisResult) -> String {
    let metrics = result.metrics();
    let window = match (metrics.start_date, metrics.end_date) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        _ => "-".to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!("{:<14}{}\n", "Portfolio:", result.portfolio_name()));
    out.push_str(&format!("{:<14}{}\n", "Benchmark:", result.benchmark_name()));
    out.push_str(&format!("{:<14}{}\n", "Weighting:", result.weighting()));
    out.push_str(&format!("{:<14}{}\n", "Window:", window));
    out.push_str(&format!("{:<14}{}\n", "Data points:", metrics.data_points));
    out
}

fn format_value(value: f64, percent: bool) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else if percent {
        format!("{:.2}%", value)
    } else {
        format!("{:.4}", value)
    }
}

fn row(out: &mut String, label: &str, value: f64, percent: bool, kind: Option<MetricKind>) {
    let tier = kind.map(|k| rate(k, value).to_string()).unwrap_or_default();
    let line = format!(
        "{:<lw$}{:>vw$}  {}",
        label,
        format_value(value, percent),
        tier,
        lw = LABEL_WIDTH,
        vw = VALUE_WIDTH
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_metrics_table(m: &FormattedMetrics) -> String {
    use MetricKind::*;

    let mut out = String::new();
    out.push_str(&format!(
        "{:<lw$}{:>vw$}  {}\n",
        "Metric",
        "Value",
        "Rating",
        lw = LABEL_WIDTH,
        vw = VALUE_WIDTH
    ));
    out.push_str(&format!("{}\n", "-".repeat(LABEL_WIDTH + VALUE_WIDTH + 8)));

    let rows: [(&str, f64, bool, Option<MetricKind>); 21] = [
        ("Portfolio total return", m.portfolio_total_return, true, Some(Return)),
        ("Benchmark total return", m.benchmark_total_return, true, None),
        ("Excess return", m.excess_return, true, Some(Return)),
        ("Portfolio annualized", m.portfolio_annualized_return, true, Some(Return)),
        ("Benchmark annualized", m.benchmark_annualized_return, true, None),
        ("Portfolio volatility", m.portfolio_volatility, true, None),
        ("Benchmark volatility", m.benchmark_volatility, true, None),
        ("Portfolio Sharpe", m.portfolio_sharpe_ratio, false, Some(Sharpe)),
        ("Benchmark Sharpe", m.benchmark_sharpe_ratio, false, None),
        ("Alpha", m.alpha, true, Some(Alpha)),
        ("Beta", m.beta, false, Some(Beta)),
        ("Correlation", m.correlation, false, Some(Correlation)),
        ("R-squared", m.r_squared, false, None),
        ("Tracking error", m.tracking_error, true, Some(TrackingError)),
        ("Information ratio", m.information_ratio, false, Some(InformationRatio)),
        ("Max drawdown", m.max_drawdown, true, Some(MaxDrawdown)),
        ("VaR 95%", m.var_95, true, None),
        ("VaR 99%", m.var_99, true, None),
        ("Up capture", m.up_capture, false, None),
        ("Down capture", m.down_capture, false, None),
        ("Calmar ratio", m.calmar_ratio, false, None),
    ];
    for (label, value, percent, kind) in rows {
        row(&mut out, label, value, percent, kind);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReturns {
    pub year: i32,
    pub month: u32,
    pub portfolio: f64,
    pub benchmark: f64,
}

/// Compounds the aligned daily returns within each calendar month.
pub fn compute_monthly_returns(aligned: &AlignedReturns) -> Vec<MonthlyReturns> {
    let mut growth: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();

    for (p, b) in aligned
        .portfolio()
        .points()
        .iter()
        .zip(aligned.benchmark().points())
    {
        let key = (p.date.year(), p.date.month());
        let entry = growth.entry(key).or_insert((1.0, 1.0));
        entry.0 *= 1.0 + p.value;
        entry.1 *= 1.0 + b.value;
    }

    growth
        .into_iter()
        .map(|((year, month), (p, b))| MonthlyReturns {
            year,
            month,
            portfolio: p - 1.0,
            benchmark: b - 1.0,
        })
        .collect()
}

pub fn format_monthly_returns(returns: &[MonthlyReturns]) -> String {
    if returns.is_empty() {
        return "No monthly data.\n".to_string();
    }

    let mut out = format!(
        "{:<10}{:>12}{:>12}{:>12}\n",
        "Month", "Portfolio", "Benchmark", "Excess"
    );
    for r in returns {
        out.push_str(&format!(
            "{:<10}{:>11.2}%{:>11.2}%{:>11.2}%\n",
            format!("{}-{:02}", r.year, r.month),
            r.portfolio * 100.0,
            r.benchmark * 100.0,
            (r.portfolio - r.benchmark) * 100.0
        ));
    }
    out
}

/// Latest point plus the lowest and highest rolling beta.
pub fn format_rolling_summary(points: &[RollingPoint]) -> String {
    let Some(last) = points.last() else {
        return "Series shorter than rolling window.\n".to_string();
    };

    let betas = points.iter().map(|p| p.beta).filter(|b| !b.is_nan());
    let (lo, hi) = betas.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
        (lo.min(b), hi.max(b))
    });

    let mut out = String::new();
    out.push_str(&format!(
        "Latest ({}): beta {:.4}, correlation {}\n",
        last.date,
        last.beta,
        format_value(last.correlation, false)
    ));
    if lo.is_finite() && hi.is_finite() {
        out.push_str(&format!("Beta range: {:.4} to {:.4}\n", lo, hi));
    }
    out
}
