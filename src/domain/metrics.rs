//! Portfolio-versus-benchmark risk and return statistics.
//!
//! All figures are computed on one aligned window of daily simple returns and
//! annualized with a fixed 252-period trading year. Metrics whose denominator
//! is zero resolve to 0 rather than failing; callers cannot tell such a zero
//! apart from a computed one.

use crate::domain::error::AnalyticsError;
use crate::domain::return_series::{AlignedReturns, ReturnSeries};
use crate::domain::stats::{
    correlation, covariance, cumulative_growth, mean, percentile, std_dev, variance,
};
use chrono::NaiveDate;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsBundle {
    pub data_points: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    pub portfolio_total_return: f64,
    pub benchmark_total_return: f64,
    pub excess_return: f64,
    pub portfolio_annualized_return: f64,
    pub benchmark_annualized_return: f64,

    pub portfolio_volatility: f64,
    pub benchmark_volatility: f64,
    pub portfolio_sharpe_ratio: f64,
    pub benchmark_sharpe_ratio: f64,

    pub alpha: f64,
    pub beta: f64,
    pub correlation: f64,
    pub r_squared: f64,
    pub tracking_error: f64,
    pub information_ratio: f64,

    pub max_drawdown: f64,
    pub var_95: f64,
    pub var_99: f64,

    pub up_capture: f64,
    pub down_capture: f64,
    pub calmar_ratio: f64,
}

/// `(1 + r_annual)^(1/252) - 1`
pub fn daily_risk_free_rate(annual: f64) -> f64 {
    (1.0 + annual).powf(1.0 / TRADING_DAYS_PER_YEAR) - 1.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsEngine {
    risk_free_rate: f64,
    risk_free_rate_daily: f64,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_RATE)
    }
}

impl MetricsEngine {
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            risk_free_rate_daily: daily_risk_free_rate(risk_free_rate),
        }
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn risk_free_rate_daily(&self) -> f64 {
        self.risk_free_rate_daily
    }

    /// Computes every metric for two series that must share the same date
    /// index. The engine never re-aligns its input.
    pub fn analyze(
        &self,
        portfolio: &ReturnSeries,
        benchmark: &ReturnSeries,
    ) -> Result<MetricsBundle, AnalyticsError> {
        let same_index = portfolio.len() == benchmark.len()
            && portfolio
                .points()
                .iter()
                .zip(benchmark.points())
                .all(|(p, b)| p.date == b.date);
        if !same_index {
            return Err(AnalyticsError::MisalignedInput {
                portfolio: portfolio.len(),
                benchmark: benchmark.len(),
            });
        }

        Ok(self.compute(portfolio, benchmark))
    }

    pub fn analyze_aligned(&self, aligned: &AlignedReturns) -> MetricsBundle {
        self.compute(aligned.portfolio(), aligned.benchmark())
    }

    fn compute(&self, portfolio: &ReturnSeries, benchmark: &ReturnSeries) -> MetricsBundle {
        let rp = portfolio.values();
        let rb = benchmark.values();
        let rf = self.risk_free_rate;
        let rf_daily = self.risk_free_rate_daily;

        let portfolio_total_return = total_return(&rp);
        let benchmark_total_return = total_return(&rb);
        let corr = correlation(&rp, &rb);
        let max_dd = max_drawdown(&rp);

        MetricsBundle {
            data_points: rp.len(),
            start_date: portfolio.first_date(),
            end_date: portfolio.last_date(),

            portfolio_total_return,
            benchmark_total_return,
            excess_return: portfolio_total_return - benchmark_total_return,
            portfolio_annualized_return: annualized_return(&rp),
            benchmark_annualized_return: annualized_return(&rb),

            portfolio_volatility: annualized_volatility(&rp),
            benchmark_volatility: annualized_volatility(&rb),
            portfolio_sharpe_ratio: sharpe_ratio(&rp, rf_daily),
            benchmark_sharpe_ratio: sharpe_ratio(&rb, rf_daily),

            alpha: alpha(&rp, &rb, rf),
            beta: beta(&rp, &rb),
            correlation: corr,
            r_squared: corr * corr,
            tracking_error: tracking_error(&rp, &rb),
            information_ratio: information_ratio(&rp, &rb),

            max_drawdown: max_dd,
            var_95: value_at_risk(&rp, 0.95),
            var_99: value_at_risk(&rp, 0.99),

            up_capture: up_capture(&rp, &rb),
            down_capture: down_capture(&rp, &rb),
            calmar_ratio: calmar_from(portfolio_total_return, max_dd),
        }
    }
}

/// Convenience wrapper around [`MetricsEngine::analyze`].
pub fn analyze(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
    risk_free_rate: f64,
) -> Result<MetricsBundle, AnalyticsError> {
    MetricsEngine::new(risk_free_rate).analyze(portfolio, benchmark)
}

/// Π(1 + r) − 1
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0_f64, |acc, r| acc * (1.0 + r)) - 1.0
}

/// mean(r) × 252
pub fn annualized_return(returns: &[f64]) -> f64 {
    mean(returns) * TRADING_DAYS_PER_YEAR
}

pub fn annualized_volatility(returns: &[f64]) -> f64 {
    std_dev(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

pub fn sharpe_ratio(returns: &[f64], rf_daily: f64) -> f64 {
    let sd = std_dev(returns);
    if sd == 0.0 {
        return 0.0;
    }
    let excess: Vec<f64> = returns.iter().map(|r| r - rf_daily).collect();
    (mean(&excess) * TRADING_DAYS_PER_YEAR) / (sd * TRADING_DAYS_PER_YEAR.sqrt())
}

pub fn beta(portfolio: &[f64], benchmark: &[f64]) -> f64 {
    let var = variance(benchmark);
    if var == 0.0 {
        return 0.0;
    }
    covariance(portfolio, benchmark) / var
}

/// Jensen's alpha, annualized.
pub fn alpha(portfolio: &[f64], benchmark: &[f64], rf_annual: f64) -> f64 {
    let b = beta(portfolio, benchmark);
    let portfolio_annual = annualized_return(portfolio);
    let benchmark_annual = annualized_return(benchmark);
    portfolio_annual - (rf_annual + b * (benchmark_annual - rf_annual))
}

fn active_returns(portfolio: &[f64], benchmark: &[f64]) -> Vec<f64> {
    portfolio.iter().zip(benchmark).map(|(p, b)| p - b).collect()
}

pub fn tracking_error(portfolio: &[f64], benchmark: &[f64]) -> f64 {
    annualized_volatility(&active_returns(portfolio, benchmark))
}

pub fn information_ratio(portfolio: &[f64], benchmark: &[f64]) -> f64 {
    let te = tracking_error(portfolio, benchmark);
    if te == 0.0 {
        return 0.0;
    }
    annualized_return(&active_returns(portfolio, benchmark)) / te
}

/// Largest peak-to-trough decline of the compounded value, as a fraction
/// ≤ 0. The running peak starts at the first compounded value.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for value in cumulative_growth(returns) {
        peak = peak.max(value);
        let dd = (value - peak) / peak;
        if dd < worst {
            worst = dd;
        }
    }
    worst
}

/// The `(1 - confidence)` percentile of the return distribution.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    percentile(returns, (1.0 - confidence) * 100.0)
}

fn capture_ratio(portfolio: &[f64], benchmark: &[f64], keep: impl Fn(f64) -> bool) -> f64 {
    let (p, b): (Vec<f64>, Vec<f64>) = portfolio
        .iter()
        .zip(benchmark)
        .filter(|(_, b)| keep(**b))
        .map(|(p, b)| (*p, *b))
        .unzip();
    if b.is_empty() {
        return 0.0;
    }
    let benchmark_mean = mean(&b);
    if benchmark_mean == 0.0 {
        return 0.0;
    }
    mean(&p) / benchmark_mean
}

pub fn up_capture(portfolio: &[f64], benchmark: &[f64]) -> f64 {
    capture_ratio(portfolio, benchmark, |b| b > 0.0)
}

pub fn down_capture(portfolio: &[f64], benchmark: &[f64]) -> f64 {
    capture_ratio(portfolio, benchmark, |b| b < 0.0)
}

pub fn calmar_ratio(returns: &[f64]) -> f64 {
    calmar_from(total_return(returns), max_drawdown(returns))
}

fn calmar_from(total: f64, max_dd: f64) -> f64 {
    let dd = max_dd.abs();
    if dd == 0.0 {
        return 0.0;
    }
    total / dd
}
