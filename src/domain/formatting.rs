//! Display rounding for [`MetricsBundle`].
//!
//! Percentage fields are scaled by 100 and rounded to 2 decimals; ratios and
//! coefficients are rounded to 4 decimals. NaN passes through unchanged.

use crate::domain::metrics::MetricsBundle;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormattedMetrics {
    pub data_points: usize,

    pub portfolio_total_return: f64,
    pub benchmark_total_return: f64,
    pub excess_return: f64,
    pub portfolio_annualized_return: f64,
    pub benchmark_annualized_return: f64,
    pub portfolio_volatility: f64,
    pub benchmark_volatility: f64,
    pub alpha: f64,
    pub tracking_error: f64,
    pub max_drawdown: f64,
    pub var_95: f64,
    pub var_99: f64,

    pub portfolio_sharpe_ratio: f64,
    pub benchmark_sharpe_ratio: f64,
    pub beta: f64,
    pub correlation: f64,
    pub r_squared: f64,
    pub information_ratio: f64,
    pub up_capture: f64,
    pub down_capture: f64,
    pub calmar_ratio: f64,
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn pct(value: f64) -> f64 {
    round_to(value * 100.0, 2)
}

fn ratio(value: f64) -> f64 {
    round_to(value, 4)
}

impl From<&MetricsBundle> for FormattedMetrics {
    fn from(m: &MetricsBundle) -> Self {
        Self {
            data_points: m.data_points,

            portfolio_total_return: pct(m.portfolio_total_return),
            benchmark_total_return: pct(m.benchmark_total_return),
            excess_return: pct(m.excess_return),
            portfolio_annualized_return: pct(m.portfolio_annualized_return),
            benchmark_annualized_return: pct(m.benchmark_annualized_return),
            portfolio_volatility: pct(m.portfolio_volatility),
            benchmark_volatility: pct(m.benchmark_volatility),
            alpha: pct(m.alpha),
            tracking_error: pct(m.tracking_error),
            max_drawdown: pct(m.max_drawdown),
            var_95: pct(m.var_95),
            var_99: pct(m.var_99),

            portfolio_sharpe_ratio: ratio(m.portfolio_sharpe_ratio),
            benchmark_sharpe_ratio: ratio(m.benchmark_sharpe_ratio),
            beta: ratio(m.beta),
            correlation: ratio(m.correlation),
            r_squared: ratio(m.r_squared),
            information_ratio: ratio(m.information_ratio),
            up_capture: ratio(m.up_capture),
            down_capture: ratio(m.down_capture),
            calmar_ratio: ratio(m.calmar_ratio),
        }
    }
}
