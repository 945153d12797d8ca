//! End-to-end analysis: price series in, immutable [`AnalysisResult`] out.
//!
//! Pipeline: per-instrument returns → weighted portfolio series → alignment
//! with the benchmark → metrics → cumulative values. No partial results: any
//! failure aborts the whole call.

use crate::domain::error::AnalyticsError;
use crate::domain::metrics::{MetricsBundle, MetricsEngine, DEFAULT_RISK_FREE_RATE};
use crate::domain::portfolio::compute_portfolio_returns;
use crate::domain::price_series::PriceSeries;
use crate::domain::return_series::{align, AlignedReturns, ReturnSeries};
use crate::domain::rolling::{rolling_beta_correlation, RollingPoint, DEFAULT_ROLLING_WINDOW};
use crate::domain::stats::cumulative_growth;
use crate::domain::weights::Weights;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub portfolio_name: String,
    pub benchmark_name: String,
    pub risk_free_rate: f64,
    pub rolling_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            portfolio_name: "Portfolio".to_string(),
            benchmark_name: "Benchmark".to_string(),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weighting {
    Equal,
    Custom(Weights),
}

impl std::fmt::Display for Weighting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weighting::Equal => write!(f, "equal-weighted"),
            Weighting::Custom(w) => {
                let parts: Vec<String> = w.iter().map(|(s, v)| format!("{s}:{v}")).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

/// Compounded value of each side, 1.0 before the first aligned return.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub portfolio: f64,
    pub benchmark: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    portfolio_name: String,
    benchmark_name: String,
    weighting: Weighting,
    metrics: MetricsBundle,
    aligned: AlignedReturns,
    cumulative: Vec<CumulativePoint>,
    rolling: Vec<RollingPoint>,
}

impl AnalysisResult {
    pub fn portfolio_name(&self) -> &str {
        &self.portfolio_name
    }

    pub fn benchmark_name(&self) -> &str {
        &self.benchmark_name
    }

    pub fn weighting(&self) -> &Weighting {
        &self.weighting
    }

    pub fn metrics(&self) -> &MetricsBundle {
        &self.metrics
    }

    pub fn aligned(&self) -> &AlignedReturns {
        &self.aligned
    }

    pub fn portfolio_returns(&self) -> &ReturnSeries {
        self.aligned.portfolio()
    }

    pub fn benchmark_returns(&self) -> &ReturnSeries {
        self.aligned.benchmark()
    }

    pub fn cumulative(&self) -> &[CumulativePoint] {
        &self.cumulative
    }

    /// Rolling beta/correlation over the configured window.
    pub fn rolling(&self) -> &[RollingPoint] {
        &self.rolling
    }
}

pub fn cumulative_values(aligned: &AlignedReturns) -> Vec<CumulativePoint> {
    let portfolio = cumulative_growth(&aligned.portfolio().values());
    let benchmark = cumulative_growth(&aligned.benchmark().values());
    aligned
        .dates()
        .into_iter()
        .zip(portfolio.into_iter().zip(benchmark))
        .map(|(date, (portfolio, benchmark))| CumulativePoint {
            date,
            portfolio,
            benchmark,
        })
        .collect()
}

pub fn run_analysis(
    prices: &BTreeMap<String, PriceSeries>,
    benchmark: &PriceSeries,
    weights: Option<&Weights>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalyticsError> {
    let portfolio_returns = compute_portfolio_returns(prices, weights);
    let benchmark_returns = benchmark.returns();
    debug!(
        portfolio = portfolio_returns.len(),
        benchmark = benchmark_returns.len(),
        "computed return series"
    );

    let aligned = align(&portfolio_returns, &benchmark_returns)?;
    let metrics = MetricsEngine::new(config.risk_free_rate).analyze_aligned(&aligned);
    let cumulative = cumulative_values(&aligned);
    let rolling = rolling_beta_correlation(&aligned, config.rolling_window);

    Ok(AnalysisResult {
        portfolio_name: config.portfolio_name.clone(),
        benchmark_name: config.benchmark_name.clone(),
        weighting: match weights {
            Some(w) => Weighting::Custom(w.clone()),
            None => Weighting::Equal,
        },
        metrics,
        aligned,
        cumulative,
        rolling,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weights::parse_weights;
    use approx::assert_abs_diff_eq;
    use chrono::Duration;

    fn prices(symbol: &str, days: usize, drift: f64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_pairs(
            symbol,
            (0..days).map(|i| {
                let wiggle = if i % 3 == 0 { -0.5 } else { 0.4 };
                (
                    start + Duration::days(i as i64),
                    100.0 + drift * i as f64 + wiggle,
                )
            }),
        )
        .unwrap()
    }

    fn universe(series: Vec<PriceSeries>) -> BTreeMap<String, PriceSeries> {
        series
            .into_iter()
            .map(|s| (s.symbol().to_string(), s))
            .collect()
    }

    #[test]
    fn run_analysis_produces_complete_result() {
        let p = universe(vec![prices("AAPL", 60, 0.3), prices("MSFT", 60, 0.1)]);
        let bench = prices("SPY", 60, 0.2);
        let result = run_analysis(&p, &bench, None, &AnalysisConfig::default()).unwrap();

        assert_eq!(result.portfolio_name(), "Portfolio");
        assert_eq!(result.weighting(), &Weighting::Equal);
        assert_eq!(result.metrics().data_points, 59);
        assert_eq!(result.portfolio_returns().len(), 59);
        assert_eq!(result.benchmark_returns().len(), 59);
        assert_eq!(result.cumulative().len(), 59);
    }

    #[test]
    fn cumulative_ends_at_total_return() {
        let p = universe(vec![prices("AAPL", 45, 0.3)]);
        let bench = prices("SPY", 45, 0.2);
        let result = run_analysis(&p, &bench, None, &AnalysisConfig::default()).unwrap();

        let last = result.cumulative().last().unwrap();
        assert_abs_diff_eq!(
            last.portfolio - 1.0,
            result.metrics().portfolio_total_return,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            last.benchmark - 1.0,
            result.metrics().benchmark_total_return,
            epsilon = 1e-12
        );
    }

    #[test]
    fn insufficient_overlap_returns_no_result() {
        let p = universe(vec![prices("AAPL", 20, 0.3)]);
        let bench = prices("SPY", 20, 0.2);
        let err = run_analysis(&p, &bench, None, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientOverlap { common: 19, .. }));
    }

    #[test]
    fn custom_weighting_is_recorded() {
        let p = universe(vec![prices("AAPL", 40, 0.3), prices("MSFT", 40, 0.1)]);
        let bench = prices("SPY", 40, 0.2);
        let weights = parse_weights("AAPL:0.7,MSFT:0.3").unwrap();
        let result = run_analysis(&p, &bench, Some(&weights), &AnalysisConfig::default()).unwrap();
        assert_eq!(result.weighting(), &Weighting::Custom(weights));
        assert_eq!(result.weighting().to_string(), "AAPL:0.7, MSFT:0.3");
    }

    #[test]
    fn rolling_uses_aligned_window() {
        let p = universe(vec![prices("AAPL", 100, 0.3)]);
        let bench = prices("SPY", 100, 0.2);
        let config = AnalysisConfig {
            rolling_window: 20,
            ..AnalysisConfig::default()
        };
        let result = run_analysis(&p, &bench, None, &config).unwrap();
        assert_eq!(result.rolling().len(), 99 - 20);
        assert_eq!(result.rolling()[0].date, result.aligned().dates()[20]);
    }

    #[test]
    fn weighting_display_equal() {
        assert_eq!(Weighting::Equal.to_string(), "equal-weighted");
    }
}
