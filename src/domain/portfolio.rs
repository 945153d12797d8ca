//! Weighted portfolio returns from constituent price series.
//!
//! Each instrument is differenced on its own date index first. The portfolio
//! series then covers only the dates on which every supplied instrument has a
//! return, for both equal and custom weighting.

use crate::domain::price_series::PriceSeries;
use crate::domain::return_series::{intersect_dates, DatedReturn, ReturnSeries};
use crate::domain::weights::Weights;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Combines per-instrument returns into one portfolio return series.
///
/// Without weights, each date is the plain average across instruments. With
/// weights, each date is `sum(w_i * r_i) / sum(w)`, where the denominator is
/// the total of all supplied weights, including symbols that have no price
/// data. A zero total leaves the weighted sum unnormalized. Weighted symbols
/// absent from `prices` contribute nothing.
pub fn compute_portfolio_returns(
    prices: &BTreeMap<String, PriceSeries>,
    weights: Option<&Weights>,
) -> ReturnSeries {
    if prices.is_empty() {
        return ReturnSeries::default();
    }

    let instrument_returns: BTreeMap<&str, ReturnSeries> = prices
        .iter()
        .map(|(symbol, series)| (symbol.as_str(), series.returns()))
        .collect();

    let common = instrument_returns
        .values()
        .map(|r| r.dates())
        .reduce(|acc, dates| intersect_dates(&acc, &dates))
        .unwrap_or_default();

    let aligned: BTreeMap<&str, Vec<f64>> = instrument_returns
        .iter()
        .map(|(symbol, r)| (*symbol, r.restrict_to(&common).values()))
        .collect();

    debug!(
        instruments = aligned.len(),
        dates = common.len(),
        "computing portfolio returns"
    );

    let values: Vec<f64> = match weights {
        None => equal_weighted(&aligned, common.len()),
        Some(w) => custom_weighted(&aligned, w, common.len()),
    };

    let points = common
        .into_iter()
        .zip(values)
        .map(|(date, value)| DatedReturn { date, value })
        .collect();
    ReturnSeries::from_sorted(points)
}

fn equal_weighted(aligned: &BTreeMap<&str, Vec<f64>>, len: usize) -> Vec<f64> {
    let n = aligned.len() as f64;
    (0..len)
        .map(|t| aligned.values().map(|r| r[t]).sum::<f64>() / n)
        .collect()
}

fn custom_weighted(aligned: &BTreeMap<&str, Vec<f64>>, weights: &Weights, len: usize) -> Vec<f64> {
    let mut sums = vec![0.0_f64; len];

    for (symbol, weight) in weights.iter() {
        let Some(returns) = aligned.get(symbol) else {
            warn!(symbol, weight, "weighted symbol has no price data, skipping");
            continue;
        };
        for (acc, r) in sums.iter_mut().zip(returns) {
            *acc += r * weight;
        }
    }

    let total = weights.total();
    if total != 0.0 {
        for acc in &mut sums {
            *acc /= total;
        }
    }
    sums
}
