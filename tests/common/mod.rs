#![allow(dead_code)]

use benchmark_analytics::domain::error::AnalyticsError;
use benchmark_analytics::domain::price_series::PriceSeries;
use benchmark_analytics::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<(NaiveDate, f64)>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: Vec<(NaiveDate, f64)>) -> Self {
        self.data.insert(symbol.to_string(), prices);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, AnalyticsError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AnalyticsError::DataSource {
                reason: reason.clone(),
            });
        }
        let rows: Vec<(NaiveDate, f64)> = self
            .data
            .get(symbol)
            .map(|rows| {
                rows.iter()
                    .copied()
                    .filter(|(d, _)| *d >= start_date && *d <= end_date)
                    .collect()
            })
            .unwrap_or_default();
        if rows.is_empty() {
            return Err(AnalyticsError::NoPriceData {
                symbol: symbol.to_string(),
            });
        }
        PriceSeries::from_pairs(symbol, rows)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyticsError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, AnalyticsError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AnalyticsError::DataSource {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(rows) if !rows.is_empty() => {
                let min = rows.iter().map(|r| r.0).min().unwrap();
                let max = rows.iter().map(|r| r.0).max().unwrap();
                Ok(Some((min, max, rows.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily closes starting at `start`, compounding `returns` from `start_price`.
pub fn prices_from_returns(
    start: NaiveDate,
    start_price: f64,
    returns: &[f64],
) -> Vec<(NaiveDate, f64)> {
    let mut price = start_price;
    let mut rows = vec![(start, price)];
    for (i, r) in returns.iter().enumerate() {
        price *= 1.0 + r;
        rows.push((start + Duration::days(i as i64 + 1), price));
    }
    rows
}

/// Deterministic pseudo-random daily returns in roughly [-2%, 2%].
pub fn wave_returns(count: usize, seed: u64) -> Vec<f64> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % 4001) as f64 / 100_000.0 - 0.02
        })
        .collect()
}

pub fn generate_prices(start_date: &str, count: usize, seed: u64) -> Vec<(NaiveDate, f64)> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    prices_from_returns(start, 100.0, &wave_returns(count - 1, seed))
}

pub fn price_series(symbol: &str, rows: Vec<(NaiveDate, f64)>) -> PriceSeries {
    PriceSeries::from_pairs(symbol, rows).unwrap()
}

pub fn universe(series: Vec<PriceSeries>) -> BTreeMap<String, PriceSeries> {
    series
        .into_iter()
        .map(|s| (s.symbol().to_string(), s))
        .collect()
}
