//! Closing-price series for a single instrument.

use crate::domain::error::AnalyticsError;
use crate::domain::return_series::{DatedReturn, ReturnSeries};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatedPrice {
    pub date: NaiveDate,
    pub price: f64,
}

/// Chronological closing prices with unique, strictly increasing dates and
/// strictly positive prices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceSeries {
    symbol: String,
    points: Vec<DatedPrice>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<DatedPrice>) -> Result<Self, AnalyticsError> {
        let symbol = symbol.into();

        for point in &points {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(AnalyticsError::InvalidPriceSeries {
                    symbol,
                    reason: format!("price {} on {} must be positive", point.price, point.date),
                });
            }
        }

        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalyticsError::InvalidPriceSeries {
                symbol,
                reason: format!(
                    "dates must be strictly increasing ({} followed by {})",
                    w[0].date, w[1].date
                ),
            });
        }

        Ok(Self { symbol, points })
    }

    pub fn from_pairs<I>(symbol: impl Into<String>, pairs: I) -> Result<Self, AnalyticsError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let points = pairs
            .into_iter()
            .map(|(date, price)| DatedPrice { date, price })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[DatedPrice] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Subset of the series with `start <= date <= end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        let lo = self.points.partition_point(|p| p.date < start);
        let hi = self.points.partition_point(|p| p.date <= end);
        let points = if lo < hi {
            self.points[lo..hi].to_vec()
        } else {
            Vec::new()
        };
        PriceSeries {
            symbol: self.symbol.clone(),
            points,
        }
    }

    /// Simple returns `p[t] / p[t-1] - 1`, dated at `t`. The first date has
    /// no predecessor and produces no entry.
    pub fn returns(&self) -> ReturnSeries {
        let points = self
            .points
            .windows(2)
            .map(|w| DatedReturn {
                date: w[1].date,
                value: w[1].price / w[0].price - 1.0,
            })
            .collect();
        ReturnSeries::from_sorted(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn new_accepts_valid_series() {
        let series = PriceSeries::from_pairs("AAPL", [(d(1), 100.0), (d(2), 101.0)]).unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(d(1)));
        assert_eq!(series.last_date(), Some(d(2)));
    }

    #[test]
    fn new_rejects_non_positive_price() {
        let err = PriceSeries::from_pairs("AAPL", [(d(1), 100.0), (d(2), 0.0)]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidPriceSeries { symbol, .. } if symbol == "AAPL"));
    }

    #[test]
    fn new_rejects_nan_price() {
        let result = PriceSeries::from_pairs("AAPL", [(d(1), f64::NAN)]);
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let result = PriceSeries::from_pairs("AAPL", [(d(1), 100.0), (d(1), 101.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_unordered_dates() {
        let result = PriceSeries::from_pairs("AAPL", [(d(2), 100.0), (d(1), 101.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn returns_drop_first_date() {
        let series =
            PriceSeries::from_pairs("AAPL", [(d(1), 100.0), (d(2), 110.0), (d(3), 99.0)]).unwrap();
        let returns = series.returns();

        assert_eq!(returns.len(), 2);
        assert_eq!(returns.dates(), vec![d(2), d(3)]);
        assert_abs_diff_eq!(returns.values()[0], 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(returns.values()[1], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn returns_of_single_price_is_empty() {
        let series = PriceSeries::from_pairs("AAPL", [(d(1), 100.0)]).unwrap();
        assert!(series.returns().is_empty());
    }

    #[test]
    fn between_filters_inclusive() {
        let series = PriceSeries::from_pairs(
            "AAPL",
            [(d(1), 100.0), (d(2), 101.0), (d(3), 102.0), (d(4), 103.0)],
        )
        .unwrap();
        let sub = series.between(d(2), d(3));
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.first_date(), Some(d(2)));
        assert_eq!(sub.last_date(), Some(d(3)));

        assert!(series.between(d(5), d(9)).is_empty());
        assert!(series.between(d(3), d(2)).is_empty());
    }
}
