//! Dated return series and date alignment.
//!
//! Every series keeps its dates strictly increasing, so intersections are
//! computed with a linear merge instead of hashing.

use crate::domain::error::AnalyticsError;
use chrono::NaiveDate;
use tracing::debug;

/// Minimum number of common dates required for an analysis.
pub const MIN_OVERLAP: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatedReturn {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReturnSeries {
    points: Vec<DatedReturn>,
}

impl ReturnSeries {
    pub fn new(points: Vec<DatedReturn>) -> Result<Self, AnalyticsError> {
        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalyticsError::InvalidReturnSeries {
                reason: format!(
                    "dates must be strictly increasing ({} followed by {})",
                    w[0].date, w[1].date
                ),
            });
        }
        Ok(Self { points })
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, AnalyticsError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, value)| DatedReturn { date, value })
                .collect(),
        )
    }

    /// Callers guarantee strictly increasing dates.
    pub(crate) fn from_sorted(points: Vec<DatedReturn>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        Self { points }
    }

    pub fn points(&self) -> &[DatedReturn] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// Keeps only the entries whose date appears in `dates` (sorted ascending).
    pub fn restrict_to(&self, dates: &[NaiveDate]) -> ReturnSeries {
        let mut points = Vec::with_capacity(dates.len().min(self.points.len()));
        let mut i = 0;
        let mut j = 0;
        while i < self.points.len() && j < dates.len() {
            let date = self.points[i].date;
            if date < dates[j] {
                i += 1;
            } else if date > dates[j] {
                j += 1;
            } else {
                points.push(self.points[i]);
                i += 1;
                j += 1;
            }
        }
        ReturnSeries::from_sorted(points)
    }
}

/// Ordered intersection of two ascending date sequences.
pub fn intersect_dates(a: &[NaiveDate], b: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut common = Vec::with_capacity(a.len().min(b.len()));
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                common.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    common
}

/// Portfolio and benchmark returns sharing one strictly increasing date index
/// of at least [`MIN_OVERLAP`] dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedReturns {
    portfolio: ReturnSeries,
    benchmark: ReturnSeries,
}

impl AlignedReturns {
    pub fn portfolio(&self) -> &ReturnSeries {
        &self.portfolio
    }

    pub fn benchmark(&self) -> &ReturnSeries {
        &self.benchmark
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.portfolio.dates()
    }

    pub fn len(&self) -> usize {
        self.portfolio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolio.is_empty()
    }

    pub fn into_parts(self) -> (ReturnSeries, ReturnSeries) {
        (self.portfolio, self.benchmark)
    }
}

/// Restricts both series to their common dates.
pub fn align(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
) -> Result<AlignedReturns, AnalyticsError> {
    let common = intersect_dates(&portfolio.dates(), &benchmark.dates());
    debug!(
        portfolio = portfolio.len(),
        benchmark = benchmark.len(),
        common = common.len(),
        "aligned return series"
    );

    if common.len() < MIN_OVERLAP {
        return Err(AnalyticsError::InsufficientOverlap {
            common: common.len(),
            minimum: MIN_OVERLAP,
        });
    }

    Ok(AlignedReturns {
        portfolio: portfolio.restrict_to(&common),
        benchmark: benchmark.restrict_to(&common),
    })
}
