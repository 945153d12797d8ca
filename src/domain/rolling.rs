//! Rolling beta and correlation over a sliding window.
//!
//! The point dated at index `i` is computed from the `window` returns strictly
//! before it (`i - window .. i`), so the first point sits at index `window`.

use crate::domain::metrics::beta;
use crate::domain::return_series::AlignedReturns;
use crate::domain::stats::correlation;
use chrono::NaiveDate;

pub const DEFAULT_ROLLING_WINDOW: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub beta: f64,
    pub correlation: f64,
}

/// Empty when `window < 2` or the series is not longer than the window.
pub fn rolling_beta_correlation(aligned: &AlignedReturns, window: usize) -> Vec<RollingPoint> {
    if window < 2 {
        return Vec::new();
    }

    let dates = aligned.dates();
    let rp = aligned.portfolio().values();
    let rb = aligned.benchmark().values();

    (window..dates.len())
        .map(|i| {
            let p = &rp[i - window..i];
            let b = &rb[i - window..i];
            RollingPoint {
                date: dates[i],
                beta: beta(p, b),
                correlation: correlation(p, b),
            }
        })
        .collect()
}
