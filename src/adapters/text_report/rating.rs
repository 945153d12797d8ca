//! Qualitative tiers for formatted metric values.
//!
//! Operates on [`FormattedMetrics`](crate::domain::formatting::FormattedMetrics)
//! values, so percentage metrics are compared in percent units.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Total, annualized or excess return (percent).
    Return,
    Alpha,
    Beta,
    Sharpe,
    InformationRatio,
    /// Percent.
    TrackingError,
    Correlation,
    /// Percent, negative.
    MaxDrawdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Good,
    Medium,
    Poor,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Good => "good",
            Tier::Medium => "medium",
            Tier::Poor => "poor",
        };
        write!(f, "{s}")
    }
}

/// NaN always rates `Poor`.
pub fn rate(kind: MetricKind, value: f64) -> Tier {
    let (good, medium) = match kind {
        MetricKind::Return | MetricKind::Alpha => (value > 0.0, false),
        MetricKind::Beta => (
            (0.8..=1.2).contains(&value),
            (0.6..=1.4).contains(&value),
        ),
        MetricKind::Sharpe => (value > 1.0, value > 0.5),
        MetricKind::InformationRatio => (value > 0.5, value > 0.2),
        MetricKind::TrackingError => (value < 2.0, value < 5.0),
        MetricKind::Correlation => (value > 0.8, value > 0.6),
        MetricKind::MaxDrawdown => (value.abs() < 10.0, false),
    };

    if good {
        Tier::Good
    } else if medium {
        Tier::Medium
    } else {
        Tier::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_are_good_only_when_positive() {
        assert_eq!(rate(MetricKind::Return, 0.01), Tier::Good);
        assert_eq!(rate(MetricKind::Return, 0.0), Tier::Poor);
        assert_eq!(rate(MetricKind::Alpha, -1.5), Tier::Poor);
    }

    #[test]
    fn beta_bands() {
        assert_eq!(rate(MetricKind::Beta, 1.0), Tier::Good);
        assert_eq!(rate(MetricKind::Beta, 0.8), Tier::Good);
        assert_eq!(rate(MetricKind::Beta, 1.3), Tier::Medium);
        assert_eq!(rate(MetricKind::Beta, 0.6), Tier::Medium);
        assert_eq!(rate(MetricKind::Beta, 1.5), Tier::Poor);
        assert_eq!(rate(MetricKind::Beta, 0.2), Tier::Poor);
    }

    #[test]
    fn sharpe_and_information_ratio_thresholds() {
        assert_eq!(rate(MetricKind::Sharpe, 1.2), Tier::Good);
        assert_eq!(rate(MetricKind::Sharpe, 0.7), Tier::Medium);
        assert_eq!(rate(MetricKind::Sharpe, 0.5), Tier::Poor);
        assert_eq!(rate(MetricKind::InformationRatio, 0.6), Tier::Good);
        assert_eq!(rate(MetricKind::InformationRatio, 0.3), Tier::Medium);
        assert_eq!(rate(MetricKind::InformationRatio, 0.1), Tier::Poor);
    }

    #[test]
    fn tracking_error_lower_is_better() {
        assert_eq!(rate(MetricKind::TrackingError, 1.5), Tier::Good);
        assert_eq!(rate(MetricKind::TrackingError, 3.0), Tier::Medium);
        assert_eq!(rate(MetricKind::TrackingError, 5.0), Tier::Poor);
    }

    #[test]
    fn correlation_and_drawdown() {
        assert_eq!(rate(MetricKind::Correlation, 0.9), Tier::Good);
        assert_eq!(rate(MetricKind::Correlation, 0.7), Tier::Medium);
        assert_eq!(rate(MetricKind::Correlation, 0.6), Tier::Poor);
        assert_eq!(rate(MetricKind::MaxDrawdown, -8.5), Tier::Good);
        assert_eq!(rate(MetricKind::MaxDrawdown, -12.0), Tier::Poor);
    }

    #[test]
    fn nan_is_poor() {
        assert_eq!(rate(MetricKind::Correlation, f64::NAN), Tier::Poor);
        assert_eq!(rate(MetricKind::Beta, f64::NAN), Tier::Poor);
    }
}
