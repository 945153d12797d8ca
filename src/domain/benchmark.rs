//! Named benchmarks and lookback periods.

use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BENCHMARK_SYMBOL: &str = "SPY";

/// Display name → ticker.
pub const BENCHMARKS: [(&str, &str); 5] = [
    ("S&P 500", "SPY"),
    ("Russell 2000", "IWM"),
    ("NASDAQ 100", "QQQ"),
    ("MSCI World", "URTH"),
    ("Emerging Markets", "EEM"),
];

/// Resolves a benchmark display name (case-insensitive) to its ticker. Any
/// other non-empty value is taken as a ticker itself; empty input falls back to
/// [`DEFAULT_BENCHMARK_SYMBOL`].
pub fn resolve_benchmark(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_BENCHMARK_SYMBOL.to_string();
    }
    BENCHMARKS
        .iter()
        .find(|(display, _)| display.eq_ignore_ascii_case(trimmed))
        .map(|(_, symbol)| symbol.to_string())
        .unwrap_or_else(|| trimmed.to_uppercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
}

impl Period {
    pub fn days(self) -> i64 {
        match self {
            Period::OneMonth => 30,
            Period::ThreeMonths => 91,
            Period::SixMonths => 182,
            Period::OneYear => 365,
            Period::TwoYears => 730,
            Period::FiveYears => 1826,
        }
    }

    /// First calendar date covered when looking back from `end`.
    pub fn start_from(self, end: NaiveDate) -> NaiveDate {
        end - Duration::days(self.days())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown period '{0}' (expected 1mo, 3mo, 6mo, 1y, 2y or 5y)")]
pub struct UnknownPeriod(pub String);

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1mo" | "1 month" => Ok(Period::OneMonth),
            "3mo" | "3 months" => Ok(Period::ThreeMonths),
            "6mo" | "6 months" => Ok(Period::SixMonths),
            "1y" | "1 year" => Ok(Period::OneYear),
            "2y" | "2 years" => Ok(Period::TwoYears),
            "5y" | "5 years" => Ok(Period::FiveYears),
            _ => Err(UnknownPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_named_benchmarks() {
        assert_eq!(resolve_benchmark("S&P 500"), "SPY");
        assert_eq!(resolve_benchmark("nasdaq 100"), "QQQ");
        assert_eq!(resolve_benchmark("Emerging Markets"), "EEM");
    }

    #[test]
    fn raw_symbols_pass_through_uppercased() {
        assert_eq!(resolve_benchmark("vti"), "VTI");
    }

    #[test]
    fn empty_name_defaults_to_spy() {
        assert_eq!(resolve_benchmark("  "), "SPY");
    }

    #[test]
    fn period_parsing() {
        assert_eq!("1y".parse::<Period>().unwrap(), Period::OneYear);
        assert_eq!("6 Months".parse::<Period>().unwrap(), Period::SixMonths);
        assert_eq!("5Y".parse::<Period>().unwrap(), Period::FiveYears);
        assert!("10y".parse::<Period>().is_err());
    }

    #[test]
    fn period_display_round_trips() {
        for p in [Period::OneMonth, Period::ThreeMonths, Period::TwoYears] {
            assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
        }
    }

    #[test]
    fn start_from_counts_back_days() {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            Period::OneYear.start_from(end),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            Period::OneMonth.start_from(end),
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
    }
}
