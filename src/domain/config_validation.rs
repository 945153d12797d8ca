//! Configuration validation.
//!
//! Validates the `[analysis]` and `[data]` sections before any price data is
//! loaded. The first violation is reported.

use crate::domain::benchmark::Period;
use crate::domain::error::AnalyticsError;
use crate::domain::weights::{parse_symbols, parse_weights};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const SECTION: &str = "analysis";

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    validate_symbols(config)?;
    validate_weights(config)?;
    validate_risk_free_rate(config)?;
    validate_dates(config)?;
    validate_period(config)?;
    validate_rolling_window(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    match config.get_trimmed("data", "csv_dir") {
        Some(_) => Ok(()),
        None => Err(AnalyticsError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
        }),
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> AnalyticsError {
    AnalyticsError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    let symbols = config
        .get_trimmed(SECTION, "symbols")
        .ok_or_else(|| AnalyticsError::ConfigMissing {
            section: SECTION.to_string(),
            key: "symbols".to_string(),
        })?;
    parse_symbols(&symbols).map_err(|e| invalid("symbols", e.to_string()))?;
    Ok(())
}

fn validate_weights(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    if let Some(weights) = config.get_trimmed(SECTION, "weights") {
        parse_weights(&weights).map_err(|e| invalid("weights", e.to_string()))?;
    }
    Ok(())
}

/// A present value must parse as `T`; the typed getters would otherwise fall
/// back to their default.
fn require_parsable<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    key: &str,
    expected: &str,
) -> Result<(), AnalyticsError> {
    match config.get_trimmed(SECTION, key) {
        Some(raw) if raw.parse::<T>().is_err() => {
            Err(invalid(key, format!("{key} must be {expected}, got '{raw}'")))
        }
        _ => Ok(()),
    }
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    require_parsable::<f64>(config, "risk_free_rate", "a number")?;
    let value = config.get_double(SECTION, "risk_free_rate", 0.02);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            field,
            format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    let start = config
        .get_trimmed(SECTION, "start_date")
        .map(|s| parse_date(&s, "start_date"))
        .transpose()?;
    let end = config
        .get_trimmed(SECTION, "end_date")
        .map(|s| parse_date(&s, "end_date"))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid("start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

fn validate_period(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    if let Some(period) = config.get_trimmed(SECTION, "period") {
        period
            .parse::<Period>()
            .map_err(|e| invalid("period", e.to_string()))?;
        if config.get_trimmed(SECTION, "start_date").is_some() {
            return Err(invalid(
                "period",
                "period and start_date are mutually exclusive",
            ));
        }
    }
    Ok(())
}

fn validate_rolling_window(config: &dyn ConfigPort) -> Result<(), AnalyticsError> {
    require_parsable::<i64>(config, "rolling_window", "an integer")?;
    let value = config.get_int(SECTION, "rolling_window", 60);
    if value < 2 {
        return Err(invalid(
            "rolling_window",
            "rolling_window must be at least 2",
        ));
    }
    Ok(())
}
