//! Domain error types.

/// Top-level error type for benchmark analytics.
///
/// Degenerate metrics (zero denominators) are not errors; they resolve to 0
/// inside the metrics engine.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("insufficient overlap: {common} common dates, need at least {minimum}")]
    InsufficientOverlap { common: usize, minimum: usize },

    #[error("misaligned input: portfolio has {portfolio} returns, benchmark has {benchmark}")]
    MisalignedInput { portfolio: usize, benchmark: usize },

    #[error("invalid price series for {symbol}: {reason}")]
    InvalidPriceSeries { symbol: String, reason: String },

    #[error("invalid return series: {reason}")]
    InvalidReturnSeries { reason: String },

    #[error("invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("no price data for {symbol}")]
    NoPriceData { symbol: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AnalyticsError> for std::process::ExitCode {
    fn from(err: &AnalyticsError) -> Self {
        let code: u8 = match err {
            AnalyticsError::Io(_) => 1,
            AnalyticsError::ConfigParse { .. }
            | AnalyticsError::ConfigMissing { .. }
            | AnalyticsError::ConfigInvalid { .. } => 2,
            AnalyticsError::NoPriceData { .. } | AnalyticsError::DataSource { .. } => 3,
            AnalyticsError::InvalidPriceSeries { .. }
            | AnalyticsError::InvalidReturnSeries { .. }
            | AnalyticsError::InvalidWeights { .. } => 4,
            AnalyticsError::InsufficientOverlap { .. }
            | AnalyticsError::MisalignedInput { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_overlap_message() {
        let err = AnalyticsError::InsufficientOverlap {
            common: 10,
            minimum: 30,
        };
        assert_eq!(
            err.to_string(),
            "insufficient overlap: 10 common dates, need at least 30"
        );
    }

    #[test]
    fn config_invalid_message() {
        let err = AnalyticsError::ConfigInvalid {
            section: "analysis".into(),
            key: "risk_free_rate".into(),
            reason: "must be between 0 and 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [analysis] risk_free_rate: must be between 0 and 1"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AnalyticsError = io.into();
        assert!(matches!(err, AnalyticsError::Io(_)));
    }
}
