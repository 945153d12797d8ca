//! Price data access port trait.
//!
//! Supplies chronological closing prices per symbol. Remote retrieval,
//! retries and symbol validation live behind this seam, outside the core.

use crate::domain::error::AnalyticsError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices with `start <= date <= end`, oldest first.
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, AnalyticsError>;

    fn list_symbols(&self) -> Result<Vec<String>, AnalyticsError>;

    /// First date, last date and row count, or `None` when the symbol has no data.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, AnalyticsError>;
}
