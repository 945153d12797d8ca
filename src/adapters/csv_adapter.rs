//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv` (the file name is matched
//! case-insensitively), with a header row. The `date` and `close` columns are
//! located by name (case-insensitive); any other columns are ignored.
//! `adj close` is preferred over `close` when present.

use crate::domain::error::AnalyticsError;
use crate::domain::price_series::{DatedPrice, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// `<SYMBOL>.csv` when present, otherwise any `.csv` file whose stem
    /// matches the symbol case-insensitively.
    fn csv_path(&self, symbol: &str) -> PathBuf {
        let symbol = symbol.trim();
        let canonical = self.base_path.join(format!("{}.csv", symbol.to_uppercase()));
        if canonical.is_file() {
            return canonical;
        }

        fs::read_dir(&self.base_path)
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                path.extension().is_some_and(|ext| ext == "csv")
                    && path
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .is_some_and(|stem| stem.eq_ignore_ascii_case(symbol))
            })
            .unwrap_or(canonical)
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, AnalyticsError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };

        let date = find(&["date"]).ok_or_else(|| AnalyticsError::DataSource {
            reason: "missing date column".into(),
        })?;
        let close = find(&["adj close", "adj_close"])
            .or_else(|| find(&["close"]))
            .ok_or_else(|| AnalyticsError::DataSource {
                reason: "missing close column".into(),
            })?;
        Ok(Columns { date, close })
    }

    /// Reads every row of a symbol's file, sorted by date.
    fn read_rows(&self, symbol: &str) -> Result<Vec<DatedPrice>, AnalyticsError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| AnalyticsError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| AnalyticsError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?
            .clone();
        let columns = Self::locate_columns(&headers)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| AnalyticsError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(columns.date).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                AnalyticsError::DataSource {
                    reason: format!("invalid date format '{}': {}", date_str, e),
                }
            })?;

            let close: f64 = record
                .get(columns.close)
                .unwrap_or_default()
                .trim()
                .parse()
                .map_err(|e| AnalyticsError::DataSource {
                    reason: format!("invalid close value on {}: {}", date, e),
                })?;

            rows.push(DatedPrice { date, price: close });
        }

        rows.sort_by_key(|r| r.date);
        debug!(symbol, rows = rows.len(), path = %path.display(), "loaded csv");
        Ok(rows)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, AnalyticsError> {
        let series = PriceSeries::new(symbol.to_uppercase(), self.read_rows(symbol)?)?
            .between(start_date, end_date);

        if series.is_empty() {
            return Err(AnalyticsError::NoPriceData {
                symbol: symbol.to_uppercase(),
            });
        }
        Ok(series)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyticsError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| AnalyticsError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AnalyticsError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_uppercase());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, AnalyticsError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let rows = self.read_rows(symbol)?;
        match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, rows.len()))),
            _ => Ok(None),
        }
    }
}
