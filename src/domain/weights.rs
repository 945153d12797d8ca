//! Instrument weights and symbol lists.
//!
//! Parses comma-separated lists from configuration: symbols (`AAPL,MSFT`) and
//! weights (`AAPL:0.6,MSFT:0.4`).

use crate::domain::error::AnalyticsError;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListParseError {
    #[error("empty token in list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("malformed weight entry: {0} (expected SYMBOL:WEIGHT)")]
    MalformedWeight(String),

    #[error("weight for {0} must be a finite, non-negative number")]
    InvalidWeight(String),
}

impl From<ListParseError> for AnalyticsError {
    fn from(err: ListParseError) -> Self {
        AnalyticsError::InvalidWeights {
            reason: err.to_string(),
        }
    }
}

/// Non-negative weights keyed by symbol, kept in the order supplied.
///
/// Weights need not sum to one; the portfolio aligner normalizes by
/// [`Weights::total`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    entries: Vec<(String, f64)>,
}

impl Weights {
    pub fn new<S: Into<String>>(
        entries: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self, ListParseError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for (symbol, weight) in entries {
            let symbol = symbol.into().trim().to_uppercase();
            if symbol.is_empty() {
                return Err(ListParseError::EmptyToken);
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(ListParseError::InvalidWeight(symbol));
            }
            if !seen.insert(symbol.clone()) {
                return Err(ListParseError::DuplicateSymbol(symbol));
            }
            out.push((symbol, weight));
        }

        Ok(Self { entries: out })
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, w)| (s.as_str(), *w))
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|(s, _)| s.as_str()).collect()
    }

    /// Sum of every supplied weight, including symbols without price data.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, ListParseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ListParseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(ListParseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

pub fn parse_weights(input: &str) -> Result<Weights, ListParseError> {
    let mut entries = Vec::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ListParseError::EmptyToken);
        }
        let (symbol, weight) = trimmed
            .split_once(':')
            .ok_or_else(|| ListParseError::MalformedWeight(trimmed.to_string()))?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ListParseError::MalformedWeight(trimmed.to_string()));
        }
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| ListParseError::MalformedWeight(trimmed.to_string()))?;
        entries.push((symbol.to_string(), weight));
    }

    Weights::new(entries)
}
