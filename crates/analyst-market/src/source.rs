//! Quote sources

use crate::error::{MarketError, Result};
use crate::fundamentals::Fundamentals;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjclose: f64,
    pub volume: u64,
}

/// Named look-back windows for price history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    YearToDate,
}

impl HistoryRange {
    pub const ALL: [HistoryRange; 8] = [
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::YearToDate,
    ];

    pub fn parse(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| MarketError::InvalidRange(value.to_string()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::YearToDate => "ytd",
        }
    }

    /// Start of the window ending at `end`
    pub fn start(self, end: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            Self::FiveDays => 5,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1825,
            Self::YearToDate => {
                return NaiveDate::from_ymd_opt(end.year(), 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map_or(end - Duration::days(365), |d| d.and_utc());
            }
        };
        end - Duration::days(days)
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim and uppercase a ticker, rejecting anything that cannot be one
///
/// Accepts letters, digits and the `.`, `-`, `^`, `=` used by Yahoo for
/// share classes, indices and currencies (`BRK-B`, `^GSPC`, `EURUSD=X`).
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(MarketError::InvalidSymbol("symbol is empty".to_string()));
    }
    if symbol.len() > 15
        || !symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        return Err(MarketError::InvalidSymbol(symbol));
    }
    Ok(symbol)
}

/// Where daily bars come from
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Source name cited in tool results
    fn name(&self) -> &str;

    /// Most recent daily bar
    async fn latest(&self, symbol: &str) -> Result<Bar>;

    /// Daily bars over `range`, oldest first
    async fn history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<Bar>>;

    /// Company profile, valuation, financial health and analyst consensus
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals>;
}

/// Yahoo Finance chart API
#[derive(Debug, Default, Clone, Copy)]
pub struct YahooQuoteSource;

impl YahooQuoteSource {
    pub fn new() -> Self {
        Self
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| MarketError::Yahoo(e.to_string()))
    }
}

fn to_bar(quote: &yahoo::Quote) -> Bar {
    Bar {
        timestamp: DateTime::from_timestamp(quote.timestamp as i64, 0).unwrap_or_else(Utc::now),
        open: quote.open,
        high: quote.high,
        low: quote.low,
        close: quote.close,
        adjclose: quote.adjclose,
        volume: quote.volume,
    }
}

#[async_trait]
impl QuoteSource for YahooQuoteSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn latest(&self, symbol: &str) -> Result<Bar> {
        let response = Self::connector()?
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| MarketError::Yahoo(e.to_string()))?;

        let quote = response
            .last_quote()
            .map_err(|e| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        Ok(to_bar(&quote))
    }

    async fn history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<Bar>> {
        let end = Utc::now();
        let start = range.start(end);

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| MarketError::Yahoo(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| MarketError::Yahoo(format!("Invalid end timestamp: {e}")))?;

        let response = Self::connector()?
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| MarketError::Yahoo(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        debug!(symbol, range = %range, bars = quotes.len(), "Fetched price history");
        Ok(quotes.iter().map(to_bar).collect())
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let mut connector = Self::connector()?;
        let summary = connector
            .get_ticker_info(symbol)
            .await
            .map_err(|e| MarketError::Yahoo(e.to_string()))?;

        let data = summary
            .quote_summary
            .and_then(|s| s.result)
            .and_then(|result| result.into_iter().next())
            .ok_or_else(|| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no quote summary returned".to_string(),
            })?;

        let fundamentals = Fundamentals::from_summary(data, Utc::now());
        debug!(symbol, empty = fundamentals.is_empty(), "Fetched fundamentals");
        Ok(fundamentals)
    }
}
