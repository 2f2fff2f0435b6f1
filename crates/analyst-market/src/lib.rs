//! Market data for the analyst agent
//!
//! Quotes come from a [`QuoteSource`] (Yahoo Finance in production). The
//! tools in [`tools`] summarise raw daily bars into compact JSON the model
//! can put in its comparison tables: latest price, period performance, a
//! technical snapshot and company fundamentals.

pub mod error;
pub mod fundamentals;
pub mod source;
pub mod stats;
pub mod tools;

pub use error::{MarketError, Result};
pub use fundamentals::Fundamentals;
pub use source::{Bar, HistoryRange, QuoteSource, YahooQuoteSource, normalize_symbol};
pub use stats::{PriceSummary, TechnicalSnapshot, Trend, VolumeTrend, summarize_prices, technical_snapshot};
pub use tools::{
    CompanyFundamentalsTool, PriceHistoryTool, StockPriceTool, TechnicalIndicatorsTool, market_data_tools,
};
