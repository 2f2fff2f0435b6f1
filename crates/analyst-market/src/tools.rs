//! Market-data tools exposed to the model

use crate::error::MarketError;
use crate::source::{HistoryRange, QuoteSource, normalize_symbol};
use crate::stats::{summarize_prices, technical_snapshot};
use analyst_agent::{Tool, ToolError, ToolResult, schema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

/// Bars returned verbatim at the tail of a history summary
const RECENT_CLOSES: usize = 10;

/// All market-data tools sharing one quote source
pub fn market_data_tools(source: Arc<dyn QuoteSource>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(StockPriceTool::new(source.clone())),
        Arc::new(PriceHistoryTool::new(source.clone())),
        Arc::new(TechnicalIndicatorsTool::new(source.clone())),
        Arc::new(CompanyFundamentalsTool::new(source)),
    ]
}

#[derive(Debug, Deserialize)]
struct SymbolParams {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    symbol: String,
    #[serde(default)]
    range: Option<String>,
}

fn parse_params<T: for<'de> Deserialize<'de>>(params: Value) -> ToolResult<T> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

fn symbol_schema() -> Value {
    schema::string("Stock ticker symbol (e.g. AAPL, MSFT, BRK-B)")
}

fn symbol_only() -> Value {
    schema::object(json!({ "symbol": symbol_schema() }), &["symbol"])
}

/// Latest daily price and change against the previous close
pub struct StockPriceTool {
    source: Arc<dyn QuoteSource>,
}

impl StockPriceTool {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: SymbolParams = parse_params(params)?;
        let symbol = normalize_symbol(&params.symbol)?;
        info!(tool = self.name(), symbol = %symbol, "Fetching latest price");

        let quote = self.source.latest(&symbol).await?;
        // The previous close is a nicety; a failed lookup only drops the change fields
        let recent = self
            .source
            .history(&symbol, HistoryRange::FiveDays)
            .await
            .unwrap_or_default();
        let previous_close = recent
            .iter()
            .rev()
            .find(|b| b.timestamp.date_naive() < quote.timestamp.date_naive())
            .map(|b| b.close);

        let mut result = json!({
            "symbol": symbol,
            "source": self.source.name(),
            "as_of": quote.timestamp.to_rfc3339(),
            "price": quote.close,
            "open": quote.open,
            "day_high": quote.high,
            "day_low": quote.low,
            "volume": quote.volume,
        });
        if let Some(previous) = previous_close.filter(|p| *p > 0.0) {
            result["previous_close"] = json!(previous);
            result["change"] = json!(quote.close - previous);
            result["change_pct"] = json!((quote.close - previous) / previous * 100.0);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "get_stock_price"
    }

    fn description(&self) -> &str {
        "Get the latest daily price of a stock: close, open, day high/low, volume and change versus the previous close."
    }

    fn parameters(&self) -> Value {
        symbol_only()
    }
}

/// Performance summary over a look-back window
pub struct PriceHistoryTool {
    source: Arc<dyn QuoteSource>,
}

impl PriceHistoryTool {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for PriceHistoryTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: HistoryParams = parse_params(params)?;
        let symbol = normalize_symbol(&params.symbol)?;
        let range = match params.range.as_deref() {
            Some(range) => HistoryRange::parse(range)?,
            None => HistoryRange::OneYear,
        };
        info!(tool = self.name(), symbol = %symbol, range = %range, "Fetching price history");

        let bars = self.source.history(&symbol, range).await?;
        let summary = summarize_prices(&bars).ok_or_else(|| MarketError::DataUnavailable {
            symbol: symbol.clone(),
            reason: format!("no price history for range {range}"),
        })?;

        let recent: Vec<Value> = bars[bars.len().saturating_sub(RECENT_CLOSES)..]
            .iter()
            .map(|b| json!({ "date": b.timestamp.date_naive().to_string(), "close": b.close }))
            .collect();

        Ok(json!({
            "symbol": symbol,
            "source": self.source.name(),
            "as_of": summary.end.to_rfc3339(),
            "range": range.as_str(),
            "summary": summary,
            "recent_closes": recent,
        }))
    }

    fn name(&self) -> &str {
        "get_price_history"
    }

    fn description(&self) -> &str {
        "Summarise a stock's price history over a range: return, high/low, annualised volatility, average volume and the most recent closes."
    }

    fn parameters(&self) -> Value {
        schema::object(
            json!({
                "symbol": symbol_schema(),
                "range": schema::string_enum(
                    "Look-back window (default 1y)",
                    &HistoryRange::ALL.map(HistoryRange::as_str),
                ),
            }),
            &["symbol"],
        )
    }
}

/// 50/200-day moving averages, RSI, trend, volume trend and 52-week range
pub struct TechnicalIndicatorsTool {
    source: Arc<dyn QuoteSource>,
}

impl TechnicalIndicatorsTool {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for TechnicalIndicatorsTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: SymbolParams = parse_params(params)?;
        let symbol = normalize_symbol(&params.symbol)?;
        info!(tool = self.name(), symbol = %symbol, "Computing technical indicators");

        let bars = self.source.history(&symbol, HistoryRange::OneYear).await?;
        if bars.is_empty() {
            return Err(MarketError::DataUnavailable {
                symbol,
                reason: "no price history for the last year".to_string(),
            }
            .into());
        }
        let snapshot = technical_snapshot(&bars)?;

        Ok(json!({
            "symbol": symbol,
            "source": self.source.name(),
            "as_of": snapshot.as_of.to_rfc3339(),
            "indicators": snapshot,
        }))
    }

    fn name(&self) -> &str {
        "get_technical_indicators"
    }

    fn description(&self) -> &str {
        "Get technical indicators for a stock from one year of daily bars: 50-day and 200-day SMA, 14-day RSI, trend (bullish/bearish/neutral), volume trend and 52-week high/low."
    }

    fn parameters(&self) -> Value {
        symbol_only()
    }
}

/// Company profile, valuation, profitability, debt and analyst consensus
pub struct CompanyFundamentalsTool {
    source: Arc<dyn QuoteSource>,
}

impl CompanyFundamentalsTool {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for CompanyFundamentalsTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: SymbolParams = parse_params(params)?;
        let symbol = normalize_symbol(&params.symbol)?;
        info!(tool = self.name(), symbol = %symbol, "Fetching company fundamentals");

        let fundamentals = self.source.fundamentals(&symbol).await?;
        if fundamentals.is_empty() {
            return Err(MarketError::DataUnavailable {
                symbol,
                reason: "no fundamentals published for this symbol".to_string(),
            }
            .into());
        }

        Ok(json!({
            "symbol": symbol,
            "source": self.source.name(),
            "as_of": fundamentals.as_of.to_rfc3339(),
            "fundamentals": fundamentals,
        }))
    }

    fn name(&self) -> &str {
        "get_company_fundamentals"
    }

    fn description(&self) -> &str {
        "Get company fundamentals: sector, market cap, P/E, price/book, beta, margins, ROE/ROA, growth, debt, cash, current ratio, free cash flow and analyst consensus (recommendation, mean rating, number of analysts, mean price target). Ratios and margins are fractions; missing figures are null."
    }

    fn parameters(&self) -> Value {
        symbol_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::fundamentals::Fundamentals;
    use crate::source::Bar;
    use crate::stats::tests::bars_from;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    /// Serves synthetic bars and fundamentals and records which ranges
    /// were requested
    struct FakeSource {
        bars: Vec<Bar>,
        fundamentals: Fundamentals,
        requested: Mutex<Vec<(String, HistoryRange)>>,
    }

    impl FakeSource {
        fn rising(n: usize) -> Arc<Self> {
            let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
            Arc::new(Self {
                bars: bars_from(&closes, |_| 1_000),
                fundamentals: Fundamentals {
                    as_of: Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap(),
                    name: Some("Fake Corp".to_string()),
                    market_cap: Some(2_500_000_000_000),
                    trailing_pe: Some(35.2),
                    beta: Some(1.1),
                    profit_margin: Some(0.36),
                    total_debt: Some(80_000_000_000),
                    recommendation: Some("buy".to_string()),
                    ..Fundamentals::default()
                },
                requested: Mutex::new(Vec::new()),
            })
        }

        fn without_fundamentals() -> Arc<Self> {
            Arc::new(Self {
                bars: Vec::new(),
                fundamentals: Fundamentals::default(),
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl QuoteSource for FakeSource {
        fn name(&self) -> &str {
            "Fake Exchange"
        }

        async fn latest(&self, symbol: &str) -> Result<Bar> {
            self.bars.last().cloned().ok_or_else(|| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "empty".to_string(),
            })
        }

        async fn history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<Bar>> {
            self.requested
                .lock()
                .unwrap()
                .push((symbol.to_string(), range));
            Ok(self.bars.clone())
        }

        async fn fundamentals(&self, _symbol: &str) -> Result<Fundamentals> {
            Ok(self.fundamentals.clone())
        }
    }

    #[test]
    fn test_tool_metadata() {
        let tools = market_data_tools(FakeSource::rising(1));
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "get_stock_price",
                "get_price_history",
                "get_technical_indicators",
                "get_company_fundamentals"
            ]
        );
        for tool in &tools {
            assert_eq!(tool.parameters()["required"], json!(["symbol"]));
            assert!(!tool.description().is_empty());
        }
    }

    #[tokio::test]
    async fn test_stock_price_includes_change_and_citation() {
        let source = FakeSource::rising(5);
        let tool = StockPriceTool::new(source.clone());
        let result = tool.execute(json!({"symbol": " aapl "})).await.unwrap();

        assert_eq!(result["symbol"], "AAPL");
        assert_eq!(result["source"], "Fake Exchange");
        assert_eq!(result["price"], 104.0);
        assert_eq!(result["previous_close"], 103.0);
        assert_eq!(result["change"], 1.0);
        assert!(result["as_of"].as_str().unwrap().starts_with("2024-01-06"));
        assert_eq!(
            source.requested.lock().unwrap()[0],
            ("AAPL".to_string(), HistoryRange::FiveDays)
        );
    }

    #[tokio::test]
    async fn test_price_history_default_range() {
        let source = FakeSource::rising(30);
        let tool = PriceHistoryTool::new(source.clone());
        let result = tool.execute(json!({"symbol": "msft"})).await.unwrap();

        assert_eq!(result["range"], "1y");
        assert_eq!(result["summary"]["trading_days"], 30);
        assert_eq!(result["recent_closes"].as_array().unwrap().len(), 10);
        assert_eq!(result["recent_closes"][9]["close"], 129.0);
        assert_eq!(source.requested.lock().unwrap()[0].1, HistoryRange::OneYear);
    }

    #[tokio::test]
    async fn test_price_history_rejects_unknown_range() {
        let tool = PriceHistoryTool::new(FakeSource::rising(3));
        let err = tool
            .execute(json!({"symbol": "MSFT", "range": "decade"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(msg) if msg.contains("decade")));
    }

    #[tokio::test]
    async fn test_technical_indicators() {
        let tool = TechnicalIndicatorsTool::new(FakeSource::rising(260));
        let result = tool.execute(json!({"symbol": "NVDA"})).await.unwrap();

        assert_eq!(result["indicators"]["trend"], "bullish");
        assert_eq!(result["indicators"]["rsi_signal"], "overbought");
        assert!(result["indicators"]["sma_200"].is_number());
    }

    #[tokio::test]
    async fn test_invalid_symbol_and_params() {
        let tool = TechnicalIndicatorsTool::new(FakeSource::rising(3));
        let err = tool.execute(json!({"symbol": ""})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));

        let err = tool.execute(json!({"ticker": "AAPL"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_empty_history_is_a_failure() {
        let err = TechnicalIndicatorsTool::new(FakeSource::without_fundamentals())
            .execute(json!({"symbol": "ZZZZ"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Failed(msg) if msg.contains("ZZZZ")));
    }

    #[test]
    fn test_history_range_schema_lists_every_range() {
        let params = PriceHistoryTool::new(FakeSource::rising(1)).parameters();
        assert_eq!(params["type"], "object");
        assert_eq!(
            params["properties"]["range"]["enum"],
            json!(["5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "ytd"])
        );
    }

    #[tokio::test]
    async fn test_fundamentals_cover_valuation_risk_and_consensus() {
        let tool = CompanyFundamentalsTool::new(FakeSource::rising(3));
        let result = tool.execute(json!({"symbol": "aapl"})).await.unwrap();

        assert_eq!(result["symbol"], "AAPL");
        assert_eq!(result["source"], "Fake Exchange");
        assert!(result["as_of"].as_str().unwrap().starts_with("2024-01-02"));
        let f = &result["fundamentals"];
        assert_eq!(f["market_cap"], 2_500_000_000_000_u64);
        assert_eq!(f["trailing_pe"], 35.2);
        assert_eq!(f["beta"], 1.1);
        assert_eq!(f["profit_margin"], 0.36);
        assert_eq!(f["total_debt"], 80_000_000_000_u64);
        assert_eq!(f["recommendation"], "buy");
        assert!(f["gross_margin"].is_null());
    }

    #[tokio::test]
    async fn test_missing_fundamentals_is_a_failure() {
        let err = CompanyFundamentalsTool::new(FakeSource::without_fundamentals())
            .execute(json!({"symbol": "ZZZZ"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Failed(msg) if msg.contains("ZZZZ")));
    }
}
