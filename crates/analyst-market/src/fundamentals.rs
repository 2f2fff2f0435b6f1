//! Company profile, valuation, financial health and analyst consensus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use yahoo_finance_api as yahoo;

/// Fundamentals of one company. Every figure is optional: Yahoo omits
/// fields it has no data for, and the model is expected to say so.
///
/// Ratios and margins are fractions (`0.25` is 25%), amounts are in
/// `currency`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub as_of: DateTime<Utc>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub currency: Option<String>,

    // Valuation
    pub market_cap: Option<u64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub dividend_yield: Option<f64>,

    // Risk
    pub beta: Option<f64>,

    // Profitability
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub profit_margin: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,

    // Financial health
    pub total_debt: Option<u64>,
    pub total_cash: Option<u64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub free_cashflow: Option<i64>,

    // Analyst consensus
    pub recommendation: Option<String>,
    /// 1.0 strong buy ... 5.0 sell
    pub recommendation_mean: Option<f64>,
    pub analyst_count: Option<u64>,
    pub target_mean_price: Option<f64>,
}

impl Fundamentals {
    /// Flatten Yahoo's quote summary modules into one record
    pub(crate) fn from_summary(data: yahoo::YSummaryData, as_of: DateTime<Utc>) -> Self {
        let mut out = Self {
            as_of,
            ..Self::default()
        };

        if let Some(profile) = data.asset_profile {
            out.sector = profile.sector;
            out.industry = profile.industry;
        }
        if let Some(quote_type) = data.quote_type {
            out.name = quote_type.long_name.or(quote_type.short_name);
        }
        if let Some(detail) = data.summary_detail {
            out.currency = detail.currency;
            out.market_cap = detail.market_cap;
            out.trailing_pe = detail.trailing_pe.filter(|pe| pe.is_finite());
            out.forward_pe = detail.forward_pe.filter(|pe| pe.is_finite());
            out.dividend_yield = detail.dividend_yield;
            out.beta = detail.beta;
        }
        if let Some(stats) = data.default_key_statistics {
            out.price_to_book = stats.price_to_book;
            out.beta = out.beta.or(stats.beta);
            out.forward_pe = out.forward_pe.or(stats.forward_pe.filter(|pe| pe.is_finite()));
        }
        if let Some(financial) = data.financial_data {
            out.gross_margin = financial.gross_margins;
            out.operating_margin = financial.operating_margins;
            out.profit_margin = financial.profit_margins;
            out.return_on_equity = financial.return_on_equity;
            out.return_on_assets = financial.return_on_assets;
            out.revenue_growth = financial.revenue_growth;
            out.earnings_growth = financial.earnings_growth;
            out.total_debt = financial.total_debt;
            out.total_cash = financial.total_cash;
            out.debt_to_equity = financial.debt_to_equity;
            out.current_ratio = financial.current_ratio;
            out.free_cashflow = financial.free_cashflow;
            out.recommendation = financial.recommendation_key;
            out.recommendation_mean = financial.recommendation_mean;
            out.analyst_count = financial.number_of_analyst_opinions;
            out.target_mean_price = financial.target_mean_price;
            out.currency = out.currency.or(financial.financial_currency);
        }
        out
    }

    /// No figure at all, only identity fields
    pub fn is_empty(&self) -> bool {
        self.market_cap.is_none()
            && self.trailing_pe.is_none()
            && self.beta.is_none()
            && self.profit_margin.is_none()
            && self.total_debt.is_none()
            && self.recommendation.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn summary(value: serde_json::Value) -> yahoo::YSummaryData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_summary_merges_modules() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 14, 20, 0, 0).unwrap();
        let data = summary(json!({
            "assetProfile": {
                "sector": "Technology",
                "industry": "Consumer Electronics",
                "companyOfficers": []
            },
            "quoteType": { "longName": "Apple Inc.", "shortName": "Apple" },
            "summaryDetail": {
                "currency": "USD",
                "marketCap": 3_000_000_000_000_u64,
                "trailingPE": 31.5,
                "beta": 1.25
            },
            "defaultKeyStatistics": { "priceToBook": 47.0, "forwardPE": 28.0 },
            "financialData": {
                "grossMargins": 0.46,
                "operatingMargins": 0.30,
                "profitMargins": 0.26,
                "totalDebt": 104_000_000_000_u64,
                "debtToEquity": 151.9,
                "recommendationKey": "buy",
                "recommendationMean": 2.0,
                "numberOfAnalystOpinions": 38
            }
        }));

        let f = Fundamentals::from_summary(data, as_of);
        assert_eq!(f.name.as_deref(), Some("Apple Inc."));
        assert_eq!(f.sector.as_deref(), Some("Technology"));
        assert_eq!(f.market_cap, Some(3_000_000_000_000));
        assert_eq!(f.trailing_pe, Some(31.5));
        assert_eq!(f.forward_pe, Some(28.0));
        assert_eq!(f.beta, Some(1.25));
        assert_eq!(f.price_to_book, Some(47.0));
        assert_eq!(f.operating_margin, Some(0.30));
        assert_eq!(f.total_debt, Some(104_000_000_000));
        assert_eq!(f.recommendation.as_deref(), Some("buy"));
        assert_eq!(f.analyst_count, Some(38));
        assert_eq!(f.as_of, as_of);
        assert!(!f.is_empty());
    }

    #[test]
    fn test_infinite_pe_is_dropped() {
        let data = summary(json!({ "summaryDetail": { "trailingPE": "Infinity" } }));
        let f = Fundamentals::from_summary(data, Utc::now());
        assert_eq!(f.trailing_pe, None);
        assert!(f.is_empty());
    }
}
