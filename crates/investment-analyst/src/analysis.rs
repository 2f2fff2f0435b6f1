//! Analysis types and their prompt templates
//!
//! Every template is a pure function of the two (already uppercased)
//! tickers. Section order and format rules live in the template text and
//! are passed to the model as-is.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// The five canned analyses offered on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AnalysisType {
    #[default]
    ComprehensiveComparison,
    QuickOverview,
    FinancialMetricsFocus,
    RiskAnalysis,
    TechnicalAnalysis,
}

type Template = fn(&str, &str) -> String;

impl AnalysisType {
    /// Display order of the selector
    pub const ALL: [AnalysisType; 5] = [
        Self::ComprehensiveComparison,
        Self::QuickOverview,
        Self::FinancialMetricsFocus,
        Self::RiskAnalysis,
        Self::TechnicalAnalysis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ComprehensiveComparison => "Comprehensive Comparison",
            Self::QuickOverview => "Quick Overview",
            Self::FinancialMetricsFocus => "Financial Metrics Focus",
            Self::RiskAnalysis => "Risk Analysis",
            Self::TechnicalAnalysis => "Technical Analysis",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label.trim())
    }

    /// Resolve a submitted label. Anything unrecognised falls back to
    /// [`AnalysisType::ComprehensiveComparison`]; a blank value is the
    /// selector's initial state and falls back silently.
    pub fn parse_or_default(label: &str) -> Self {
        Self::from_label(label).unwrap_or_else(|| {
            if !label.trim().is_empty() {
                warn!(analysis_type = label, "Unknown analysis type, using Comprehensive Comparison");
            }
            Self::default()
        })
    }

    fn template(self) -> Template {
        match self {
            Self::ComprehensiveComparison => comprehensive_comparison,
            Self::QuickOverview => quick_overview,
            Self::FinancialMetricsFocus => financial_metrics_focus,
            Self::RiskAnalysis => risk_analysis,
            Self::TechnicalAnalysis => technical_analysis,
        }
    }

    /// Render the prompt for a ticker pair
    pub fn prompt(self, ticker_a: &str, ticker_b: &str) -> String {
        (self.template())(ticker_a, ticker_b)
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn comprehensive_comparison(a: &str, b: &str) -> String {
    format!(
        "Conduct a full investment-grade comparison of {a} and {b}.\n\n\
         Required sections (use all, in this order):\n\
         1. Executive Summary\n\
         2. Price & Performance Comparison\n\
         3. Fundamental Metrics Comparison\n\
         4. Analyst Consensus Comparison\n\
         5. Risk Factors Comparison\n\
         6. Conclusion\n\n\
         Guidelines:\n\
         - Use side-by-side tables wherever possible\n\
         - Highlight relative strengths and weaknesses\n\
         - Maintain a neutral, long-term investor perspective\n\
         - Do NOT give buy/sell recommendations"
    )
}

fn quick_overview(a: &str, b: &str) -> String {
    format!(
        "Provide a high-level snapshot comparison of {a} and {b}.\n\n\
         Only include:\n\
         - Current price\n\
         - Market capitalization\n\
         - P/E ratio\n\
         - Recent price performance\n\n\
         Rules:\n\
         - Use ONE compact comparison table\n\
         - Follow with at most 3 bullet points summarizing key differences\n\
         - Do NOT include risk analysis, analyst opinions, or deep fundamentals"
    )
}

fn financial_metrics_focus(a: &str, b: &str) -> String {
    format!(
        "Compare {a} and {b} strictly from a financial fundamentals perspective.\n\n\
         Focus ONLY on:\n\
         - Profitability (gross, operating, net margins, ROE, ROA)\n\
         - Valuation (P/E, P/B, EV/EBITDA if available)\n\
         - Financial health (debt levels, liquidity, cash flow strength)\n\n\
         Rules:\n\
         - Ignore stock price movement and technical indicators\n\
         - Ignore analyst ratings\n\
         - Explain what each metric indicates about business quality\n\
         - Use tables first, explanation second"
    )
}

fn risk_analysis(a: &str, b: &str) -> String {
    format!(
        "Compare risk profiles of {a} vs {b}.\n\n\
         Focus on:\n\
         - Beta and volatility\n\
         - 52-week price range\n\
         - Debt levels\n\
         - Revenue/earnings stability\n\n\
         Format: Brief table + 3-4 key risk points. State which is riskier."
    )
}

fn technical_analysis(a: &str, b: &str) -> String {
    format!(
        "Compare technical profiles of {a} vs {b}.\n\n\
         Include:\n\
         - Current trend (bullish/bearish/neutral)\n\
         - Moving averages (50-day, 200-day)\n\
         - RSI if available\n\
         - Volume trends\n\n\
         Format: Compact table + momentum comparison (2-3 sentences)."
    )
}
