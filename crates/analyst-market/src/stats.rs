//! Summaries computed from daily bars
//!
//! These only condense raw quotes for the model (averages, ranges,
//! standard indicators); the report itself is written by the model.

use crate::error::{MarketError, Result};
use crate::source::Bar;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use ta::Next;
use ta::indicators::{RelativeStrengthIndex, SimpleMovingAverage};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const RSI_PERIOD: usize = 14;
const VOLUME_WINDOW: usize = 20;

/// Performance of a symbol over a window of bars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub trading_days: usize,
    pub first_close: f64,
    pub last_close: f64,
    pub change_pct: f64,
    pub period_high: f64,
    pub period_low: f64,
    /// Annualised standard deviation of daily log returns, in percent
    pub annualized_volatility_pct: Option<f64>,
    pub average_volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Rising,
    Falling,
    Flat,
}

/// Moving averages, momentum and range for the latest bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalSnapshot {
    pub as_of: DateTime<Utc>,
    pub last_close: f64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi_14: Option<f64>,
    pub rsi_signal: Option<&'static str>,
    pub trend: Trend,
    /// Last 20 sessions' average volume against the 20 before them
    pub volume_trend: Option<VolumeTrend>,
    pub week_52_high: f64,
    pub week_52_low: f64,
}

/// Summarise a window of bars; `None` when there are no bars
pub fn summarize_prices(bars: &[Bar]) -> Option<PriceSummary> {
    let first = bars.first()?;
    let last = bars.last()?;

    let change_pct = if first.close == 0.0 {
        0.0
    } else {
        (last.close - first.close) / first.close * 100.0
    };

    Some(PriceSummary {
        start: first.timestamp,
        end: last.timestamp,
        trading_days: bars.len(),
        first_close: first.close,
        last_close: last.close,
        change_pct,
        period_high: bars.iter().map(|b| b.high).fold(f64::MIN, f64::max),
        period_low: bars.iter().map(|b| b.low).fold(f64::MAX, f64::min),
        annualized_volatility_pct: annualized_volatility(bars),
        average_volume: bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64,
    })
}

/// Technical snapshot of the most recent bar. Expects about a year of bars;
/// indicators whose window is longer than the data are left out.
pub fn technical_snapshot(bars: &[Bar]) -> Result<TechnicalSnapshot> {
    let last = bars
        .last()
        .ok_or_else(|| MarketError::Indicator("no bars to analyse".to_string()))?;
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let sma_50 = sma(&closes, 50)?;
    let sma_200 = sma(&closes, 200)?;
    let rsi_14 = rsi(&closes, RSI_PERIOD)?;

    let year_ago = last.timestamp - Duration::days(365);
    let last_year = bars.iter().filter(|b| b.timestamp >= year_ago);

    Ok(TechnicalSnapshot {
        as_of: last.timestamp,
        last_close: last.close,
        sma_50,
        sma_200,
        rsi_14,
        rsi_signal: rsi_14.map(interpret_rsi),
        trend: classify_trend(last.close, sma_50, sma_200),
        volume_trend: volume_trend(bars),
        week_52_high: last_year.clone().map(|b| b.high).fold(f64::MIN, f64::max),
        week_52_low: last_year.map(|b| b.low).fold(f64::MAX, f64::min),
    })
}

fn sma(closes: &[f64], period: usize) -> Result<Option<f64>> {
    if closes.len() < period {
        return Ok(None);
    }
    let mut sma =
        SimpleMovingAverage::new(period).map_err(|e| MarketError::Indicator(e.to_string()))?;
    Ok(closes.iter().map(|&c| sma.next(c)).last())
}

fn rsi(closes: &[f64], period: usize) -> Result<Option<f64>> {
    if closes.len() <= period {
        return Ok(None);
    }
    let mut rsi =
        RelativeStrengthIndex::new(period).map_err(|e| MarketError::Indicator(e.to_string()))?;
    Ok(closes.iter().map(|&c| rsi.next(c)).last())
}

fn interpret_rsi(rsi: f64) -> &'static str {
    if rsi >= 70.0 {
        "overbought"
    } else if rsi <= 30.0 {
        "oversold"
    } else {
        "neutral"
    }
}

/// Price above a rising stack of averages is bullish, below a falling one
/// bearish. With only the 50-day average the side of it decides.
fn classify_trend(price: f64, sma_50: Option<f64>, sma_200: Option<f64>) -> Trend {
    match (sma_50, sma_200) {
        (Some(short), Some(long)) if price > short && short > long => Trend::Bullish,
        (Some(short), Some(long)) if price < short && short < long => Trend::Bearish,
        (Some(_), Some(_)) => Trend::Neutral,
        (Some(short), None) if price > short => Trend::Bullish,
        (Some(short), None) if price < short => Trend::Bearish,
        _ => Trend::Neutral,
    }
}

fn volume_trend(bars: &[Bar]) -> Option<VolumeTrend> {
    if bars.len() < VOLUME_WINDOW * 2 {
        return None;
    }
    let average = |window: &[Bar]| {
        window.iter().map(|b| b.volume as f64).sum::<f64>() / window.len() as f64
    };
    let split = bars.len() - VOLUME_WINDOW;
    let recent = average(&bars[split..]);
    let prior = average(&bars[split - VOLUME_WINDOW..split]);
    if prior == 0.0 {
        return None;
    }

    let ratio = recent / prior;
    Some(if ratio > 1.1 {
        VolumeTrend::Rising
    } else if ratio < 0.9 {
        VolumeTrend::Falling
    } else {
        VolumeTrend::Flat
    })
}

fn annualized_volatility(bars: &[Bar]) -> Option<f64> {
    let returns: Vec<f64> = bars
        .windows(2)
        .filter(|w| w[0].close > 0.0 && w[1].close > 0.0)
        .map(|w| (w[1].close / w[0].close).ln())
        .collect();
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Daily bars, one per calendar day, closing at `closes[i]`
    pub(crate) fn bars_from(closes: &[f64], volumes: impl Fn(usize) -> u64) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                adjclose: close,
                volume: volumes(i),
            })
            .collect()
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn test_summary_of_rising_series() {
        let bars = bars_from(&rising(11), |_| 1_000);
        let summary = summarize_prices(&bars).unwrap();

        assert_eq!(summary.trading_days, 11);
        assert_eq!(summary.first_close, 100.0);
        assert_eq!(summary.last_close, 110.0);
        assert!((summary.change_pct - 10.0).abs() < 1e-9);
        assert_eq!(summary.period_high, 111.0);
        assert_eq!(summary.period_low, 99.0);
        assert_eq!(summary.average_volume, 1_000.0);
        assert!(summary.annualized_volatility_pct.unwrap() > 0.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(summarize_prices(&[]).is_none());
    }

    #[test]
    fn test_flat_series_has_zero_volatility() {
        let bars = bars_from(&[50.0; 5], |_| 10);
        let summary = summarize_prices(&bars).unwrap();
        assert_eq!(summary.annualized_volatility_pct, Some(0.0));
        assert_eq!(summary.change_pct, 0.0);
    }

    #[test]
    fn test_snapshot_bullish_year() {
        // Volume doubles over the final 20 sessions
        let bars = bars_from(&rising(260), |i| if i >= 240 { 2_000 } else { 1_000 });
        let snapshot = technical_snapshot(&bars).unwrap();

        assert_eq!(snapshot.last_close, 359.0);
        // mean of the last 50 closes: 310..=359
        assert!((snapshot.sma_50.unwrap() - 334.5).abs() < 1e-9);
        assert!((snapshot.sma_200.unwrap() - 259.5).abs() < 1e-9);
        assert_eq!(snapshot.trend, Trend::Bullish);
        assert!(snapshot.rsi_14.unwrap() > 70.0);
        assert_eq!(snapshot.rsi_signal, Some("overbought"));
        assert_eq!(snapshot.volume_trend, Some(VolumeTrend::Rising));
        assert_eq!(snapshot.week_52_high, 360.0);
        // only the trailing 365 days count; all 260 bars are within it
        assert_eq!(snapshot.week_52_low, 99.0);
    }

    #[test]
    fn test_snapshot_bearish_short_history() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let bars = bars_from(&closes, |_| 500);
        let snapshot = technical_snapshot(&bars).unwrap();

        assert!(snapshot.sma_200.is_none());
        assert!(snapshot.sma_50.is_some());
        assert_eq!(snapshot.trend, Trend::Bearish);
        assert_eq!(snapshot.rsi_signal, Some("oversold"));
        assert_eq!(snapshot.volume_trend, Some(VolumeTrend::Flat));
    }

    #[test]
    fn test_snapshot_too_short_for_indicators() {
        let bars = bars_from(&[10.0, 11.0, 12.0], |_| 1);
        let snapshot = technical_snapshot(&bars).unwrap();
        assert!(snapshot.sma_50.is_none());
        assert!(snapshot.rsi_14.is_none());
        assert!(snapshot.volume_trend.is_none());
        assert_eq!(snapshot.trend, Trend::Neutral);
    }

    #[test]
    fn test_snapshot_requires_bars() {
        assert!(matches!(
            technical_snapshot(&[]),
            Err(MarketError::Indicator(_))
        ));
    }

    #[test]
    fn test_trend_classification() {
        assert_eq!(classify_trend(10.0, Some(9.0), Some(8.0)), Trend::Bullish);
        assert_eq!(classify_trend(7.0, Some(8.0), Some(9.0)), Trend::Bearish);
        assert_eq!(classify_trend(8.5, Some(9.0), Some(8.0)), Trend::Neutral);
        assert_eq!(classify_trend(10.0, None, None), Trend::Neutral);
    }
}
