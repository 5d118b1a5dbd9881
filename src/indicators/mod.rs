// Technical indicators: fixed-window columns computed over a candle
// series. Pure functions, deterministic for identical input.

pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod stochastic;

pub use bollinger::bollinger_series;
pub use macd::macd_series;
pub use moving_average::{ema_series, ewm_series, sma_series};
pub use rsi::rsi_series;
pub use stochastic::stochastic_series;

use crate::models::{AnnotatedSeries, CandleSeries, IndicatorSet};

// Window lengths are fixed, not configuration.
const MA_PERIOD: usize = 10;
const RSI_PERIOD: usize = 14;
const STOCH_K_PERIOD: usize = 14;
const STOCH_SMOOTH_K: usize = 3;
const STOCH_D_PERIOD: usize = 3;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const BB_PERIOD: usize = 20;
const BB_MULT: f64 = 2.0;

/// Compute the full indicator set for a candle series.
///
/// Every column is index-aligned with the candles; rows before an
/// indicator's window is satisfied are `None`, which is expected for
/// early history, not an error.
pub fn annotate(series: &CandleSeries) -> AnnotatedSeries {
    let closes = series.closes();
    let highs: Vec<f64> = series.candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = series.candles.iter().map(|c| c.low).collect();

    let (stoch_k, stoch_d) = stochastic_series(
        &highs,
        &lows,
        &closes,
        STOCH_K_PERIOD,
        STOCH_SMOOTH_K,
        STOCH_D_PERIOD,
    );
    let (macd, macd_signal, macd_histogram) =
        macd_series(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let (bb_middle, bb_upper, bb_lower) = bollinger_series(&closes, BB_PERIOD, BB_MULT);

    let indicators = IndicatorSet {
        sma_10: sma_series(&closes, MA_PERIOD),
        ema_10: ema_series(&closes, MA_PERIOD),
        rsi_14: rsi_series(&closes, RSI_PERIOD),
        stoch_k,
        stoch_d,
        macd: macd.into_iter().map(Some).collect(),
        macd_signal: macd_signal.into_iter().map(Some).collect(),
        macd_histogram: macd_histogram.into_iter().map(Some).collect(),
        bb_middle,
        bb_upper,
        bb_lower,
    };

    AnnotatedSeries {
        series: series.clone(),
        indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candle, Interval};
    use chrono::{TimeZone, Utc};

    fn series(closes: &[f64]) -> CandleSeries {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::hours(i as i64),
                open: close - 1.0,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume: 10.0,
            })
            .collect();
        CandleSeries {
            pair: "KRW-BTC".to_string(),
            interval: Interval::Hour,
            candles,
        }
    }

    #[test]
    fn test_annotate_preserves_length_and_alignment() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64) * 1.5).collect();
        let annotated = annotate(&series(&closes));
        let ind = &annotated.indicators;

        assert_eq!(annotated.series.len(), 30);
        for col in [
            &ind.sma_10,
            &ind.ema_10,
            &ind.rsi_14,
            &ind.stoch_k,
            &ind.stoch_d,
            &ind.macd,
            &ind.macd_signal,
            &ind.macd_histogram,
            &ind.bb_middle,
            &ind.bb_upper,
            &ind.bb_lower,
        ] {
            assert_eq!(col.len(), 30);
        }

        // Windows: SMA/EMA from row 9, RSI from 14, %K from 15, %D from
        // 17, Bollinger from 19, MACD family from row 0.
        assert!(ind.sma_10[8].is_none() && ind.sma_10[9].is_some());
        assert!(ind.ema_10[8].is_none() && ind.ema_10[9].is_some());
        assert!(ind.rsi_14[13].is_none() && ind.rsi_14[14].is_some());
        assert!(ind.stoch_k[14].is_none() && ind.stoch_k[15].is_some());
        assert!(ind.stoch_d[16].is_none() && ind.stoch_d[17].is_some());
        assert!(ind.bb_middle[18].is_none() && ind.bb_middle[19].is_some());
        assert!(ind.macd[0].is_some());
        assert!(ind.macd_signal[0].is_some());
    }

    #[test]
    fn test_annotate_is_deterministic() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + ((i * 7) % 13) as f64).collect();
        let s = series(&closes);
        let a = annotate(&s);
        let b = annotate(&s);

        assert_eq!(a.indicators.rsi_14, b.indicators.rsi_14);
        assert_eq!(a.indicators.macd, b.indicators.macd);
        assert_eq!(a.indicators.bb_upper, b.indicators.bb_upper);
    }

    #[test]
    fn test_annotate_short_series_is_all_none_where_unsatisfied() {
        let closes = vec![100.0, 101.0, 102.0];
        let annotated = annotate(&series(&closes));
        let ind = &annotated.indicators;

        assert!(ind.sma_10.iter().all(|v| v.is_none()));
        assert!(ind.rsi_14.iter().all(|v| v.is_none()));
        assert!(ind.bb_middle.iter().all(|v| v.is_none()));
        // MACD needs no warm-up
        assert!(ind.macd.iter().all(|v| v.is_some()));
    }
}
