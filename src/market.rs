use crate::error::{Result, TraderError};
use crate::exchange::Exchange;
use crate::models::{CandleSeries, Interval};

/// Fetch a candle series for one pair and interval.
///
/// Candles come back in ascending order; an empty response counts as
/// unavailable data, not an empty series.
pub async fn fetch(
    exchange: &dyn Exchange,
    pair: &str,
    interval: Interval,
    count: usize,
) -> Result<CandleSeries> {
    if count == 0 {
        return Err(TraderError::DataUnavailable(
            "requested candle count must be positive".to_string(),
        ));
    }

    let candles = exchange.get_candles(pair, interval, count).await?;
    if candles.is_empty() {
        return Err(TraderError::DataUnavailable(format!(
            "exchange returned no {} candles for {}",
            interval.as_str(),
            pair
        )));
    }

    Ok(CandleSeries {
        pair: pair.to_string(),
        interval,
        candles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::OrderBook;
    use crate::models::{Balance, Candle, OrderResult};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct CannedExchange {
        candles: Vec<Candle>,
    }

    #[async_trait]
    impl Exchange for CannedExchange {
        async fn get_candles(
            &self,
            _pair: &str,
            _interval: Interval,
            _count: usize,
        ) -> Result<Vec<Candle>> {
            Ok(self.candles.clone())
        }

        async fn get_orderbook(&self, _pair: &str) -> Result<OrderBook> {
            unimplemented!()
        }

        async fn get_balances(&self) -> Result<Vec<Balance>> {
            unimplemented!()
        }

        async fn buy_market_order(&self, _pair: &str, _krw: f64) -> Result<OrderResult> {
            unimplemented!()
        }

        async fn sell_market_order(&self, _pair: &str, _volume: f64) -> Result<OrderResult> {
            unimplemented!()
        }
    }

    fn candle(close: f64) -> Candle {
        Candle {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    #[tokio::test]
    async fn test_fetch_builds_series() {
        let exchange = CannedExchange {
            candles: vec![candle(100.0), candle(101.0)],
        };
        let series = fetch(&exchange, "KRW-BTC", Interval::Day, 2).await.unwrap();

        assert_eq!(series.pair, "KRW-BTC");
        assert_eq!(series.interval, Interval::Day);
        assert_eq!(series.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_empty_response_is_unavailable() {
        let exchange = CannedExchange { candles: vec![] };
        let err = fetch(&exchange, "KRW-BTC", Interval::Hour, 24)
            .await
            .unwrap_err();
        assert!(matches!(err, TraderError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_zero_count_rejected() {
        let exchange = CannedExchange { candles: vec![] };
        let err = fetch(&exchange, "KRW-BTC", Interval::Day, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, TraderError::DataUnavailable(_)));
    }
}
