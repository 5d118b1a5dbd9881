// Exchange connectivity: the trait the pipeline talks to, plus the
// order book snapshot types shared with the account reader.
pub mod upbit;

pub use upbit::UpbitClient;

use crate::error::Result;
use crate::models::{Balance, Candle, Interval, OrderResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One price level of the order book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookUnit {
    pub ask_price: f64,
    pub bid_price: f64,
    pub ask_size: f64,
    pub bid_size: f64,
}

/// Order book snapshot for a trading pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    pub market: String,
    /// Exchange-side snapshot time, unix milliseconds
    pub timestamp: i64,
    pub orderbook_units: Vec<OrderBookUnit>,
}

impl OrderBook {
    /// Best (lowest) ask price, if any depth exists
    pub fn best_ask(&self) -> Option<f64> {
        self.orderbook_units.first().map(|u| u.ask_price)
    }

    /// Best (highest) bid price, if any depth exists
    pub fn best_bid(&self) -> Option<f64> {
        self.orderbook_units.first().map(|u| u.bid_price)
    }
}

/// Exchange operations consumed by the pipeline.
///
/// Kept as a trait so the cycle, executor and account reader take an
/// injected handle and tests can substitute fakes.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Candles in ascending (oldest first) order
    async fn get_candles(&self, pair: &str, interval: Interval, count: usize)
        -> Result<Vec<Candle>>;

    async fn get_orderbook(&self, pair: &str) -> Result<OrderBook>;

    async fn get_balances(&self) -> Result<Vec<Balance>>;

    /// Market buy spending `krw_amount` of quote currency
    async fn buy_market_order(&self, pair: &str, krw_amount: f64) -> Result<OrderResult>;

    /// Market sell of `volume` base currency
    async fn sell_market_order(&self, pair: &str, volume: f64) -> Result<OrderResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_ask_and_bid() {
        let book = OrderBook {
            market: "KRW-BTC".to_string(),
            timestamp: 1_700_000_000_000,
            orderbook_units: vec![
                OrderBookUnit {
                    ask_price: 100_000_000.0,
                    bid_price: 99_990_000.0,
                    ask_size: 0.5,
                    bid_size: 0.2,
                },
                OrderBookUnit {
                    ask_price: 100_010_000.0,
                    bid_price: 99_980_000.0,
                    ask_size: 1.0,
                    bid_size: 1.0,
                },
            ],
        };

        assert_eq!(book.best_ask(), Some(100_000_000.0));
        assert_eq!(book.best_bid(), Some(99_990_000.0));
    }

    #[test]
    fn test_empty_book_has_no_prices() {
        let book = OrderBook {
            market: "KRW-BTC".to_string(),
            timestamp: 0,
            orderbook_units: vec![],
        };
        assert!(book.best_ask().is_none());
        assert!(book.best_bid().is_none());
    }
}
