use crate::error::Result;
use crate::exchange::Exchange;
use crate::models::AccountStatus;

const BASE_CURRENCY: &str = "BTC";
const QUOTE_CURRENCY: &str = "KRW";

/// Fresh account snapshot for the pair: order book time and depth plus
/// BTC/KRW balances. A currency missing from the balance list simply
/// means a zero balance.
///
/// Never cached; the exchange is authoritative and the cycle re-reads
/// it every time.
pub async fn snapshot(exchange: &dyn Exchange, pair: &str) -> Result<AccountStatus> {
    let orderbook = exchange.get_orderbook(pair).await?;
    let balances = exchange.get_balances().await?;

    let mut btc_balance = 0.0;
    let mut krw_balance = 0.0;
    let mut btc_avg_buy_price = 0.0;
    for entry in &balances {
        if entry.currency == BASE_CURRENCY {
            btc_balance = entry.balance;
            btc_avg_buy_price = entry.avg_buy_price;
        }
        if entry.currency == QUOTE_CURRENCY {
            krw_balance = entry.balance;
        }
    }

    Ok(AccountStatus {
        current_time: orderbook.timestamp,
        orderbook,
        btc_balance,
        krw_balance,
        btc_avg_buy_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TraderError;
    use crate::exchange::{OrderBook, OrderBookUnit};
    use crate::models::{Balance, Candle, Interval, OrderResult};
    use async_trait::async_trait;

    struct CannedAccount {
        balances: Vec<Balance>,
        fail: bool,
    }

    #[async_trait]
    impl Exchange for CannedAccount {
        async fn get_candles(
            &self,
            _pair: &str,
            _interval: Interval,
            _count: usize,
        ) -> Result<Vec<Candle>> {
            unimplemented!()
        }

        async fn get_orderbook(&self, pair: &str) -> Result<OrderBook> {
            if self.fail {
                return Err(TraderError::AccountUnavailable("down".to_string()));
            }
            Ok(OrderBook {
                market: pair.to_string(),
                timestamp: 1_700_000_000_123,
                orderbook_units: vec![OrderBookUnit {
                    ask_price: 100_000_000.0,
                    bid_price: 99_990_000.0,
                    ask_size: 1.0,
                    bid_size: 1.0,
                }],
            })
        }

        async fn get_balances(&self) -> Result<Vec<Balance>> {
            Ok(self.balances.clone())
        }

        async fn buy_market_order(&self, _pair: &str, _krw: f64) -> Result<OrderResult> {
            unimplemented!()
        }

        async fn sell_market_order(&self, _pair: &str, _volume: f64) -> Result<OrderResult> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_snapshot_reads_both_currencies() {
        let exchange = CannedAccount {
            balances: vec![
                Balance {
                    currency: "BTC".to_string(),
                    balance: 0.05,
                    avg_buy_price: 95_000_000.0,
                },
                Balance {
                    currency: "KRW".to_string(),
                    balance: 250_000.0,
                    avg_buy_price: 0.0,
                },
            ],
            fail: false,
        };

        let status = snapshot(&exchange, "KRW-BTC").await.unwrap();
        assert_eq!(status.current_time, 1_700_000_000_123);
        assert_eq!(status.btc_balance, 0.05);
        assert_eq!(status.krw_balance, 250_000.0);
        assert_eq!(status.btc_avg_buy_price, 95_000_000.0);
    }

    #[tokio::test]
    async fn test_missing_currencies_default_to_zero() {
        let exchange = CannedAccount {
            balances: vec![Balance {
                currency: "ETH".to_string(),
                balance: 2.0,
                avg_buy_price: 4_000_000.0,
            }],
            fail: false,
        };

        let status = snapshot(&exchange, "KRW-BTC").await.unwrap();
        assert_eq!(status.btc_balance, 0.0);
        assert_eq!(status.krw_balance, 0.0);
        assert_eq!(status.btc_avg_buy_price, 0.0);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let exchange = CannedAccount {
            balances: vec![],
            fail: true,
        };
        let err = snapshot(&exchange, "KRW-BTC").await.unwrap_err();
        assert!(matches!(err, TraderError::AccountUnavailable(_)));
    }
}
