use crate::error::{Result, TraderError};
use crate::exchange::Exchange;
use std::sync::Arc;

/// Orders worth less than this many KRW are rejected by the exchange as
/// dust, so we never submit them.
pub const MIN_ORDER_KRW: f64 = 5_000.0;

/// Fraction of the balance held back to cover trading fees; ordering
/// the full balance gets rejected as over-balance.
pub const FEE_RESERVE: f64 = 0.0005;

/// Places market orders for one pair, guarded by the minimum-notional
/// threshold. Fire-and-forget: order failures are logged here and never
/// propagate to the cycle.
pub struct TradeExecutor {
    exchange: Arc<dyn Exchange>,
    pair: String,
}

impl TradeExecutor {
    pub fn new(exchange: Arc<dyn Exchange>, pair: impl Into<String>) -> Self {
        Self {
            exchange,
            pair: pair.into(),
        }
    }

    /// Market buy with the full KRW balance minus the fee reserve.
    pub async fn buy(&self) {
        tracing::info!(pair = %self.pair, "attempting market buy");
        if let Err(e) = self.try_buy().await {
            tracing::error!(pair = %self.pair, error = %e, "buy attempt failed");
        }
    }

    /// Market sell of the full BTC balance minus the fee reserve, if its
    /// notional at the best ask clears the threshold.
    pub async fn sell(&self) {
        tracing::info!(pair = %self.pair, "attempting market sell");
        if let Err(e) = self.try_sell().await {
            tracing::error!(pair = %self.pair, error = %e, "sell attempt failed");
        }
    }

    async fn try_buy(&self) -> Result<()> {
        let krw = self.quote_balance().await?;
        let spendable = krw * (1.0 - FEE_RESERVE);
        if spendable <= MIN_ORDER_KRW {
            tracing::info!(
                krw_balance = krw,
                "KRW balance below minimum order size, skipping buy"
            );
            return Ok(());
        }

        let result = self.exchange.buy_market_order(&self.pair, spendable).await?;
        tracing::info!(order = ?result, amount_krw = spendable, "buy order submitted");
        Ok(())
    }

    async fn try_sell(&self) -> Result<()> {
        let btc = self.base_balance().await?;
        let orderbook = self.exchange.get_orderbook(&self.pair).await?;
        let best_ask = orderbook.best_ask().ok_or_else(|| {
            TraderError::OrderSubmission("order book has no ask side".to_string())
        })?;

        let notional = btc * best_ask;
        if notional <= MIN_ORDER_KRW {
            tracing::info!(
                btc_balance = btc,
                notional_krw = notional,
                "BTC notional below minimum order size, skipping sell"
            );
            return Ok(());
        }

        let volume = btc * (1.0 - FEE_RESERVE);
        let result = self.exchange.sell_market_order(&self.pair, volume).await?;
        tracing::info!(order = ?result, volume_btc = volume, "sell order submitted");
        Ok(())
    }

    async fn quote_balance(&self) -> Result<f64> {
        Ok(self
            .exchange
            .get_balances()
            .await?
            .iter()
            .find(|b| b.currency == "KRW")
            .map(|b| b.balance)
            .unwrap_or(0.0))
    }

    async fn base_balance(&self) -> Result<f64> {
        Ok(self
            .exchange
            .get_balances()
            .await?
            .iter()
            .find(|b| b.currency == "BTC")
            .map(|b| b.balance)
            .unwrap_or(0.0))
    }
}
