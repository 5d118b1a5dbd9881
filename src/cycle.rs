use crate::account;
use crate::config::Instructions;
use crate::error::{Result, TraderError};
use crate::exchange::Exchange;
use crate::execution::TradeExecutor;
use crate::indicators;
use crate::market;
use crate::models::{Action, AnnotatedSeries, Interval};
use crate::oracle::DecisionOracle;
use std::sync::Arc;

const DAILY_COUNT: usize = 30;
const HOURLY_COUNT: usize = 24;

/// States of one decision cycle. Any upstream failure short-circuits
/// straight back to `Idle` without executing a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    FetchingData,
    ReadingAccount,
    AwaitingDecision,
    Executing,
}

/// What a completed cycle ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Bought,
    Sold,
    Held,
    /// Decision parsed but not recognized; nothing was done.
    NoAction,
    /// An upstream failure aborted the cycle before execution.
    Aborted,
}

/// One full pass of the pipeline: fetch + annotate market data, read the
/// account, ask the oracle, execute the recommendation.
pub struct DecisionCycle {
    exchange: Arc<dyn Exchange>,
    oracle: Arc<dyn DecisionOracle>,
    executor: TradeExecutor,
    instructions: Instructions,
    pair: String,
}

impl DecisionCycle {
    pub fn new(
        exchange: Arc<dyn Exchange>,
        oracle: Arc<dyn DecisionOracle>,
        instructions: Instructions,
        pair: impl Into<String>,
    ) -> Self {
        let pair = pair.into();
        let executor = TradeExecutor::new(exchange.clone(), pair.clone());
        Self {
            exchange,
            oracle,
            executor,
            instructions,
            pair,
        }
    }

    /// Run one cycle to completion. Failures are logged and reported as
    /// `Aborted`; they never propagate to the scheduler loop.
    pub async fn run(&self) -> CycleOutcome {
        match self.execute().await {
            Ok(outcome) => {
                tracing::info!(?outcome, "cycle complete");
                outcome
            }
            Err(e) => {
                tracing::error!(error = %e, "cycle aborted");
                CycleOutcome::Aborted
            }
        }
    }

    async fn execute(&self) -> Result<CycleOutcome> {
        self.enter(CycleState::FetchingData);
        let daily = market::fetch(self.exchange.as_ref(), &self.pair, Interval::Day, DAILY_COUNT)
            .await?;
        let hourly = market::fetch(
            self.exchange.as_ref(),
            &self.pair,
            Interval::Hour,
            HOURLY_COUNT,
        )
        .await?;
        let daily = indicators::annotate(&daily);
        let hourly = indicators::annotate(&hourly);
        let market_json = market_payload(&daily, &hourly)?;

        self.enter(CycleState::ReadingAccount);
        let status = account::snapshot(self.exchange.as_ref(), &self.pair).await?;
        let account_json = serde_json::to_string(&status).map_err(|e| {
            TraderError::AccountUnavailable(format!("failed to serialize account status: {}", e))
        })?;

        self.enter(CycleState::AwaitingDecision);
        let instructions = match &self.instructions {
            Instructions::Loaded(text) => text.as_str(),
            Instructions::Absent => {
                return Err(TraderError::OracleError(
                    "instruction document absent, cannot query oracle".to_string(),
                ))
            }
        };
        let decision = self
            .oracle
            .decide(instructions, &market_json, &account_json)
            .await?;

        self.enter(CycleState::Executing);
        let outcome = match decision.action() {
            Some(Action::Buy) => {
                tracing::info!(reason = %decision.reason, "oracle says buy");
                self.executor.buy().await;
                CycleOutcome::Bought
            }
            Some(Action::Sell) => {
                tracing::info!(reason = %decision.reason, "oracle says sell");
                self.executor.sell().await;
                CycleOutcome::Sold
            }
            Some(Action::Hold) => {
                tracing::info!(reason = %decision.reason, "oracle says hold");
                CycleOutcome::Held
            }
            None => {
                tracing::warn!(
                    decision = %decision.decision,
                    reason = %decision.reason,
                    "unrecognized decision, taking no action"
                );
                CycleOutcome::NoAction
            }
        };

        self.enter(CycleState::Idle);
        Ok(outcome)
    }

    fn enter(&self, state: CycleState) {
        tracing::debug!(?state, pair = %self.pair, "cycle state");
    }
}

/// Serialize the combined daily+hourly dataset the oracle sees: one row
/// per candle with its indicator columns (null before each window).
fn market_payload(daily: &AnnotatedSeries, hourly: &AnnotatedSeries) -> Result<String> {
    let payload = serde_json::json!({
        "daily": series_rows(daily),
        "hourly": series_rows(hourly),
    });
    serde_json::to_string(&payload)
        .map_err(|e| TraderError::DataUnavailable(format!("failed to serialize dataset: {}", e)))
}

fn series_rows(annotated: &AnnotatedSeries) -> Vec<serde_json::Value> {
    let ind = &annotated.indicators;
    annotated
        .series
        .candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            serde_json::json!({
                "timestamp": c.timestamp.to_rfc3339(),
                "open": c.open,
                "high": c.high,
                "low": c.low,
                "close": c.close,
                "volume": c.volume,
                "sma_10": ind.sma_10[i],
                "ema_10": ind.ema_10[i],
                "rsi_14": ind.rsi_14[i],
                "stoch_k": ind.stoch_k[i],
                "stoch_d": ind.stoch_d[i],
                "macd": ind.macd[i],
                "macd_signal": ind.macd_signal[i],
                "macd_histogram": ind.macd_histogram[i],
                "bb_middle": ind.bb_middle[i],
                "bb_upper": ind.bb_upper[i],
                "bb_lower": ind.bb_lower[i],
            })
        })
        .collect()
}
