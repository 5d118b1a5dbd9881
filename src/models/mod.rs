use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candle interval supported by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Hour,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Hour => "hour",
        }
    }
}

/// OHLCV record for one time interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered (oldest first) candle sequence for one pair and interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleSeries {
    pub pair: String,
    pub interval: Interval,
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

/// Indicator columns aligned by row index with their source series.
/// Rows before each window is satisfied hold `None` (serialized as null).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma_10: Vec<Option<f64>>,
    pub ema_10: Vec<Option<f64>>,
    pub rsi_14: Vec<Option<f64>>,
    pub stoch_k: Vec<Option<f64>>,
    pub stoch_d: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
}

/// A candle series together with its computed indicator columns
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedSeries {
    pub series: CandleSeries,
    pub indicators: IndicatorSet,
}

/// Per-currency balance entry as reported by the exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    pub balance: f64,
    pub avg_buy_price: f64,
}

/// Fresh account snapshot taken at the start of every decision cycle
#[derive(Debug, Clone, Serialize)]
pub struct AccountStatus {
    pub current_time: i64,
    pub orderbook: crate::exchange::OrderBook,
    pub btc_balance: f64,
    pub krw_balance: f64,
    pub btc_avg_buy_price: f64,
}

/// Recognized trade actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// Advice returned by the decision oracle.
///
/// `decision` is kept as the raw string: anything other than the three
/// recognized values means "do nothing", not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct Decision {
    pub decision: String,
    #[serde(default)]
    pub reason: String,
}

impl Decision {
    /// Map the raw decision string to an action, if recognized.
    pub fn action(&self) -> Option<Action> {
        match self.decision.as_str() {
            "buy" => Some(Action::Buy),
            "sell" => Some(Action::Sell),
            "hold" => Some(Action::Hold),
            _ => None,
        }
    }
}

/// Order acknowledgement from the exchange. Opaque to the pipeline,
/// logged only.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResult {
    pub uuid: String,
    pub side: String,
    pub market: String,
    #[serde(default)]
    pub state: Option<String>,
}
