use crate::error::{Result, TraderError};
use crate::exchange::{Exchange, OrderBook};
use crate::models::{Balance, Candle, Interval, OrderResult};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256, Sha512};

const UPBIT_API_BASE: &str = "https://api.upbit.com/v1";

/// Upbit REST client.
///
/// Candle and order book endpoints are public; balances and orders are
/// signed with a per-request JWT (HS256 over the access key + uuid nonce,
/// with a SHA512 hex hash of the query string for parameterized calls).
#[derive(Clone)]
pub struct UpbitClient {
    client: Client,
    base_url: String,
    access_key: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct UpbitCandle {
    opening_price: f64,
    high_price: f64,
    low_price: f64,
    trade_price: f64,
    candle_acc_trade_volume: f64,
    /// Snapshot time, unix milliseconds
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct UpbitBalance {
    currency: String,
    balance: String,
    avg_buy_price: String,
}

impl UpbitClient {
    pub fn new(access_key: String, secret_key: String) -> Result<Self> {
        Self::with_base_url(access_key, secret_key, UPBIT_API_BASE.to_string())
    }

    /// Base URL is injectable so HTTP tests can point at a local mock.
    pub fn with_base_url(access_key: String, secret_key: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| TraderError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            access_key,
            secret_key,
        })
    }

    /// Build the `Authorization` value for a signed request.
    ///
    /// `query` is the urlencoded parameter string exactly as sent, or
    /// `None` for endpoints called without parameters.
    fn auth_header(&self, query: Option<&str>) -> Result<String> {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);

        let nonce = uuid::Uuid::new_v4();
        let payload_json = match query {
            Some(q) => {
                let mut hasher = Sha512::new();
                hasher.update(q.as_bytes());
                let query_hash = hex::encode(hasher.finalize());
                format!(
                    r#"{{"access_key":"{}","nonce":"{}","query_hash":"{}","query_hash_alg":"SHA512"}}"#,
                    self.access_key, nonce, query_hash
                )
            }
            None => format!(
                r#"{{"access_key":"{}","nonce":"{}"}}"#,
                self.access_key, nonce
            ),
        };
        let payload = URL_SAFE_NO_PAD.encode(payload_json);

        let signing_input = format!("{}.{}", header, payload);
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| TraderError::Config(format!("invalid secret key: {}", e)))?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("Bearer {}.{}", signing_input, signature))
    }

    /// GET a public endpoint and deserialize the JSON body.
    async fn get_public<T: for<'de> Deserialize<'de>>(&self, url: &str) -> std::result::Result<T, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("network error: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("upbit API error ({}): {}", status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("failed to parse response: {}", e))
    }

    fn parse_amount(raw: &str, field: &str) -> Result<f64> {
        raw.parse::<f64>().map_err(|e| {
            TraderError::AccountUnavailable(format!("unparseable {} '{}': {}", field, raw, e))
        })
    }
}

#[async_trait]
impl Exchange for UpbitClient {
    async fn get_candles(
        &self,
        pair: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<Candle>> {
        let path = match interval {
            Interval::Day => "candles/days",
            Interval::Hour => "candles/minutes/60",
        };
        let url = format!("{}/{}?market={}&count={}", self.base_url, path, pair, count);

        let raw: Vec<UpbitCandle> = self
            .get_public(&url)
            .await
            .map_err(TraderError::DataUnavailable)?;

        // Upbit returns newest first; the pipeline wants ascending order.
        let mut candles = Vec::with_capacity(raw.len());
        for c in raw {
            let timestamp = DateTime::<Utc>::from_timestamp_millis(c.timestamp).ok_or_else(|| {
                TraderError::DataUnavailable(format!(
                    "candle timestamp {} out of range for {}",
                    c.timestamp, pair
                ))
            })?;
            candles.push(Candle {
                timestamp,
                open: c.opening_price,
                high: c.high_price,
                low: c.low_price,
                close: c.trade_price,
                volume: c.candle_acc_trade_volume,
            });
        }
        candles.reverse();

        Ok(candles)
    }

    async fn get_orderbook(&self, pair: &str) -> Result<OrderBook> {
        let url = format!("{}/orderbook?markets={}", self.base_url, pair);

        let mut books: Vec<OrderBook> = self
            .get_public(&url)
            .await
            .map_err(TraderError::AccountUnavailable)?;

        if books.is_empty() {
            return Err(TraderError::AccountUnavailable(format!(
                "no order book returned for {}",
                pair
            )));
        }
        Ok(books.remove(0))
    }

    async fn get_balances(&self) -> Result<Vec<Balance>> {
        let url = format!("{}/accounts", self.base_url);
        let auth = self.auth_header(None)?;

        let response = self
            .client
            .get(&url)
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| TraderError::AccountUnavailable(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TraderError::AccountUnavailable(format!(
                "upbit API error ({}): {}",
                status, body
            )));
        }

        let raw: Vec<UpbitBalance> = response.json().await.map_err(|e| {
            TraderError::AccountUnavailable(format!("failed to parse balances: {}", e))
        })?;

        raw.into_iter()
            .map(|b| {
                Ok(Balance {
                    balance: Self::parse_amount(&b.balance, "balance")?,
                    avg_buy_price: Self::parse_amount(&b.avg_buy_price, "avg_buy_price")?,
                    currency: b.currency,
                })
            })
            .collect()
    }

    async fn buy_market_order(&self, pair: &str, krw_amount: f64) -> Result<OrderResult> {
        let params = vec![
            ("market", pair.to_string()),
            ("side", "bid".to_string()),
            ("price", format!("{}", krw_amount)),
            ("ord_type", "price".to_string()),
        ];
        self.submit_order(&params).await
    }

    async fn sell_market_order(&self, pair: &str, volume: f64) -> Result<OrderResult> {
        let params = vec![
            ("market", pair.to_string()),
            ("side", "ask".to_string()),
            ("volume", format!("{}", volume)),
            ("ord_type", "market".to_string()),
        ];
        self.submit_order(&params).await
    }
}

impl UpbitClient {
    async fn submit_order(&self, params: &[(&str, String)]) -> Result<OrderResult> {
        let query: String = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let auth = self.auth_header(Some(&query))?;

        let url = format!("{}/orders", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", auth)
            .form(params)
            .send()
            .await
            .map_err(|e| TraderError::OrderSubmission(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TraderError::OrderSubmission(format!(
                "order rejected ({}): {}",
                status, body
            )));
        }

        response
            .json::<OrderResult>()
            .await
            .map_err(|e| TraderError::OrderSubmission(format!("failed to parse order ack: {}", e)))
    }
}
