use thiserror::Error;

/// Failure taxonomy for the decision pipeline.
///
/// Every variant except `Config` is caught at the boundary of the
/// component that raises it, logged, and aborts only the current cycle.
/// The scheduler loop keeps running; the next trigger is the retry.
#[derive(Debug, Error)]
pub enum TraderError {
    /// The exchange returned no candles or the request failed.
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    /// Balance or order book lookup failed.
    #[error("account status unavailable: {0}")]
    AccountUnavailable(String),

    /// The oracle call itself failed (transport, HTTP status, empty body).
    #[error("oracle request failed: {0}")]
    OracleError(String),

    /// The oracle answered, but not with parseable advice.
    #[error("malformed oracle decision: {0}")]
    MalformedDecision(String),

    /// Order placement was rejected or never reached the exchange.
    #[error("order submission failed: {0}")]
    OrderSubmission(String),

    /// Startup configuration problem. The only fatal variant.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TraderError>;
