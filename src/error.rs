use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LevelError {
    #[error("price too low for symbol {symbol} (must be >= 4)")]
    PriceTooLow { symbol: String },

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Price out of range: {0}")]
    PriceOutOfRange(String),

    #[error("No valid price for {symbol}: {detail}")]
    QuoteUnavailable { symbol: String, detail: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Quote API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Symbol cannot be empty")]
    EmptySymbol,
}

impl From<reqwest::Error> for LevelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LevelError::Network(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            LevelError::Network(format!("Connection error: {}", err))
        } else if err.is_decode() {
            LevelError::Api(format!("Malformed response body: {}", err))
        } else {
            LevelError::Network(format!("HTTP error: {}", err))
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::Api(format!("JSON parsing error: {}", err))
    }
}

pub type LevelResult<T> = Result<T, LevelError>;

/// Turns errors into the text shown to the user at the submission boundary.
pub struct ErrorHandler;

impl ErrorHandler {
    /// Log error and return a user-friendly message
    pub fn user_message(error: &LevelError) -> String {
        match error {
            LevelError::PriceTooLow { .. } => {
                warn!("Rejected input: {}", error);
                error.to_string()
            }
            LevelError::InvalidPrice(msg) | LevelError::PriceOutOfRange(msg) => {
                warn!("Unusable price: {}", msg);
                format!("Cannot build levels from that price: {}", msg)
            }
            LevelError::QuoteUnavailable { symbol, detail } => {
                warn!("Quote unavailable for {}: {}", symbol, detail);
                format!(
                    "Could not get a valid price for {}. Please try a different symbol.",
                    symbol
                )
            }
            LevelError::Network(msg) => {
                error!("Network error: {}", msg);
                "Sorry, I couldn't reach the pricing service. Please try again later.".to_string()
            }
            LevelError::Api(msg) => {
                error!("Quote API error: {}", msg);
                "Sorry, the pricing service returned an error. Please try again later.".to_string()
            }
            LevelError::Configuration(msg) => {
                error!("Configuration error: {}", msg);
                format!("Configuration error: {}", msg)
            }
            LevelError::EmptySymbol => "Please enter a ticker symbol, e.g. BTCUSD.".to_string(),
        }
    }

    /// Nothing is retried automatically; the user has to submit again.
    pub fn is_retryable(_error: &LevelError) -> bool {
        false
    }
}
