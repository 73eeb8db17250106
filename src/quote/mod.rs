use async_trait::async_trait;

use crate::error::{LevelError, LevelResult};

pub mod completion;

/// Anything that can give an approximate current price for a ticker.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_approx_price(&self, symbol: &str) -> LevelResult<f64>;
}

pub fn build_price_prompt(symbol: &str) -> String {
    format!(
        "What is the current price of {} in USD? Reply with only the number, no currency symbol, no commas and no other text.",
        symbol.trim().to_uppercase()
    )
}

/// Pulls a price out of free-form model output.
///
/// Everything but ASCII digits and '.' is dropped, then the longest leading
/// decimal number is parsed. "$50,123.45" gives 50123.45. Zero, negative and
/// unparseable results give `None`.
pub fn extract_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (i, c) in cleaned.char_indices() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        } else {
            seen_digit = true;
        }
        end = i + 1;
    }

    if !seen_digit {
        return None;
    }

    let price: f64 = cleaned[..end].parse().ok()?;
    if price.is_finite() && price > 0.0 {
        Some(price)
    } else {
        None
    }
}

/// Returns a fixed answer. Backs `chat --offline-price`.
pub struct StaticPriceSource {
    answer: LevelResult<f64>,
}

impl StaticPriceSource {
    pub fn price(price: f64) -> Self {
        Self { answer: Ok(price) }
    }

    pub fn failing(error: LevelError) -> Self {
        Self { answer: Err(error) }
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn fetch_approx_price(&self, _symbol: &str) -> LevelResult<f64> {
        self.answer.clone()
    }
}
