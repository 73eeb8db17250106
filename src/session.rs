use tracing::info;

use crate::data::ChatMessage;
use crate::error::{ErrorHandler, LevelError, LevelResult};
use crate::levels::{generate_levels, LevelSet};
use crate::quote::PriceSource;

pub const GREETING: &str =
    "Enter a ticker symbol (e.g. BTCUSD, AAPL) and I'll build Pine Script levels from its current price.";

/// Transcript of one chat plus the most recent successful level set.
///
/// `submit` takes `&mut self`, so a session cannot start a second price fetch
/// while one is still outstanding.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    last_levels: Option<LevelSet>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            last_levels: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_levels(&self) -> Option<&LevelSet> {
        self.last_levels.as_ref()
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Handles one user submission and returns the assistant's reply.
    /// Failures become the reply text; nothing is retried.
    pub async fn submit(&mut self, source: &dyn PriceSource, input: &str) -> &ChatMessage {
        let symbol = input.trim();
        if !symbol.is_empty() {
            self.messages.push(ChatMessage::user(symbol));
        }

        let reply = match Self::levels_for(source, symbol).await {
            Ok(levels) => {
                let reply = ChatMessage::assistant_with_script(
                    summarize(&levels),
                    levels.script.clone(),
                );
                self.last_levels = Some(levels);
                reply
            }
            Err(e) => ChatMessage::assistant(ErrorHandler::user_message(&e)),
        };

        self.messages.push(reply);
        &self.messages[self.messages.len() - 1]
    }

    async fn levels_for(source: &dyn PriceSource, symbol: &str) -> LevelResult<LevelSet> {
        if symbol.is_empty() {
            return Err(LevelError::EmptySymbol);
        }

        let price = source.fetch_approx_price(symbol).await?;
        info!("Building levels for {} from price {}", symbol, price);
        generate_levels(price, symbol)
    }
}

fn summarize(levels: &LevelSet) -> String {
    format!(
        "{} is trading around {}. Base {} gives support {:?}, base level {} and resistance {:?}. Paste the script below into TradingView's Pine editor.",
        levels.symbol.to_uppercase(),
        levels.base_price,
        levels.base,
        levels.support(),
        levels.base_level(),
        levels.resistance()
    )
}
