use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::QuoteApiConfig;
use crate::error::{LevelError, LevelResult};
use crate::quote::{build_price_prompt, extract_price, PriceSource};

const SYSTEM_PROMPT: &str =
    "You are a market data assistant. Answer price questions with a single number only.";

#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<CompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_search: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

impl CompletionResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Chat-completions client that asks the model for a ticker's current price.
pub struct CompletionClient {
    pub client: Client,
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub web_search: bool,
}

impl CompletionClient {
    pub fn new(cfg: &QuoteApiConfig) -> LevelResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| LevelError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            web_search: cfg.web_search,
        })
    }

    pub fn build_request(&self, symbol: &str) -> CompletionRequest<'_> {
        CompletionRequest {
            model: &self.model,
            messages: vec![
                CompletionMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                CompletionMessage {
                    role: "user".to_string(),
                    content: build_price_prompt(symbol),
                },
            ],
            disable_search: if self.web_search { None } else { Some(true) },
        }
    }

    async fn complete(&self, symbol: &str) -> LevelResult<String> {
        let request = self.build_request(symbol);
        info!("Requesting price for {} from {} ({})", symbol, self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LevelError::Api(format!("{}: {}", status, body)));
        }

        let body = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&body)?;
        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| LevelError::Api("response contained no choices".to_string()))
    }
}

/// Maps a model answer onto a price, failing when it holds no usable number.
pub fn price_from_answer(symbol: &str, answer: &str) -> LevelResult<f64> {
    extract_price(answer).ok_or_else(|| LevelError::QuoteUnavailable {
        symbol: symbol.to_string(),
        detail: format!("no positive number in answer {:?}", answer.trim()),
    })
}

#[async_trait]
impl PriceSource for CompletionClient {
    async fn fetch_approx_price(&self, symbol: &str) -> LevelResult<f64> {
        let answer = self.complete(symbol).await?;
        debug!("Model answer for {}: {:?}", symbol, answer);

        let price = price_from_answer(symbol, &answer);
        match &price {
            Ok(p) => info!("Approximate price for {}: {}", symbol, p),
            Err(e) => warn!("{}", e),
        }
        price
    }
}
