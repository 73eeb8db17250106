use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::{LevelError, LevelResult};
use crate::quote::completion::{price_from_answer, CompletionClient, CompletionResponse};
use crate::quote::{build_price_prompt, extract_price, PriceSource, StaticPriceSource};

/// Records every symbol it is asked about.
pub struct RecordingSource {
    pub price: f64,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl PriceSource for RecordingSource {
    async fn fetch_approx_price(&self, symbol: &str) -> LevelResult<f64> {
        self.calls.lock().unwrap().push(symbol.to_string());
        Ok(self.price)
    }
}

#[test]
fn test_extract_price_plain_and_formatted() {
    assert_eq!(extract_price("50000"), Some(50000.0));
    assert_eq!(extract_price("  64123.57\n"), Some(64123.57));
    assert_eq!(extract_price("$50,123.45"), Some(50123.45));
    assert_eq!(extract_price("Price: 1.2.3"), Some(1.2));
    assert_eq!(extract_price(".5"), Some(0.5));
}

#[test]
fn test_extract_price_rejects_unusable_text() {
    assert_eq!(extract_price(""), None);
    assert_eq!(extract_price("I don't know"), None);
    assert_eq!(extract_price("..."), None);
    assert_eq!(extract_price("0"), None);
    assert_eq!(extract_price("0.000"), None);
}

#[test]
fn test_extract_price_drops_sign() {
    // '-' is stripped along with everything else that isn't a digit or '.'
    assert_eq!(extract_price("-42"), Some(42.0));
}

#[test]
fn test_price_prompt_names_symbol() {
    let prompt = build_price_prompt(" btcusd ");
    assert!(prompt.contains("BTCUSD"));
    assert!(prompt.contains("only the number"));
}

#[test]
fn test_price_from_answer_maps_failure() {
    assert_eq!(price_from_answer("ETH", "about 3000").unwrap(), 3000.0);
    match price_from_answer("ETH", "no idea") {
        Err(LevelError::QuoteUnavailable { symbol, .. }) => assert_eq!(symbol, "ETH"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_completion_response_parsing() {
    let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"50123.4"}}]}"#;
    let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.first_content(), Some("50123.4"));

    let empty: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
    assert_eq!(empty.first_content(), None);
}

#[test]
fn test_completion_request_body() {
    let mut cfg = AppConfig::default().quote;
    cfg.api_key = "k".to_string();
    cfg.base_url = "https://api.example.com/".to_string();

    let client = CompletionClient::new(&cfg).unwrap();
    assert_eq!(client.endpoint, "https://api.example.com/chat/completions");

    let body = serde_json::to_value(client.build_request("sol")).unwrap();
    assert_eq!(body["model"], "sonar");
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"].as_str().unwrap().contains("SOL"));
    assert!(body.get("disable_search").is_none());

    cfg.web_search = false;
    let client = CompletionClient::new(&cfg).unwrap();
    let body = serde_json::to_value(client.build_request("sol")).unwrap();
    assert_eq!(body["disable_search"], true);
}

#[tokio::test]
async fn test_static_source() {
    let ok = StaticPriceSource::price(100.0);
    assert_eq!(ok.fetch_approx_price("ANY").await.unwrap(), 100.0);

    let failing = StaticPriceSource::failing(LevelError::Network("down".to_string()));
    assert_eq!(
        failing.fetch_approx_price("ANY").await,
        Err(LevelError::Network("down".to_string()))
    );
}

#[test]
fn test_recording_source_sees_symbol() {
    let source = RecordingSource {
        price: 4.0,
        calls: Mutex::new(Vec::new()),
    };
    let price = tokio_test::block_on(source.fetch_approx_price("AAPL")).unwrap();
    assert_eq!(price, 4.0);
    assert_eq!(*source.calls.lock().unwrap(), vec!["AAPL".to_string()]);
}
