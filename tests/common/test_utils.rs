use super::MockInferenceClient;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use portfolio_api::{
    chat::ChatProxy,
    config::{Config, InferenceConfig, LogsConfig, PromptConfig, ServerConfig},
    feedback::FeedbackStorage,
    llm::{GenerationParameters, PromptTemplate},
    server::{self, handlers::AppState},
};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";

/// Create a test configuration pointing at `base_url`
pub fn create_test_config(base_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: ":memory:".to_string(),
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        inference: InferenceConfig {
            base_url: base_url.to_string(),
            api_key: "hf_test_key".to_string(),
            model: TEST_MODEL.to_string(),
            max_new_tokens: 150,
            return_full_text: false,
            prompt: PromptConfig::default(),
        },
    }
}

/// Proxy wired to a mock client with the default template and parameters
pub fn create_test_proxy(mock: Arc<MockInferenceClient>) -> ChatProxy {
    ChatProxy::new(
        mock,
        PromptTemplate::default(),
        GenerationParameters::default(),
    )
}

/// Full router backed by in-memory feedback storage
pub async fn create_test_app(proxy: ChatProxy) -> Router {
    let feedback = FeedbackStorage::new(":memory:").await.unwrap();
    server::router(AppState {
        proxy: Arc::new(proxy),
        feedback: Arc::new(feedback),
    })
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
