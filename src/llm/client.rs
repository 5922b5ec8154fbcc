use super::types::*;
use crate::{Error, Result, config::InferenceConfig};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Runs one text generation. Non-2xx replies surface as `Error::Upstream`.
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<GeneratedText>>;
}

/// Client for the Hugging Face hosted inference API (`POST /models/{model}`).
pub struct HuggingFaceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HuggingFaceClient {
    pub fn new(config: &InferenceConfig) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    pub fn with_http(config: &InferenceConfig, http: reqwest::Client) -> Self {
        let base = config.base_url.trim_end_matches('/');
        let model = config.model.trim_matches('/');

        Self {
            http,
            endpoint: format!("{base}/models/{model}"),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // An empty key is sent without auth; the upstream rejects it and the
        // failure takes the generic error path.
        if !self.api_key.is_empty() {
            let value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| Error::config(format!("Invalid API key header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<GeneratedText>> {
        debug!(
            "Sending generation request to {} ({} prompt chars)",
            self.endpoint,
            request.inputs.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let candidates: Vec<GeneratedText> = serde_json::from_slice(&bytes).map_err(|e| {
            Error::inference(format!(
                "Unexpected response body: {e}: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })?;

        debug!("Received {} generation candidates", candidates.len());
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PromptConfig;
    use pretty_assertions::assert_eq;

    fn create_test_config() -> InferenceConfig {
        InferenceConfig {
            base_url: "https://api-inference.huggingface.co/".to_string(),
            api_key: "hf_test".to_string(),
            model: "mistralai/Mixtral-8x7B-Instruct-v0.1".to_string(),
            max_new_tokens: 150,
            return_full_text: false,
            prompt: PromptConfig::default(),
        }
    }

    #[test]
    fn test_endpoint_joins_base_and_model() {
        let client = HuggingFaceClient::new(&create_test_config());
        assert_eq!(
            client.endpoint(),
            "https://api-inference.huggingface.co/models/mistralai/Mixtral-8x7B-Instruct-v0.1"
        );
    }

    #[test]
    fn test_headers_with_key() {
        let client = HuggingFaceClient::new(&create_test_config());
        let headers = client.headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer hf_test");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_headers_without_key() {
        let mut config = create_test_config();
        config.api_key = String::new();
        let client = HuggingFaceClient::new(&config);
        assert!(client.headers().unwrap().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        let mut config = create_test_config();
        config.api_key = "bad\nkey".to_string();
        let client = HuggingFaceClient::new(&config);
        assert!(matches!(client.headers(), Err(Error::Config(_))));
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerationRequest {
            inputs: "<|user|>hi<|assistant|>".to_string(),
            parameters: GenerationParameters::default(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "inputs": "<|user|>hi<|assistant|>",
                "parameters": { "max_new_tokens": 150, "return_full_text": false }
            })
        );
    }

    #[test]
    fn test_candidate_without_text_deserializes() {
        let candidates: Vec<GeneratedText> =
            serde_json::from_str(r#"[{"score": 0.3}, {"generated_text": "x"}]"#).unwrap();
        assert_eq!(candidates[0].generated_text, None);
        assert_eq!(candidates[1].generated_text.as_deref(), Some("x"));
    }
}
