use super::{
    error::ChatError,
    types::{ChatReply, ChatRequest},
};
use crate::{
    Error, Result,
    config::InferenceConfig,
    llm::{GenerationParameters, GenerationRequest, HuggingFaceClient, InferenceClient, PromptTemplate},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Returned when the upstream answers 2xx but yields no text.
pub const EMPTY_GENERATION_REPLY: &str = "No response generated";

/// Stateless bridge between the chat widget and the inference endpoint.
pub struct ChatProxy {
    client: Arc<dyn InferenceClient>,
    template: PromptTemplate,
    parameters: GenerationParameters,
}

impl ChatProxy {
    pub fn new(
        client: Arc<dyn InferenceClient>,
        template: PromptTemplate,
        parameters: GenerationParameters,
    ) -> Self {
        Self {
            client,
            template,
            parameters,
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        info!("Initializing chat proxy for model: {}", config.model);

        let client = Arc::new(HuggingFaceClient::new(config));
        let template = PromptTemplate::from_config(&config.prompt)?;
        let parameters = GenerationParameters {
            max_new_tokens: config.max_new_tokens,
            return_full_text: config.return_full_text,
        };

        Ok(Self::new(client, template, parameters))
    }

    pub async fn reply(&self, request: &ChatRequest) -> std::result::Result<ChatReply, ChatError> {
        let message = match request.message.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            Some(_) => {
                warn!("Rejected chat request: empty message");
                return Err(ChatError::InvalidMessage("message must not be empty".to_string()));
            }
            None => {
                warn!("Rejected chat request: missing message");
                return Err(ChatError::InvalidMessage("message is required".to_string()));
            }
        };

        let generation = GenerationRequest {
            inputs: self.template.render(message),
            parameters: self.parameters,
        };

        match self.client.generate(generation).await {
            Ok(candidates) => {
                let text = candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.generated_text)
                    .map(|t| t.trim().to_string());

                match text {
                    Some(text) => {
                        debug!("Generated {} chars", text.len());
                        Ok(ChatReply::ok(text))
                    }
                    None => {
                        warn!("Upstream returned no generated text, using fallback reply");
                        Ok(ChatReply::ok(EMPTY_GENERATION_REPLY))
                    }
                }
            }
            Err(e) => {
                log_upstream_failure(&e);
                Err(ChatError::from(e))
            }
        }
    }
}

fn log_upstream_failure(e: &Error) {
    match e {
        Error::Upstream { status, body } => {
            error!(
                upstream_status = *status,
                upstream_body = %body,
                "Inference request failed: {}",
                e
            );
        }
        _ => {
            error!(
                upstream_status = ?e.upstream_status(),
                "Inference request failed: {}",
                e
            );
        }
    }
}
