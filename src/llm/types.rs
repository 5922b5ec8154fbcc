use serde::{Deserialize, Serialize};

/// Body of a text-generation request to the inference endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub return_full_text: bool,
}

/// One candidate from the endpoint's result array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedText {
    #[serde(default)]
    pub generated_text: Option<String>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 150,
            return_full_text: false,
        }
    }
}

impl GeneratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            generated_text: Some(text.into()),
        }
    }
}
