use crate::{Error, Result, config::PromptConfig};

const MESSAGE_SLOT: &str = "{message}";
const SYSTEM_SLOT: &str = "{system}";

/// Single-turn instruction template: system preamble, user message, open
/// assistant turn. The message is inserted verbatim, delimiters included.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    prefix: String,
    suffix: String,
}

impl PromptTemplate {
    pub fn new(template: &str, system: &str) -> Result<Self> {
        let (prefix, suffix) = template
            .split_once(MESSAGE_SLOT)
            .ok_or_else(|| Error::config("prompt template is missing {message}"))?;
        if suffix.contains(MESSAGE_SLOT) {
            return Err(Error::config("prompt template has more than one {message}"));
        }

        // The system preamble is substituted once, up front, so a user message
        // containing "{system}" is never expanded.
        Ok(Self {
            prefix: prefix.replace(SYSTEM_SLOT, system),
            suffix: suffix.replace(SYSTEM_SLOT, system),
        })
    }

    pub fn from_config(config: &PromptConfig) -> Result<Self> {
        Self::new(&config.template, &config.system)
    }

    pub fn render(&self, message: &str) -> String {
        let mut prompt =
            String::with_capacity(self.prefix.len() + message.len() + self.suffix.len());
        prompt.push_str(&self.prefix);
        prompt.push_str(message);
        prompt.push_str(&self.suffix);
        prompt
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            prefix: "<|system|>You are a helpful assistant.<|user|>".to_string(),
            suffix: "<|assistant|>".to_string(),
        }
    }
}
