use async_trait::async_trait;
use portfolio_api::{
    Error, Result,
    llm::{GeneratedText, GenerationRequest, InferenceClient},
};
use std::sync::{Arc, Mutex};

/// Scripted outcome for one call to the mock inference client
#[derive(Debug, Clone)]
pub enum MockReply {
    Candidates(Vec<GeneratedText>),
    Status(u16, String),
    Failure(String),
}

/// Mock inference client for testing
#[derive(Debug)]
pub struct MockInferenceClient {
    pub replies: Arc<Mutex<Vec<MockReply>>>,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_replies(self, replies: Vec<MockReply>) -> Self {
        *self.replies.lock().unwrap() = replies;
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_replies(vec![MockReply::Candidates(vec![GeneratedText::new(text)])])
    }

    pub fn with_status(self, status: u16, body: &str) -> Self {
        self.with_replies(vec![MockReply::Status(status, body.to_string())])
    }

    pub fn add_reply(&self, reply: MockReply) {
        self.replies.lock().unwrap().push(reply);
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<GeneratedText>> {
        self.requests.lock().unwrap().push(request);

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(Error::inference("No more mock replies available"));
        }

        match replies.remove(0) {
            MockReply::Candidates(candidates) => Ok(candidates),
            MockReply::Status(status, body) => Err(Error::Upstream { status, body }),
            MockReply::Failure(message) => Err(Error::inference(message)),
        }
    }
}

impl Default for MockInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}
