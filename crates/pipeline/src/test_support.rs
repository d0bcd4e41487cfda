//! Mock providers for exercising the pipeline without a network.
//!
//! Compiled into the library rather than behind `cfg(test)` so downstream
//! crates can drive their own tests with the same mocks.

use std::sync::Mutex;

use ledgerbrief_core::error::ProviderError;
use ledgerbrief_core::message::Message;
use ledgerbrief_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue and
/// records the request for later assertions. Panics if more calls are made
/// than responses provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
    embeddings: Mutex<Vec<Vec<f32>>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            embeddings: Mutex::new(Vec::new()),
        }
    }

    /// A provider scripted with plain text responses, in call order.
    pub fn scripted(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| make_text_response(t)).collect())
    }

    /// A provider that returns a single text response.
    pub fn single_text(text: &str) -> Self {
        Self::scripted(&[text])
    }

    /// Script the vectors returned by successive `embed` calls.
    pub fn with_embeddings(self, vectors: Vec<Vec<f32>>) -> Self {
        *self.embeddings.lock().unwrap() = vectors;
        self
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every completion request received, in call order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if requests.len() >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                requests.len(),
                responses.len()
            );
        }

        let response = responses[requests.len()].clone();
        requests.push(request);
        Ok(response)
    }

    async fn embed(&self, _request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        let mut embeddings = self.embeddings.lock().unwrap();
        if embeddings.is_empty() {
            return Err(ProviderError::NotConfigured(
                "no embeddings scripted".to_string(),
            ));
        }
        let vector = embeddings.remove(0);
        Ok(EmbeddingResponse {
            embeddings: vec![vector],
            model: "mock-embed".to_string(),
            usage: None,
        })
    }
}

/// A provider that fails every call with a fixed error.
pub struct FailingProvider {
    error: ProviderError,
}

impl FailingProvider {
    pub fn new(error: ProviderError) -> Self {
        Self { error }
    }
}

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(self.error.clone())
    }

    async fn embed(&self, _request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        Err(self.error.clone())
    }
}

/// A plain text completion response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}
