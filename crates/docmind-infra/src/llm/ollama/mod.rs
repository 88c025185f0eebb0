//! Ollama provider over its native HTTP API.
//!
//! Chat goes through `/api/chat` (NDJSON when streaming) and embeddings
//! through `/api/embed`. No API key is involved.

pub mod streaming;
pub mod types;

use reqwest::{Client, Response};

use docmind_core::llm::embedder::Embedder;
use docmind_core::llm::provider::{EventStream, LlmProvider};
use docmind_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use self::streaming::{map_ndjson_stream, stop_reason};
use self::types::{
    ChatChunk, ChatMessage, ChatOptions, ChatRequest, EmbedRequest, EmbedResponse, ErrorResponse,
};

pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Turn a non-2xx response into a typed error carrying Ollama's message.
async fn status_error(response: Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    LlmError::from_status(status, message)
}

fn transport_error(err: reqwest::Error) -> LlmError {
    LlmError::Provider {
        message: err.to_string(),
    }
}

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest, stream: bool) -> ChatRequest<'a> {
        let model = if request.model.is_empty() {
            &self.model
        } else {
            &request.model
        };

        ChatRequest {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.to_string(),
                    content: &m.content,
                })
                .collect(),
            stream,
            options: ChatOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&self.build_request(request, false))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let chunk: ChatChunk = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(e.to_string()))?;
        if let Some(error) = chunk.error {
            return Err(LlmError::Provider { message: error });
        }

        Ok(CompletionResponse {
            id: uuid::Uuid::now_v7().to_string(),
            content: chunk.message.map(|m| m.content).unwrap_or_default(),
            model: chunk.model,
            stop_reason: stop_reason(chunk.done_reason.as_deref()),
            usage: Usage {
                input_tokens: chunk.prompt_eval_count.unwrap_or(0),
                output_tokens: chunk.eval_count.unwrap_or(0),
            },
        })
    }

    fn stream(&self, request: CompletionRequest) -> EventStream {
        let builder = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&self.build_request(&request, true));

        Box::pin(async_stream::try_stream! {
            let response = builder.send().await.map_err(transport_error)?;
            let response = if response.status().is_success() {
                response
            } else {
                Err(status_error(response).await)?
            };

            use futures_util::StreamExt;
            let mut inner = map_ndjson_stream(response.bytes_stream());
            while let Some(event) = inner.next().await {
                yield event?;
            }
        })
    }
}

pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(e.to_string()))?;
        Ok(parsed.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
