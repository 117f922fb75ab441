use std::time::Duration;

use log::{debug, error};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{ApiKey, Subject, TextGenerator};
use crate::config::LlmConfig;
use crate::error::DescribeError;

const SYSTEM_PROMPT: &str =
    "You are an aviation reference assistant. Answer in a few short paragraphs of plain text.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }
}

impl TextGenerator for OpenAiClient {
    fn generate(&self, subject: &Subject, key: &ApiKey) -> Result<String, DescribeError> {
        let prompt = subject.prompt();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        debug!("POST {} for {subject} (model={})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key.expose())
            .json(&request)
            .send()?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(DescribeError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(DescribeError::Unauthenticated)
            }
            status if !status.is_success() => {
                let body = response.text().unwrap_or_default();
                error!("Text generation for {subject} failed with {status}: {body}");
                return Err(DescribeError::Collaborator(format!("HTTP {status}")));
            }
            _ => {}
        }

        let body: ChatResponse = response.json()?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| DescribeError::Collaborator("response contained no text".to_string()))
    }
}
