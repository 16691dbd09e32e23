// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Role;
use crate::error::AssistantError;
use crate::utils::http_client;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
    pub options: ChatOptions,
}

/// A local inference service that can list its models and answer a
/// non-streaming chat call.
pub trait ChatBackend: Send + Sync {
    /// Name shown to people when the service cannot be reached.
    fn name(&self) -> &str;

    fn list_models(&self, timeout: Duration) -> Result<Vec<String>, AssistantError>;

    /// Returns the raw text content of the assistant message.
    fn chat(&self, request: &ChatRequest, timeout: Duration) -> Result<String, AssistantError>;
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

pub struct OllamaBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> AssistantError {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            AssistantError::Connectivity {
                backend: self.name().to_string(),
                reason: err.to_string(),
            }
        } else {
            AssistantError::Decode {
                backend: self.name().to_string(),
                reason: err.to_string(),
            }
        }
    }

    fn check_status(
        &self,
        resp: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, AssistantError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        Err(AssistantError::Backend {
            backend: self.name().to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

impl ChatBackend for OllamaBackend {
    fn name(&self) -> &str {
        "Ollama"
    }

    fn list_models(&self, timeout: Duration) -> Result<Vec<String>, AssistantError> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .map_err(|e| self.transport_error(e))?;
        let tags: TagsResponse = self
            .check_status(resp)?
            .json()
            .map_err(|e| self.transport_error(e))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    fn chat(&self, request: &ChatRequest, timeout: Duration) -> Result<String, AssistantError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(model = %request.model, messages = request.messages.len(), "chat request");
        let resp = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(request)
            .send()
            .map_err(|e| self.transport_error(e))?;
        let body: ChatResponse = self
            .check_status(resp)?
            .json()
            .map_err(|e| self.transport_error(e))?;
        Ok(body.message.map(|m| m.content).unwrap_or_default())
    }
}
