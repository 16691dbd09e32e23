// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Penny, the local money tutor.

pub mod backend;
pub mod parser;
pub mod prompt;
pub mod session;

pub use backend::{ChatBackend, ChatOptions, ChatRequest, OllamaBackend, WireMessage};
pub use parser::parse_reply;
pub use session::{CancelToken, IgnoreReason, SendOutcome, SessionState, TutorSession};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One transcript entry. Assistant entries hold a serialized
/// [`TutorReply`]; user entries hold the text exactly as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            content: text.to_string(),
        }
    }

    pub fn assistant(reply: &TutorReply) -> Self {
        Self {
            role: Role::Assistant,
            content: serde_json::to_string(reply).unwrap_or_else(|_| reply.reply.clone()),
        }
    }

    /// Structured view of an assistant entry.
    pub fn reply(&self) -> Option<TutorReply> {
        match self.role {
            Role::Assistant => Some(parse_reply(&self.content)),
            _ => None,
        }
    }
}

/// The structured answer every model reply is coerced into.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorReply {
    pub reply: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
    #[serde(default)]
    pub action_suggestions: Vec<String>,
    #[serde(default)]
    pub blocked: bool,
}

impl TutorReply {
    /// A reply with text only.
    pub fn plain(text: &str) -> Self {
        let reply = if text.is_empty() {
            prompt::EMPTY_REPLY
        } else {
            text
        };
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }
}
