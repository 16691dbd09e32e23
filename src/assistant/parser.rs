// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns whatever the model produced into a [`TutorReply`].
//!
//! Small local models often wrap the requested JSON in prose, code
//! fences, or stop mid-object. The parser scans for balanced top-level
//! `{...}` spans (respecting string literals, so braces inside values
//! do not confuse it) and takes the first one that decodes with a string
//! `reply`. Anything else falls back to using the raw text as the reply.
//! It never fails.

use super::TutorReply;
use super::prompt::EMPTY_REPLY;
use serde_json::Value;
use tracing::warn;

pub fn parse_reply(raw: &str) -> TutorReply {
    for span in object_spans(raw) {
        match serde_json::from_str::<Value>(span) {
            Ok(value) => {
                if let Some(reply) = from_value(&value) {
                    return reply;
                }
            }
            Err(err) => warn!(error = %err, "model reply span is not valid JSON"),
        }
    }
    TutorReply::plain(raw.trim())
}

fn from_value(value: &Value) -> Option<TutorReply> {
    let obj = value.as_object()?;
    let reply = obj.get("reply")?.as_str()?;
    let list = |key: &str| -> Vec<String> {
        obj.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };
    Some(TutorReply {
        reply: if reply.is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply.to_string()
        },
        key_points: list("keyPoints"),
        examples: list("examples"),
        related_topics: list("relatedTopics"),
        action_suggestions: list("actionSuggestions"),
        blocked: obj.get("blocked").and_then(Value::as_bool) == Some(true),
    })
}

/// Balanced top-level `{...}` spans, in order of appearance. An
/// unterminated trailing object yields nothing.
pub fn object_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    spans
}
