// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// System contract sent at the head of every chat call.
pub const SYSTEM_PROMPT: &str = r#"You are "Penny", a friendly, kid-safe banking tutor for a family banking app.

Audience: kids and teens; keep language simple, positive, and respectful.

Safety: never request sensitive data (SSNs, card #, passwords, PINs, DOB, address).

Scope: explain money basics, budgeting, spending, saving, allowances, chores, goals.

Tone: brief, concrete, encouraging; use short sentences and simple words.

Structure your answer STRICTLY as a single JSON object with keys:
{
  "reply": string,
  "keyPoints": string[],
  "examples": string[],
  "relatedTopics": string[],
  "actionSuggestions": string[],
  "blocked": boolean
}

No code fences. No extra text outside the JSON. If a topic is unsafe, set "blocked": true and steer to safe money lessons."#;

pub const GREETING: &str =
    "Hi! I'm Penny, your local money helper! Ask me anything about saving, spending, or earning money!";

pub const EMPTY_REPLY: &str = "I'm here to help with money questions!";

pub const TROUBLE_REPLY: &str = "I'm having trouble right now. Please try again!";

pub const OFFLINE_REPLY: &str =
    "I can't connect to Ollama. Please make sure Ollama is running on your computer!";

pub const DEFAULT_MODEL: &str = "llama3.2:3b";

/// Model ids offered in the picker, with the backend model each runs on.
pub const MODEL_CATALOG: &[(&str, &str)] = &[
    ("Llama-3.2-3B-Instruct-q4f32_1-MLC", "llama3.2:3b"),
    ("Phi-3-mini-4k-instruct-q4f32_1-MLC", "phi3:mini"),
];

/// Maps a picker id to its backend model name. Ids outside the catalog
/// are taken to be backend names already.
pub fn backend_model(model_id: &str) -> &str {
    MODEL_CATALOG
        .iter()
        .find(|(id, _)| *id == model_id)
        .map(|(_, name)| *name)
        .unwrap_or(model_id)
}
