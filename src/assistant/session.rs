// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Conversation lifecycle with the local tutor backend.
//!
//! States: `Uninitialized -> Probing -> Ready -> (Sending -> Ready)*`,
//! `Probing -> Failed` when the backend is unreachable (the next send
//! probes again), and `Disposed` once the session is shut down.
//!
//! At most one request is in flight. A send issued while another is
//! running is dropped, not queued.

use super::backend::{ChatBackend, ChatRequest, WireMessage};
use super::parser::parse_reply;
use super::prompt::{GREETING, OFFLINE_REPLY, SYSTEM_PROMPT, TROUBLE_REPLY, backend_model};
use super::{ChatMessage, Role, TutorReply};
use crate::config::AssistantConfig;
use crate::db::{DurableStore, keys, read_doc, write_doc};
use crate::error::AssistantError;
use crate::sanitizer::sanitize_input;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Probing,
    Ready,
    Sending,
    Failed,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Empty,
    Busy,
    Initializing,
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend answered; the parsed reply was appended.
    Replied(TutorReply),
    /// The backend failed for a reason other than connectivity; a
    /// generic apology was appended instead.
    Fallback(TutorReply),
    /// The caller cancelled; the user turn and any answer were discarded.
    Cancelled,
    Ignored(IgnoreReason),
}

/// Shared flag a caller flips to abandon an in-flight request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Inner {
    state: SessionState,
    transcript: Vec<ChatMessage>,
    model_id: String,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct TutorSession<B: ChatBackend> {
    backend: B,
    store: Arc<dyn DurableStore>,
    config: AssistantConfig,
    inner: Mutex<Inner>,
    busy: AtomicBool,
}

fn greeting() -> Vec<ChatMessage> {
    vec![ChatMessage::assistant(&TutorReply::plain(GREETING))]
}

impl<B: ChatBackend> TutorSession<B> {
    /// Starts a session with the stored model preference, falling back
    /// to the configured default.
    pub fn new(backend: B, store: Arc<dyn DurableStore>, config: AssistantConfig) -> Self {
        let model_id = read_doc::<String>(store.as_ref(), keys::ASSISTANT_MODEL)
            .unwrap_or_else(|| config.default_model.clone());
        Self {
            backend,
            store,
            config,
            inner: Mutex::new(Inner {
                state: SessionState::Uninitialized,
                transcript: greeting(),
                model_id,
            }),
            busy: AtomicBool::new(false),
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SessionState) {
        self.inner().state = state;
    }

    pub fn state(&self) -> SessionState {
        self.inner().state
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner().transcript.clone()
    }

    pub fn model_id(&self) -> String {
        self.inner().model_id.clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn probe(&self) -> Result<Vec<String>, AssistantError> {
        self.backend
            .list_models(self.config.probe_timeout())
            .map_err(|err| match err {
                AssistantError::Connectivity { .. } => err,
                other => AssistantError::Connectivity {
                    backend: self.backend.name().to_string(),
                    reason: other.to_string(),
                },
            })
    }

    pub fn initialize(&self) -> Result<(), AssistantError> {
        if self.state() == SessionState::Disposed {
            return Ok(());
        }
        self.set_state(SessionState::Probing);
        match self.probe() {
            Ok(models) => {
                info!(backend = self.backend.name(), models = models.len(), "assistant ready");
                self.set_state(SessionState::Ready);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "assistant probe failed");
                self.set_state(SessionState::Failed);
                Err(err)
            }
        }
    }

    pub fn available_models(&self) -> Vec<String> {
        match self.backend.list_models(self.config.probe_timeout()) {
            Ok(models) => models,
            Err(err) => {
                warn!(error = %err, "could not list models");
                Vec::new()
            }
        }
    }

    pub fn send_message(
        &self,
        text: &str,
        cancel: &CancelToken,
    ) -> Result<SendOutcome, AssistantError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored(IgnoreReason::Empty));
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("send dropped, request already in flight");
            return Ok(SendOutcome::Ignored(IgnoreReason::Busy));
        }
        let _busy = BusyGuard(&self.busy);

        let (needs_probe, history, model_id, turn) = {
            let mut inner = self.inner();
            match inner.state {
                SessionState::Probing => return Ok(SendOutcome::Ignored(IgnoreReason::Initializing)),
                SessionState::Disposed => return Ok(SendOutcome::Ignored(IgnoreReason::Disposed)),
                _ => {}
            }
            let skip = inner
                .transcript
                .len()
                .saturating_sub(self.config.history_window);
            let history = inner.transcript[skip..].to_vec();
            let turn = inner.transcript.len();
            inner.transcript.push(ChatMessage::user(text));
            let needs_probe = matches!(
                inner.state,
                SessionState::Uninitialized | SessionState::Failed
            );
            inner.state = if needs_probe {
                SessionState::Probing
            } else {
                SessionState::Sending
            };
            (needs_probe, history, inner.model_id.clone(), turn)
        };

        if needs_probe {
            if let Err(err) = self.probe() {
                return Err(self.go_offline(err));
            }
            self.set_state(SessionState::Sending);
        }
        if cancel.is_cancelled() {
            self.retract(turn, text);
            return Ok(SendOutcome::Cancelled);
        }

        let request = self.build_request(&model_id, &history, text);
        let result = self.backend.chat(&request, self.config.chat_timeout());

        if cancel.is_cancelled() {
            debug!("discarding reply of cancelled request");
            self.retract(turn, text);
            return Ok(SendOutcome::Cancelled);
        }

        match result {
            Ok(raw) => {
                let reply = parse_reply(&raw);
                self.finish(&reply);
                Ok(SendOutcome::Replied(reply))
            }
            Err(err) if err.is_connectivity() => Err(self.go_offline(err)),
            Err(err) => {
                warn!(error = %err, "chat call failed");
                let reply = TutorReply::plain(TROUBLE_REPLY);
                self.finish(&reply);
                Ok(SendOutcome::Fallback(reply))
            }
        }
    }

    /// System contract, then the recent history, then the new message.
    /// User text is scrubbed here; the transcript keeps what was typed.
    fn build_request(&self, model_id: &str, history: &[ChatMessage], text: &str) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage {
            role: Role::System,
            content: SYSTEM_PROMPT.to_string(),
        });
        let turns = history
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .chain(std::iter::once((Role::User, text)));
        for (role, content) in turns {
            let content = match role {
                Role::User => {
                    let clean = sanitize_input(content);
                    if clean != content {
                        debug!("redacted sensitive digits from outbound message");
                    }
                    clean
                }
                _ => content.to_string(),
            };
            messages.push(WireMessage { role, content });
        }
        ChatRequest {
            model: backend_model(model_id).to_string(),
            messages,
            stream: false,
            options: self.config.options(),
        }
    }

    fn finish(&self, reply: &TutorReply) {
        let mut inner = self.inner();
        inner.transcript.push(ChatMessage::assistant(reply));
        inner.state = SessionState::Ready;
    }

    /// Removes the user turn a cancelled send appended, unless the
    /// transcript was cleared in the meantime.
    fn retract(&self, turn: usize, text: &str) {
        let mut inner = self.inner();
        if matches!(inner.transcript.get(turn), Some(m) if m.role == Role::User && m.content == text) {
            inner.transcript.remove(turn);
        }
        inner.state = SessionState::Ready;
    }

    fn go_offline(&self, err: AssistantError) -> AssistantError {
        warn!(error = %err, "assistant unreachable");
        let mut inner = self.inner();
        inner
            .transcript
            .push(ChatMessage::assistant(&TutorReply::plain(OFFLINE_REPLY)));
        inner.state = SessionState::Failed;
        err
    }

    pub fn clear_messages(&self) {
        self.inner().transcript = greeting();
    }

    /// Switches model after confirming the backend is reachable, and
    /// remembers the choice. Returns `Ok(false)` when a request is in
    /// flight and nothing was changed.
    pub fn set_model(&self, model_id: &str) -> Result<bool, AssistantError> {
        let model_id = model_id.trim();
        if self.model_id() == model_id {
            return Ok(true);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(false);
        }
        let _busy = BusyGuard(&self.busy);

        self.set_state(SessionState::Probing);
        if let Err(err) = self.probe() {
            warn!(error = %err, model_id, "model switch aborted");
            self.set_state(SessionState::Failed);
            return Err(err);
        }
        {
            let mut inner = self.inner();
            inner.model_id = model_id.to_string();
            inner.state = SessionState::Ready;
        }
        if let Err(err) = write_doc(self.store.as_ref(), keys::ASSISTANT_MODEL, &model_id) {
            error!(error = %err, "failed to persist model preference");
        }
        info!(model_id, "assistant model switched");
        Ok(true)
    }

    pub fn dispose(&self) {
        self.set_state(SessionState::Disposed);
    }
}
