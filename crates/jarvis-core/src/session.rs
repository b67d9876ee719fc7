//! Chat Session Controller
//!
//! Owns the transcript and the awaiting-reply flag for one open chat screen,
//! and dispatches each user turn to the injected [`GenerationService`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ChatError, Result, ServiceError};
use crate::fallback::{FailureKind, error_reply, pick_fallback};
use crate::message::{Role, Transcript, Turn};
use crate::provider::GenerationService;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a reply is outstanding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Awaiting,
}

/// Outcome of a generation request, before it is written to the transcript
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Text produced by the service
    Generated(String),
    /// The service failed; classified when the reply is completed
    Failed(ServiceError),
}

/// An in-flight request created by [`ChatSession::begin`].
///
/// Holds everything needed to call the service so the session itself is
/// free to be read (and rendered) while the request is outstanding.
#[must_use = "a pending reply must be resolved and passed to ChatSession::complete"]
pub struct PendingReply {
    session: SessionId,
    prompt: String,
    service: Arc<dyn GenerationService>,
}

impl PendingReply {
    /// Text sent to the service
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    /// Perform the single outbound call. Never fails: errors become
    /// [`Reply::Failed`].
    pub async fn resolve(self) -> Reply {
        let info = self.service.info();
        tracing::debug!(session = %self.session, provider = %info.name, model = %info.model, "Dispatching prompt");

        match self.service.generate(&self.prompt).await {
            Ok(text) => Reply::Generated(text),
            Err(e) => {
                tracing::error!(session = %self.session, provider = %info.name, error = %e, "Generation request failed");
                Reply::Failed(e)
            }
        }
    }
}

/// One chat screen's state: transcript, draft input and busy flag
pub struct ChatSession {
    id: SessionId,
    transcript: Transcript,
    draft: String,
    awaiting: bool,
    service: Arc<dyn GenerationService>,
    rng: StdRng,
    created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a session seeded with the greeting
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self::with_rng(service, StdRng::from_entropy())
    }

    /// Create with an explicit random source for fallback selection
    pub fn with_rng(service: Arc<dyn GenerationService>, rng: StdRng) -> Self {
        let id = SessionId::new();
        tracing::info!(session = %id, provider = %service.info().name, "Chat session started");

        Self {
            id,
            transcript: Transcript::new(),
            draft: String::new(),
            awaiting: false,
            service,
            rng,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current unsent input
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting
    }

    pub fn state(&self) -> SessionState {
        if self.awaiting {
            SessionState::Awaiting
        } else {
            SessionState::Idle
        }
    }

    /// The injected generation service
    pub fn service(&self) -> Arc<dyn GenerationService> {
        Arc::clone(&self.service)
    }

    /// Replace the generation service for subsequent turns.
    ///
    /// A request already in flight keeps the service it was started with.
    pub fn set_service(&mut self, service: Arc<dyn GenerationService>) {
        tracing::info!(session = %self.id, provider = %service.info().name, model = %service.info().model, "Generation service replaced");
        self.service = service;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Title from the first user turn, or a generic one
    pub fn title(&self) -> String {
        self.transcript
            .turns()
            .iter()
            .find(|t| t.role == Role::User)
            .map_or_else(
                || "New Chat".to_string(),
                |t| {
                    let first_line = t.content.trim().lines().next().unwrap_or_default();
                    let preview: String = first_line.chars().take(40).collect();
                    if first_line.chars().count() > 40 {
                        format!("{preview}...")
                    } else {
                        preview
                    }
                },
            )
    }

    /// Start a turn: validate, append the user turn and enter `Awaiting`.
    ///
    /// Blank input is ignored (`Ok(None)`). Fails with [`ChatError::Busy`]
    /// while a previous reply is outstanding.
    pub fn begin(&mut self, text: &str) -> Result<Option<PendingReply>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if self.awaiting {
            tracing::warn!(session = %self.id, "Submit rejected while awaiting a reply");
            return Err(ChatError::Busy);
        }

        self.transcript.push(Turn::user(text));
        self.draft.clear();
        self.awaiting = true;
        tracing::debug!(session = %self.id, turns = self.transcript.len(), "User turn appended");

        Ok(Some(PendingReply {
            session: self.id.clone(),
            prompt: text.to_string(),
            service: Arc::clone(&self.service),
        }))
    }

    /// [`begin`](Self::begin) with the current draft
    pub fn begin_draft(&mut self) -> Result<Option<PendingReply>> {
        let text = self.draft.clone();
        self.begin(&text)
    }

    /// Finish a turn: append the assistant turn and return to `Idle`
    pub fn complete(&mut self, reply: Reply) -> Result<&Turn> {
        if !self.awaiting {
            return Err(ChatError::NotAwaiting);
        }

        let content = match reply {
            Reply::Generated(text) => text,
            Reply::Failed(err) => match FailureKind::classify(&err) {
                FailureKind::Unavailable => {
                    tracing::warn!(session = %self.id, error = %err, "Service unavailable, using fallback reply");
                    pick_fallback(&mut self.rng).to_string()
                }
                FailureKind::Other => error_reply(&err.to_string()),
            },
        };

        self.transcript.push(Turn::assistant(content));
        self.awaiting = false;

        Ok(self.transcript.last())
    }

    /// Submit text and wait for the reply.
    ///
    /// Returns the appended assistant turn, or `None` for blank input.
    pub async fn submit(&mut self, text: &str) -> Result<Option<&Turn>> {
        let Some(pending) = self.begin(text)? else {
            return Ok(None);
        };
        let reply = pending.resolve().await;
        self.complete(reply).map(Some)
    }

    /// [`submit`](Self::submit) with the current draft
    pub async fn submit_draft(&mut self) -> Result<Option<&Turn>> {
        let text = self.draft.clone();
        self.submit(&text).await
    }
}
