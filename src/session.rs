use crate::brain::Brain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Prefix of the assistant-slot notice appended when the chat backend
/// fails. The user's own message is never rolled back.
pub const ERROR_NOTICE_PREFIX: &str = "[error]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The research-lab transcript: append-only, scoped to one interactive
/// session, mutated only through [`ResearchSession::submit`]. There is no
/// clear operation; the transcript dies with the session.
#[derive(Debug, Default)]
pub struct ResearchSession {
    transcript: Vec<ChatMessage>,
}

impl ResearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Submit one user message. The transcript is rendered through
    /// `observe` immediately after the user append, so the message is
    /// visible before a reply arrives, and again after the assistant
    /// append. A user message and its reply are always adjacent, in that
    /// order; one submission is in flight at a time. Blank input is a
    /// no-op.
    pub async fn submit<B, F>(&mut self, brain: &B, prompt: &str, mut observe: F)
    where
        B: Brain,
        F: FnMut(&[ChatMessage]),
    {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return;
        }

        self.push(Role::User, prompt.to_string());
        observe(&self.transcript);

        // TODO: forward the transcript once the chat endpoint accepts
        // history; today each call carries only the latest prompt.
        let reply = match brain.chat(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "chat backend failure");
                format!("{ERROR_NOTICE_PREFIX} research agent unavailable: {e}")
            }
        };

        self.push(Role::Assistant, reply);
        observe(&self.transcript);
    }

    fn push(&mut self, role: Role, content: String) {
        self.transcript.push(ChatMessage {
            role,
            content,
            timestamp: Utc::now(),
        });
    }
}
