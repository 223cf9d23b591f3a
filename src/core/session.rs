//! Conversation session manager.
//!
//! One manager owns at most one live [`ConversationSession`] and the
//! [`Transcript`] that belongs to it. States:
//!
//! - `Empty`: nothing selected yet.
//! - `Active(persona)`: a session exists and accepts sends.
//! - `Error(reason)`: model resolution failed; terminal for this manager.
//!
//! Selecting a different persona discards the session and transcript in
//! full before the new session is created. Reselecting the active persona
//! does nothing.

use crate::api::ApiError;
use crate::core::message::{Role, Turn};
use crate::core::persona::{Persona, PersonaId, PersonaRegistry};
use crate::core::provider::{ChatProvider, GenerateRequest};
use crate::core::resolver::{ModelId, ModelResolver, ResolveError};
use crate::core::transcript::Transcript;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Active(PersonaId),
    Error(String),
}

#[derive(Debug)]
pub enum SessionError {
    /// Model resolution failed; the manager is now in the error state.
    NoModelAvailable(ResolveError),
    /// The manager is in the error state and refuses further work.
    Terminal { reason: String },
    /// `send` was called before any persona was selected.
    NoActiveSession,
    /// The message was empty or whitespace.
    EmptyMessage,
    /// One round trip failed. The session stays usable.
    TransientSend(ApiError),
}

impl SessionError {
    /// True when the user can keep chatting after seeing this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::TransientSend(_) | SessionError::EmptyMessage | SessionError::NoActiveSession
        )
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoModelAvailable(err) => write!(f, "{err}"),
            SessionError::Terminal { reason } => {
                write!(f, "session unavailable until restart: {reason}")
            }
            SessionError::NoActiveSession => write!(f, "no persona selected"),
            SessionError::EmptyMessage => write!(f, "message is empty"),
            SessionError::TransientSend(err) => write!(f, "응답 오류: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::NoModelAvailable(err) => Some(err),
            SessionError::TransientSend(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// First session for this manager.
    Created,
    /// A session for another persona was discarded first.
    Replaced { previous: PersonaId },
    /// The persona was already active.
    Unchanged,
}

/// The model context tied to one persona. History holds only completed
/// exchanges and is replayed on every call.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: u64,
    persona_id: PersonaId,
    model: ModelId,
    system_prompt: String,
    history: Vec<Turn>,
    created_at: DateTime<Utc>,
}

impl ConversationSession {
    fn new(id: u64, persona: &Persona, model: ModelId) -> Self {
        Self {
            id,
            persona_id: persona.id,
            model,
            system_prompt: persona.system_prompt.clone(),
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn persona_id(&self) -> PersonaId {
        self.persona_id
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

pub struct SessionManager {
    resolver: Arc<ModelResolver>,
    provider: Arc<dyn ChatProvider>,
    personas: Arc<PersonaRegistry>,
    state: SessionState,
    session: Option<ConversationSession>,
    transcript: Transcript,
    sessions_created: u64,
}

impl SessionManager {
    pub fn new(
        resolver: Arc<ModelResolver>,
        provider: Arc<dyn ChatProvider>,
        personas: Arc<PersonaRegistry>,
    ) -> Self {
        Self {
            resolver,
            provider,
            personas,
            state: SessionState::Empty,
            session: None,
            transcript: Transcript::new(),
            sessions_created: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&ConversationSession> {
        self.session.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }

    pub fn active_persona(&self) -> Option<&Persona> {
        match self.state {
            SessionState::Active(id) => Some(self.personas.get_persona(id)),
            _ => None,
        }
    }

    /// Make `id` the active persona, creating or replacing the session as needed.
    pub async fn select(&mut self, id: PersonaId) -> Result<SelectOutcome, SessionError> {
        let previous = match &self.state {
            SessionState::Error(reason) => {
                return Err(SessionError::Terminal {
                    reason: reason.clone(),
                })
            }
            SessionState::Active(current) if *current == id => {
                debug!(persona = %id, "persona reselected, keeping session");
                return Ok(SelectOutcome::Unchanged);
            }
            SessionState::Active(current) => Some(*current),
            SessionState::Empty => None,
        };

        if let Some(previous) = previous {
            info!(from = %previous, to = %id, "persona changed, discarding session");
        }
        self.session = None;
        self.transcript.clear();
        self.state = SessionState::Empty;

        let model = match self.resolver.resolve_model().await {
            Ok(model) => model,
            Err(err) => {
                warn!(error = %err, "model resolution failed, session disabled");
                self.state = SessionState::Error(err.to_string());
                return Err(SessionError::NoModelAvailable(err));
            }
        };

        self.sessions_created += 1;
        let persona = self.personas.get_persona(id);
        let session = ConversationSession::new(self.sessions_created, persona, model);
        info!(
            persona = %id,
            model = %session.model,
            session = session.id,
            "conversation session created"
        );
        self.transcript.push_assistant(persona.greeting.clone());
        self.session = Some(session);
        self.state = SessionState::Active(id);

        Ok(match previous {
            Some(previous) => SelectOutcome::Replaced { previous },
            None => SelectOutcome::Created,
        })
    }

    /// Forward one user message. On success the transcript gains the user
    /// turn and the reply; on a failed round trip only the user turn stays.
    pub async fn send(&mut self, text: &str) -> Result<String, SessionError> {
        if let SessionState::Error(reason) = &self.state {
            return Err(SessionError::Terminal {
                reason: reason.clone(),
            });
        }
        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::NoActiveSession);
        };
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let user_seq = self.transcript.push_user(text);
        let result = self
            .provider
            .generate(&GenerateRequest {
                model: session.model.as_str(),
                system_prompt: &session.system_prompt,
                history: &session.history,
                text,
            })
            .await;

        let result = result.and_then(|reply| {
            if reply.trim().is_empty() {
                Err(ApiError::EmptyResponse { reason: None })
            } else {
                Ok(reply)
            }
        });

        match result {
            Ok(reply) => {
                let reply_seq = self.transcript.push_assistant(reply.clone());
                session.history.push(Turn {
                    role: Role::User,
                    content: text.to_string(),
                    seq: user_seq,
                });
                session.history.push(Turn {
                    role: Role::Assistant,
                    content: reply.clone(),
                    seq: reply_seq,
                });
                debug!(
                    session = session.id,
                    history = session.history.len(),
                    "reply received"
                );
                Ok(reply)
            }
            Err(err) => {
                warn!(session = session.id, error = %err, "send failed");
                Err(SessionError::TransientSend(err))
            }
        }
    }
}
