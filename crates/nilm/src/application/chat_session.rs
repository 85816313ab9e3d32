//! Chat Session (Use Case)
//!
//! One user's conversation with the energy assistant. A send is a
//! two-phase append: the user turn goes into the transcript immediately,
//! the assistant turn only once the reply has been generated and persisted.
//! A failed send keeps the user turn (unanswered) and reports a transient
//! notice instead.
//!
//! The session is single-flight: while a send is in progress every other
//! send is ignored, not queued. Changing the user scope wipes the
//! transcript, and replies that arrive for a previous scope are dropped.
//! A scope change does not cancel the in-flight send; the session stays
//! busy until it finishes.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    compose_prompt, summarize, ApplianceRecord, ChatError, ChatTurn, DomainError, UserScope,
};
use crate::ports::{
    ChatTranscriptStore, GenerationOptions, GenerationService, DEFAULT_HISTORY_LIMIT,
    DEFAULT_TEMPERATURE,
};

/// Session tuning
#[derive(Debug, Clone)]
pub struct ChatSessionConfig {
    /// Initial sampling temperature
    pub temperature: f32,
    /// Upper bound on a single generation call; `None` waits forever
    pub generation_timeout: Option<Duration>,
    /// Records fetched by `load_history`
    pub history_limit: i64,
}

impl Default for ChatSessionConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            generation_timeout: Some(Duration::from_secs(60)),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Where the session is in its send cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Sending,
}

/// Why a request was silently ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing but whitespace to send
    EmptyInput,
    /// Another send is still in flight
    Busy,
    /// No user owns the transcript
    NoUserScope,
    /// The user scope changed while the request was running
    ScopeChanged,
}

/// Transient, non-blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn send_failed() -> Self {
        Self {
            title: "Error".to_string(),
            description: "Failed to send message. Please try again.".to_string(),
        }
    }
}

/// Result of `send`
#[derive(Debug)]
pub enum SendOutcome {
    Skipped(SkipReason),
    Delivered {
        user_turn: ChatTurn,
        reply: ChatTurn,
    },
    /// The user turn stays in the transcript without a reply
    Failed {
        user_turn: ChatTurn,
        error: ChatError,
        notice: Notice,
    },
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

/// Result of `load_history`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// Transcript replaced; number of turns now shown
    Loaded(usize),
    Skipped(SkipReason),
}

struct SessionState {
    transcript: Vec<ChatTurn>,
    pending_input: String,
    phase: SessionPhase,
    temperature: f32,
    scope: Option<UserScope>,
    /// Bumped on every scope change; work started under an older epoch is stale
    epoch: u64,
    rows: Vec<ApplianceRecord>,
    house_id: String,
    last_turn_millis: i64,
}

impl SessionState {
    /// Millisecond timestamp, forced strictly increasing
    fn next_turn_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last_turn_millis + 1);
        self.last_turn_millis = id;
        id.to_string()
    }
}

/// Chat session bound to one generation backend and one transcript store
pub struct ChatSession<G: GenerationService + ?Sized, S: ChatTranscriptStore + ?Sized> {
    generator: Arc<G>,
    transcripts: Arc<S>,
    config: ChatSessionConfig,
    state: Mutex<SessionState>,
}

impl<G: GenerationService + ?Sized, S: ChatTranscriptStore + ?Sized> ChatSession<G, S> {
    pub fn new(generator: Arc<G>, transcripts: Arc<S>, config: ChatSessionConfig) -> Self {
        let state = SessionState {
            transcript: Vec::new(),
            pending_input: String::new(),
            phase: SessionPhase::Idle,
            temperature: config.temperature,
            scope: None,
            epoch: 0,
            rows: Vec::new(),
            house_id: "1".to_string(),
            last_turn_millis: 0,
        };

        Self {
            generator,
            transcripts,
            config,
            state: Mutex::new(state),
        }
    }

    /// Seed the rows and house used for prompt context
    pub fn with_dashboard(
        mut self,
        rows: Vec<ApplianceRecord>,
        house_id: impl Into<String>,
    ) -> Self {
        let state = self.state.get_mut();
        state.rows = rows;
        state.house_id = house_id.into();
        self
    }

    // ============================================
    // Inputs from the dashboard
    // ============================================

    /// Replace the rows and house used for the next prompt's context
    pub async fn update_dashboard(
        &self,
        rows: Vec<ApplianceRecord>,
        house_id: impl Into<String>,
    ) {
        let mut state = self.state.lock().await;
        state.rows = rows;
        state.house_id = house_id.into();
    }

    /// Switch the user that owns the transcript.
    ///
    /// Returns `true` when the scope actually changed, in which case the
    /// transcript has been cleared. An in-flight send keeps the session busy
    /// until it completes, but its reply is not shown.
    pub async fn set_user_scope(&self, scope: Option<UserScope>) -> bool {
        let mut state = self.state.lock().await;
        if state.scope == scope {
            return false;
        }

        tracing::info!(
            "Chat scope changed ({} -> {}), clearing transcript",
            state.scope.as_ref().map(UserScope::as_str).unwrap_or("none"),
            scope.as_ref().map(UserScope::as_str).unwrap_or("none"),
        );

        state.scope = scope;
        state.epoch += 1;
        state.transcript.clear();
        state.pending_input.clear();
        true
    }

    pub async fn user_scope(&self) -> Option<UserScope> {
        self.state.lock().await.scope.clone()
    }

    pub async fn set_pending_input(&self, text: impl Into<String>) {
        self.state.lock().await.pending_input = text.into();
    }

    pub async fn pending_input(&self) -> String {
        self.state.lock().await.pending_input.clone()
    }

    /// Set the sampling temperature; must lie in [0, 1]
    pub async fn set_temperature(&self, temperature: f32) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(DomainError::Validation(format!(
                "Temperature must be between 0 and 1, got {}",
                temperature
            )));
        }
        self.state.lock().await.temperature = temperature;
        Ok(())
    }

    pub async fn temperature(&self) -> f32 {
        self.state.lock().await.temperature
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase
    }

    pub async fn is_busy(&self) -> bool {
        self.phase().await == SessionPhase::Sending
    }

    /// Snapshot of the transcript, oldest first
    pub async fn transcript(&self) -> Vec<ChatTurn> {
        self.state.lock().await.transcript.clone()
    }

    // ============================================
    // Operations
    // ============================================

    /// Send whatever is currently in the input box
    pub async fn submit(&self) -> SendOutcome {
        let text = self.pending_input().await;
        self.send(&text).await
    }

    /// Send one message and wait for the assistant's reply
    pub async fn send(&self, text: &str) -> SendOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SendOutcome::Skipped(SkipReason::EmptyInput);
        }

        let (user_turn, scope, epoch, context, temperature) = {
            let mut state = self.state.lock().await;
            if state.phase == SessionPhase::Sending {
                tracing::debug!("Send ignored, another message is in flight");
                return SendOutcome::Skipped(SkipReason::Busy);
            }
            let Some(scope) = state.scope.clone() else {
                return SendOutcome::Skipped(SkipReason::NoUserScope);
            };

            state.phase = SessionPhase::Sending;
            state.pending_input.clear();

            let turn_id = state.next_turn_id();
            let user_turn = ChatTurn::user(turn_id, message, Utc::now());
            state.transcript.push(user_turn.clone());

            let context = summarize(&state.rows, &state.house_id);
            (user_turn, scope, state.epoch, context, state.temperature)
        };

        tracing::info!(
            "Sending chat message {} for {} ({} chars of context)",
            user_turn.id,
            scope,
            context.len()
        );

        let prompt = compose_prompt(&context, message);
        let result = self.exchange(&scope, message, &prompt, temperature).await;

        let mut state = self.state.lock().await;
        state.phase = SessionPhase::Idle;
        let still_current = state.epoch == epoch;

        match result {
            Ok(response) => {
                let reply = ChatTurn::assistant(&user_turn.id, response, Utc::now());
                if still_current {
                    state.transcript.push(reply.clone());
                } else {
                    tracing::info!(
                        "Reply to {} arrived after the scope changed, not shown",
                        user_turn.id
                    );
                }
                SendOutcome::Delivered { user_turn, reply }
            }
            Err(error) => {
                tracing::error!("Error sending message {}: {}", user_turn.id, error);
                SendOutcome::Failed {
                    user_turn,
                    error,
                    notice: Notice::send_failed(),
                }
            }
        }
    }

    /// Rebuild the transcript from the store.
    ///
    /// Replaces whatever is shown. Ignored while a send is in flight so the
    /// optimistic user turn is not wiped. A read failure is logged and the
    /// transcript left untouched.
    pub async fn load_history(&self) -> Result<HistoryOutcome, ChatError> {
        let (scope, epoch) = {
            let state = self.state.lock().await;
            if state.phase == SessionPhase::Sending {
                return Ok(HistoryOutcome::Skipped(SkipReason::Busy));
            }
            match state.scope.clone() {
                Some(scope) => (scope, state.epoch),
                None => return Ok(HistoryOutcome::Skipped(SkipReason::NoUserScope)),
            }
        };

        let records = match self.transcripts.list(&scope, self.config.history_limit).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Error loading chat history for {}: {}", scope, e);
                return Err(ChatError::HistoryLoad(e));
            }
        };

        let turns: Vec<ChatTurn> = records.iter().flat_map(|r| r.to_turns()).collect();

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            tracing::info!("History for {} arrived after the scope changed, discarded", scope);
            return Ok(HistoryOutcome::Skipped(SkipReason::ScopeChanged));
        }
        if state.phase == SessionPhase::Sending {
            return Ok(HistoryOutcome::Skipped(SkipReason::Busy));
        }

        state.transcript = turns;
        Ok(HistoryOutcome::Loaded(state.transcript.len()))
    }

    /// Generate, then persist. Either failure aborts the exchange.
    async fn exchange(
        &self,
        scope: &UserScope,
        message: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, ChatError> {
        let options = GenerationOptions::with_temperature(temperature);
        let generation = self.generator.generate(prompt, &options);

        let response = match self.config.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, generation).await.map_err(|_| {
                ChatError::UpstreamGeneration(DomainError::ExternalService(format!(
                    "{} did not answer within {:?}",
                    self.generator.provider_name(),
                    limit
                )))
            })?,
            None => generation.await,
        }
        .map_err(ChatError::UpstreamGeneration)?;

        if response.trim().is_empty() {
            return Err(ChatError::UpstreamGeneration(DomainError::ExternalService(
                "Empty response from generation service".to_string(),
            )));
        }

        self.transcripts
            .append(scope, message, &response)
            .await
            .map_err(ChatError::Persistence)?;

        Ok(response)
    }
}
