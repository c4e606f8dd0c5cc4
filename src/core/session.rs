//! A conversation with the assistant: one request in flight at a time, with an
//! append-only transcript.
use crate::core::assistant::{
    AssistantProvider, ChatMessage, FALLBACK_REPLY, GREETING_TRIGGER, compose_message,
};
use futures::FutureExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    AwaitingResponse,
    Idle,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session has already been opened")]
    AlreadyOpen,
    #[error("session has not been opened yet")]
    NotOpen,
    #[error("still waiting for the previous reply")]
    Busy,
    #[error("message is empty")]
    EmptyInput,
    #[error("no request is in flight")]
    NothingPending,
    #[error("session is closed")]
    Closed,
}

pub struct AssistantSession {
    provider: Arc<dyn AssistantProvider>,
    state: SessionState,
    transcript: Vec<ChatMessage>,
    in_flight: Option<JoinHandle<anyhow::Result<String>>>,
}

impl AssistantSession {
    pub fn new(provider: Arc<dyn AssistantProvider>) -> Self {
        Self {
            provider,
            state: SessionState::Uninitialized,
            transcript: Vec::new(),
            in_flight: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Starts the conversation by sending the greeting trigger with `context`.
    ///
    /// The trigger itself is not recorded; only the assistant's greeting is.
    pub fn open(&mut self, context: &str) -> Result<(), SessionError> {
        match self.state {
            SessionState::Uninitialized => {}
            SessionState::Closed => return Err(SessionError::Closed),
            SessionState::Idle | SessionState::AwaitingResponse => {
                return Err(SessionError::AlreadyOpen);
            }
        }
        debug!("Opening assistant session");
        self.dispatch(GREETING_TRIGGER, context);
        Ok(())
    }

    /// Records the user's message and sends it with `context` attached.
    ///
    /// Rejected without side effects unless the session is idle and `text` has
    /// visible content.
    pub fn send(&mut self, text: &str, context: &str) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::AwaitingResponse => return Err(SessionError::Busy),
            SessionState::Uninitialized => return Err(SessionError::NotOpen),
            SessionState::Closed => return Err(SessionError::Closed),
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        self.transcript.push(ChatMessage::user(text));
        self.dispatch(text, context);
        Ok(())
    }

    /// Waits for the in-flight request and records its reply.
    ///
    /// Dropping the returned future leaves the request pending.
    pub async fn wait_reply(&mut self) -> Result<&ChatMessage, SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        let Some(handle) = self.in_flight.as_mut() else {
            return Err(SessionError::NothingPending);
        };
        let outcome = handle.await;
        self.in_flight = None;
        Ok(self.complete(outcome))
    }

    /// Records the reply if the in-flight request has finished, without waiting.
    pub fn poll_reply(&mut self) -> Result<Option<&ChatMessage>, SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        let outcome = match self.in_flight.as_mut() {
            Some(handle) => handle.now_or_never(),
            None => return Err(SessionError::NothingPending),
        };
        let Some(outcome) = outcome else {
            return Ok(None);
        };
        self.in_flight = None;
        Ok(Some(self.complete(outcome)))
    }

    /// Sends `text` and waits for the reply.
    pub async fn exchange(
        &mut self,
        text: &str,
        context: &str,
    ) -> Result<&ChatMessage, SessionError> {
        self.send(text, context)?;
        self.wait_reply().await
    }

    /// Ends the session. A request still in flight is aborted and its reply discarded.
    pub fn close(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            debug!("Aborting in-flight assistant request");
            handle.abort();
        }
        self.state = SessionState::Closed;
    }

    fn dispatch(&mut self, text: &str, context: &str) {
        let message = compose_message(text, context);
        let provider = Arc::clone(&self.provider);
        self.in_flight = Some(tokio::spawn(
            async move { provider.send(&message).await },
        ));
        self.state = SessionState::AwaitingResponse;
    }

    #[instrument(name = "AssistantReply", skip_all)]
    fn complete(&mut self, outcome: Result<anyhow::Result<String>, JoinError>) -> &ChatMessage {
        let reply = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "Assistant request failed");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Assistant task did not complete");
                FALLBACK_REPLY.to_string()
            }
        };
        self.transcript.push(ChatMessage::assistant(reply));
        self.state = SessionState::Idle;
        &self.transcript[self.transcript.len() - 1]
    }
}

impl Drop for AssistantSession {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
