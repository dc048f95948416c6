//! The human interaction surface of an intake session.
//!
//! The session loop never touches stdin or stdout directly; it talks to a
//! [`HumanPort`]. The CLI provides a console implementation, and tests use
//! [`ScriptedHuman`].

use async_trait::async_trait;
use hireline_core::error::SessionError;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Where operator answers come from and assistant output goes to.
#[async_trait]
pub trait HumanPort: Send + Sync {
    /// Show `text` and wait for the operator's reply.
    async fn prompt(&self, text: &str) -> Result<String, SessionError>;

    /// Show `text` without expecting a reply.
    async fn show(&self, text: &str) -> Result<(), SessionError>;
}

/// A scripted operator: answers from a fixed list, records what it was shown.
pub struct ScriptedHuman {
    replies: Mutex<VecDeque<String>>,
    shown: Mutex<Vec<String>>,
}

impl ScriptedHuman {
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Everything the session displayed, in order.
    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HumanPort for ScriptedHuman {
    async fn prompt(&self, text: &str) -> Result<String, SessionError> {
        self.show(text).await?;
        self.replies
            .lock()
            .map_err(|_| SessionError::InputFailed("reply queue poisoned".into()))?
            .pop_front()
            .ok_or(SessionError::InputClosed)
    }

    async fn show(&self, text: &str) -> Result<(), SessionError> {
        self.shown
            .lock()
            .map_err(|_| SessionError::InputFailed("display log poisoned".into()))?
            .push(text.to_string());
        Ok(())
    }
}
