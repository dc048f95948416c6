//! The intake session state machine.
//!
//! One session drives one contract interview end to end:
//!
//! 1. **Collecting** — relay the model's questions to the operator and the
//!    operator's answers back, running tool round-trips in between.
//! 2. **Verifying** — once the model emits a complete record that derives
//!    and validates cleanly, show the review block and wait for approval.
//! 3. **Finalized** / **Cancelled** — terminal.
//!
//! Validation failures are shown to the operator as correction guidance;
//! the operator's reply re-enters the transcript as the next user turn.

use crate::human::HumanPort;
use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use hireline_core::error::ProviderError;
use hireline_core::provider::ToolDefinition;
use hireline_core::{
    ContractDraft, Conversation, Message, Provider, ProviderRequest, Result, SessionId, ToolCall,
    ToolRegistry, Validator, derive, extract_record,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Words that end the session immediately, on their own user turn.
pub const EXIT_KEYWORDS: [&str; 7] = ["exit", "bye", "quit", "stop", "cancel", "goodbye", "end"];

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Verifying,
    Finalized,
    Cancelled,
}

/// What a finalized record means downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A new contract record
    Created,
    /// An amendment to an existing contract
    Updated,
}

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    Finalized {
        record: serde_json::Map<String, Value>,
        disposition: Disposition,
    },
    Cancelled {
        reason: String,
    },
}

/// One contract intake conversation, start to finish.
pub struct IntakeSession {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    human: Arc<dyn HumanPort>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    /// Tool round-trips allowed within one model turn
    max_tool_rounds: u32,
    /// Conversational turns allowed before giving up
    max_turns: u32,
    validator: Validator,
    system_prompt: String,
    conversation: Conversation,
    draft: ContractDraft,
    phase: Phase,
}

impl IntakeSession {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        human: Arc<dyn HumanPort>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            human,
            model: model.into(),
            temperature: 0.3,
            max_tokens: None,
            max_tool_rounds: 5,
            max_turns: 60,
            validator: Validator::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            conversation: Conversation::new(),
            draft: ContractDraft::default(),
            phase: Phase::Collecting,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn with_max_turns(mut self, max: u32) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session_id(&self) -> &SessionId {
        &self.conversation.session
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn draft(&self) -> &ContractDraft {
        &self.draft
    }

    /// Run the interview to completion, starting from the operator's
    /// opening message.
    pub async fn run(&mut self, opening: impl Into<String>) -> Result<SessionOutcome> {
        self.conversation.push(Message::system(&self.system_prompt));
        self.conversation.push(Message::user(opening));

        info!(session = %self.conversation.session, "intake session started");

        let tool_definitions = self.tools.definitions();
        let mut turn = 0u32;

        loop {
            if let Some(last) = self.conversation.last_user_content()
                && is_exit(last)
            {
                return Ok(self.cancel("operator ended the session"));
            }

            turn += 1;
            if turn > self.max_turns {
                warn!(session = %self.conversation.session, "turn limit reached");
                return Ok(self.cancel("conversation turn limit reached"));
            }

            let message = match self.step_model(&tool_definitions).await {
                Ok(m) => m,
                Err(e) => {
                    warn!(session = %self.conversation.session, error = %e, "provider failure");
                    return Ok(self.cancel(format!("provider failure: {e}")));
                }
            };

            match extract_record(&message.content) {
                Some(record) if record.complete => {
                    let derived = derive(&record.draft);
                    let violations = self.validator.validate(&derived);

                    if violations.is_empty() {
                        self.draft = derived;
                        self.phase = Phase::Verifying;
                        if let Some(outcome) = self.verify().await? {
                            return Ok(outcome);
                        }
                    } else {
                        debug!(
                            session = %self.conversation.session,
                            count = violations.len(),
                            "record failed validation, relaying to operator"
                        );
                        let mut correction =
                            String::from("The contract data has the following problems:\n");
                        for v in &violations {
                            correction.push_str(&format!("- {v}\n"));
                        }
                        correction.push_str("Please provide the corrections.");
                        self.conversation.push(Message::assistant(&correction));
                        let answer = self.human.prompt(&correction).await?;
                        self.conversation.push(Message::user(answer));
                    }
                }
                _ => {
                    // A plain conversational turn (or an in-progress record):
                    // relay it and wait for the operator's answer.
                    let answer = self.human.prompt(&message.content).await?;
                    self.conversation.push(Message::user(answer));
                }
            }
        }
    }

    /// The human verification gate. `None` means the operator asked for a
    /// change and collection resumes.
    async fn verify(&mut self) -> Result<Option<SessionOutcome>> {
        self.human.show(&self.draft.summary()).await?;
        let answer = self
            .human
            .prompt("Do you approve this contract data? (yes to approve, or describe what to change)")
            .await?;

        if is_exit(&answer) {
            return Ok(Some(self.cancel("operator ended the session")));
        }

        if is_approval(&answer) {
            self.phase = Phase::Finalized;
            let disposition = if self.draft.contract_version.is_some_and(|v| v.is_amendment()) {
                Disposition::Updated
            } else {
                Disposition::Created
            };
            info!(
                session = %self.conversation.session,
                ?disposition,
                "contract record finalized"
            );
            return Ok(Some(SessionOutcome::Finalized {
                record: self.draft.finalize(),
                disposition,
            }));
        }

        // Back to collecting with the requested change on the transcript.
        self.phase = Phase::Collecting;
        self.conversation
            .push(Message::user(format!("Correction needed: {answer}")));
        Ok(None)
    }

    /// One model turn, including any tool round-trips.
    async fn step_model(
        &mut self,
        tool_definitions: &[ToolDefinition],
    ) -> std::result::Result<Message, ProviderError> {
        for _round in 0..self.max_tool_rounds {
            let request = ProviderRequest {
                model: self.model.clone(),
                messages: self.conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.to_vec(),
            };

            let response = self.provider.complete(request).await?;

            if response.message.tool_calls.is_empty() {
                self.conversation.push(response.message.clone());
                return Ok(response.message);
            }

            let tool_calls = response.message.tool_calls.clone();
            self.conversation.push(response.message);

            for tc in &tool_calls {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                match self.tools.execute(&call).await {
                    Ok(result) => {
                        debug!(tool = %tc.name, success = result.success, "tool executed");
                        self.conversation
                            .push(Message::tool_result(&tc.id, &result.output));
                    }
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "tool execution failed");
                        // Report the failure so the model can recover.
                        self.conversation
                            .push(Message::tool_result(&tc.id, format!("Error: {e}")));
                    }
                }
            }
        }

        warn!(session = %self.conversation.session, "tool round limit reached");
        let message = Message::assistant(
            "I was unable to finish the lookups. Could you give the date directly as YYYY-MM-DD?",
        );
        self.conversation.push(message.clone());
        Ok(message)
    }

    fn cancel(&mut self, reason: impl Into<String>) -> SessionOutcome {
        let reason = reason.into();
        self.phase = Phase::Cancelled;
        info!(session = %self.conversation.session, %reason, "intake session cancelled");
        SessionOutcome::Cancelled { reason }
    }
}

/// An exit keyword on its own, ignoring case and trailing punctuation.
fn is_exit(input: &str) -> bool {
    let normalized = input
        .trim()
        .trim_end_matches(['!', '.', '?'])
        .to_lowercase();
    EXIT_KEYWORDS.contains(&normalized.as_str())
}

/// "yes", "y", or "approve", case-insensitively.
fn is_approval(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "yes" | "y" | "approve"
    )
}
