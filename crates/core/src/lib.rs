//! # Hireline Core
//!
//! Domain types, traits, and error definitions for the Hireline contract
//! intake agent. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The conversational surface (provider, tools, human input) is defined as
//! traits here; implementations live in their respective crates. The three
//! engines — derivation, validation, extraction — are pure functions over
//! the [`contract::ContractDraft`] and carry no I/O at all.

pub mod contract;
pub mod derive;
pub mod error;
pub mod extract;
pub mod message;
pub mod provider;
pub mod tool;
pub mod validate;

// Re-export key types at crate root for ergonomics
pub use contract::{ContractDraft, ContractVersion, AUTHORIZED_SIGNATORIES};
pub use derive::derive;
pub use error::{Error, Result};
pub use extract::{extract_record, ExtractedRecord};
pub use message::{Conversation, Message, Role, SessionId};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
pub use validate::Validator;
