//! The contract intake session loop for Hireline.
//!
//! Wires a [`Provider`](hireline_core::Provider), the tool registry, and a
//! [`HumanPort`] into one [`IntakeSession`] state machine. See
//! [`session`] for the phase diagram.

pub mod human;
pub mod prompt;
pub mod session;

pub use human::{HumanPort, ScriptedHuman};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, system_prompt};
pub use session::{Disposition, EXIT_KEYWORDS, IntakeSession, Phase, SessionOutcome};
