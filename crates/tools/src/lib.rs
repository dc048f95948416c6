//! Built-in tool implementations for Hireline.
//!
//! The intake agent exposes exactly two capabilities to the model: asking
//! what day it is, and resolving relative date phrases to concrete dates.
//! Everything else in a session is plain conversation.

pub mod current_date;
pub mod resolve_date;

pub use current_date::CurrentDateTool;
pub use resolve_date::ResolveDateTool;

use hireline_core::tool::ToolRegistry;

/// Create the standard tool registry for an intake session.
pub fn standard_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CurrentDateTool));
    registry.register(Box::new(ResolveDateTool::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_date_tools() {
        let registry = standard_registry();
        assert!(registry.get("current_date").is_some());
        assert!(registry.get("resolve_date").is_some());
        assert_eq!(registry.definitions().len(), 2);
    }
}
