//! Current date tool — tells the model what day it is.
//!
//! The model has no reliable notion of "now", so it calls this before
//! reasoning about any date the operator mentions.

use async_trait::async_trait;
use chrono::Local;
use hireline_core::error::ToolError;
use hireline_core::tool::{Tool, ToolResult};

pub struct CurrentDateTool;

#[async_trait]
impl Tool for CurrentDateTool {
    fn name(&self) -> &str {
        "current_date"
    }

    fn description(&self) -> &str {
        "Get the current date and time. Use this before interpreting any \
         relative date the user mentions."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let now = Local::now();
        Ok(ToolResult {
            success: true,
            output: format!(
                "TODAY IS: {}, {}. Current time: {}",
                now.format("%A"),
                now.format("%Y-%m-%d"),
                now.format("%H:%M:%S"),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_today() {
        let result = CurrentDateTool
            .execute(serde_json::json!({}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.starts_with("TODAY IS: "));
        assert!(result.output.contains("Current time:"));
    }

    #[test]
    fn schema_takes_no_arguments() {
        let schema = CurrentDateTool.parameters_schema();
        assert!(schema["properties"].as_object().unwrap().is_empty());
    }
}
