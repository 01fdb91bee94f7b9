use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of the conversation as the UI keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// What one tool call produced, reported back to the UI so it can render cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutcome {
    pub tool: String,
    pub arguments: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn success(tool: &str, arguments: Value, output: Value) -> Self {
        ToolOutcome {
            tool: tool.to_string(),
            arguments,
            output: Some(output),
            error: None,
        }
    }

    pub fn failure(tool: &str, arguments: Value, error: String) -> Self {
        ToolOutcome {
            tool: tool.to_string(),
            arguments,
            output: None,
            error: Some(error),
        }
    }

    /// Body of the tool message handed back to the model.
    pub fn to_model_content(&self) -> String {
        match (&self.output, &self.error) {
            (Some(output), _) => output.to_string(),
            (None, Some(error)) => json!({ "error": error }).to_string(),
            (None, None) => Value::Null.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub tool_results: Vec<ToolOutcome>,
}

impl ChatResponse {
    pub fn new(message: String, tool_results: Vec<ToolOutcome>) -> Self {
        ChatResponse {
            success: true,
            message,
            tool_results,
        }
    }
}
