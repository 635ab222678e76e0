//! Message types for LLM communication
//!
//! This module defines the conversation primitives exchanged with a model,
//! based on Anthropic's Messages API design: a message has a role and either
//! plain text or a list of content blocks. Function-call requests travel as
//! `ToolUse` blocks on assistant messages, and their answers as `ToolResult`
//! blocks on user messages.

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human message (also carries tool results)
    User,
    /// Model-generated message
    Assistant,
    /// System message (folded into the system prompt by providers that need it)
    System,
}

/// Content block in a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content
    Text {
        /// Text content
        text: String,
    },

    /// Function-call request from the assistant
    ToolUse {
        /// Unique ID for this request
        id: String,
        /// Tool name
        name: String,
        /// Tool input parameters (JSON)
        input: serde_json::Value,
    },

    /// Tool result answering a `ToolUse` block
    ToolResult {
        /// ID of the tool use this is responding to
        tool_use_id: String,
        /// Result content
        content: String,
        /// Whether this is an error result
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// Borrowed view of a single function-call request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolCall<'a> {
    /// Call identifier, unique per request
    pub id: &'a str,
    /// Requested function name
    pub name: &'a str,
    /// Argument mapping
    pub input: &'a serde_json::Value,
}

/// Message content: either simple text or structured blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content
    Text(String),
    /// Structured content blocks
    Blocks(Vec<ContentBlock>),
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Message content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

impl Message {
    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Create an assistant message from raw content blocks
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Blocks(blocks)),
        }
    }

    /// Create a system message with text
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Create a user message with tool result
    pub fn tool_result(tool_use_id: String, result: String) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Blocks(vec![ContentBlock::ToolResult {
                tool_use_id,
                content: result,
                is_error: None,
            }])),
        }
    }

    /// Create a user message with error tool result
    pub fn tool_error(tool_use_id: String, error: String) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Blocks(vec![ContentBlock::ToolResult {
                tool_use_id,
                content: error,
                is_error: Some(true),
            }])),
        }
    }

    /// Extract text content from the message (first text block)
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(MessageContent::Text(s)) => Some(s),
            Some(MessageContent::Blocks(blocks)) => blocks.iter().find_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            }),
            None => None,
        }
    }

    /// Function-call requests carried by this message, in order
    pub fn tool_uses(&self) -> Vec<ToolCall<'_>> {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::ToolUse { id, name, input } => Some(ToolCall { id, name, input }),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }

    /// Check if this message contains any tool uses
    pub fn has_tool_uses(&self) -> bool {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .any(|b| matches!(b, ContentBlock::ToolUse { .. })),
            _ => false,
        }
    }

    /// The `(tool_use_id, content, is_error)` of a tool-result message
    pub fn tool_result_parts(&self) -> Option<(&str, &str, bool)> {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks.iter().find_map(|b| match b {
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => Some((
                    tool_use_id.as_str(),
                    content.as_str(),
                    is_error.unwrap_or(false),
                )),
                _ => None,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), Some("Hello"));
    }

    #[test]
    fn test_tool_result() {
        let msg = Message::tool_result("toolu_1".to_string(), "5".to_string());
        assert_eq!(msg.role, Role::User);
        assert!(!msg.has_tool_uses());
        assert_eq!(msg.tool_result_parts(), Some(("toolu_1", "5", false)));

        let err = Message::tool_error("toolu_2".to_string(), "Error: boom".to_string());
        assert_eq!(err.tool_result_parts(), Some(("toolu_2", "Error: boom", true)));
    }

    #[test]
    fn test_tool_uses_keep_order() {
        let msg = Message::assistant_blocks(vec![
            ContentBlock::Text {
                text: "Let me compute that.".to_string(),
            },
            ContentBlock::ToolUse {
                id: "a".to_string(),
                name: "add".to_string(),
                input: json!({"a": 1, "b": 2}),
            },
            ContentBlock::ToolUse {
                id: "b".to_string(),
                name: "multiply".to_string(),
                input: json!({"a": 3, "b": 4}),
            },
        ]);

        assert!(msg.has_tool_uses());
        let calls = msg.tool_uses();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "a");
        assert_eq!(calls[1].name, "multiply");
        assert_eq!(msg.text(), Some("Let me compute that."));
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::assistant_blocks(vec![ContentBlock::ToolUse {
            id: "toolu_9".to_string(),
            name: "divide".to_string(),
            input: json!({"a": 10, "b": 2}),
        }]);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"][0]["type"], "tool_use");

        let back: Message = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }
}
