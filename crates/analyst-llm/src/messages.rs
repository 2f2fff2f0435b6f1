//! Conversation messages
//!
//! The enum is shaped like the chat completion wire format, so a
//! conversation serializes directly into the `messages` array of a request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// Result of a tool call, matched to the request by `tool_call_id`
    Tool {
        tool_call_id: String,
        content: String,
    },
}

/// A function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

/// Name and JSON-encoded arguments of a function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Arguments as the raw JSON string sent by the model
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Plain text assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    /// Text of the message, if it has any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::System { content } | Self::User { content } | Self::Tool { content, .. } => {
                Some(content)
            }
            Self::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// Tool calls carried by an assistant message (empty otherwise)
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    /// Wire name of the role
    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: function_kind(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

impl FunctionCall {
    /// Parse the argument string. Some models send an empty string for
    /// zero-argument calls; that is treated as `{}`.
    pub fn parse_arguments(&self) -> serde_json::Result<Value> {
        if self.arguments.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_wire_shape() {
        let value = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "Hello"}));
    }

    #[test]
    fn test_assistant_tool_call_wire_shape() {
        let msg = Message::Assistant {
            content: None,
            tool_calls: vec![ToolCall::new("call_1", "get_stock_price", r#"{"symbol":"AAPL"}"#)],
        };
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["role"], "assistant");
        assert!(value.get("content").is_none());
        assert_eq!(value["tool_calls"][0]["type"], "function");
        assert_eq!(value["tool_calls"][0]["function"]["name"], "get_stock_price");
    }

    #[test]
    fn test_tool_result_wire_shape() {
        let value = serde_json::to_value(Message::tool_result("call_1", "{}")).unwrap();
        assert_eq!(
            value,
            json!({"role": "tool", "tool_call_id": "call_1", "content": "{}"})
        );
    }

    #[test]
    fn test_text_and_tool_calls_accessors() {
        assert_eq!(Message::system("sys").text(), Some("sys"));
        assert_eq!(Message::assistant("done").text(), Some("done"));
        assert!(!Message::assistant("done").has_tool_calls());

        let msg = Message::Assistant {
            content: None,
            tool_calls: vec![ToolCall::new("a", "b", "{}")],
        };
        assert_eq!(msg.text(), None);
        assert_eq!(msg.tool_calls().len(), 1);
        assert_eq!(msg.role(), "assistant");
    }

    #[test]
    fn test_parse_empty_arguments() {
        let call = ToolCall::new("a", "b", "");
        assert_eq!(call.function.parse_arguments().unwrap(), json!({}));

        let call = ToolCall::new("a", "b", r#"{"symbol":"MSFT"}"#);
        assert_eq!(call.function.parse_arguments().unwrap()["symbol"], "MSFT");

        let call = ToolCall::new("a", "b", "{not json");
        assert!(call.function.parse_arguments().is_err());
    }
}
