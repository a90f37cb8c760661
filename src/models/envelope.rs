//! The result envelope returned for every tool call.

use pmcp::{CallToolResult, Content};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A content block in a tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// Tool call result in MCP wire casing
///
/// Success envelopes carry the raw upstream payload as `structuredContent`;
/// error envelopes carry only text and set `isError`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEnvelope {
    pub content: Vec<ContentBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolEnvelope {
    pub fn success(text: impl Into<String>, structured: Value) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            structured_content: Some(structured),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            structured_content: None,
            is_error: true,
        }
    }

    /// All text blocks joined by newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

}

impl From<ContentBlock> for Content {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text { text } => Content::Text { text },
        }
    }
}

/// The `tools/call` result sent to MCP clients
impl From<ToolEnvelope> for CallToolResult {
    fn from(envelope: ToolEnvelope) -> Self {
        let content: Vec<Content> = envelope.content.into_iter().map(Content::from).collect();
        let result = if envelope.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::new(content)
        };
        match envelope.structured_content {
            Some(payload) => result.with_structured_content(payload),
            None => result,
        }
    }
}
