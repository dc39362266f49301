use lazy_static::lazy_static;
use regex::Regex;

use crate::Transformer;
use crate::anthropic::{Content, Request};

lazy_static! {
    static ref INVALID_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_-]").unwrap();
}

/// Rewrites tool call ids so they match `^[a-zA-Z0-9_-]+$`, replacing every
/// other character with an underscore. Ids that arrive from a different
/// oracle would otherwise be rejected with a 400.
pub struct SanitizeToolIds;

impl Transformer for SanitizeToolIds {
    type Value = Request;

    fn transform(&mut self, mut request: Self::Value) -> Self::Value {
        let regex = &*INVALID_CHARS;

        for message in request.get_messages_mut() {
            for content in &mut message.content {
                match content {
                    Content::ToolUse { id, .. } => {
                        *id = regex.replace_all(id, "_").to_string();
                    }
                    Content::ToolResult { tool_use_id, .. } => {
                        *tool_use_id = regex.replace_all(tool_use_id, "_").to_string();
                    }
                    Content::Text { .. } => {}
                }
            }
        }

        request
    }
}
