use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use triage_domain::{ExtractionSchema, ToolDefinition, Turn};

/// Body of a `POST /v1/messages` call.
#[derive(Serialize, Default, Debug, Clone, PartialEq, Setters)]
#[setters(into, strip_option)]
pub struct Request {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl Request {
    pub fn get_messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }
}

impl From<&[Turn]> for Request {
    fn from(history: &[Turn]) -> Self {
        let system = history
            .iter()
            .filter_map(|turn| match turn {
                Turn::System { content } => Some(content.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();

        let messages = history.iter().filter_map(Message::from_turn).collect();

        Request {
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages,
            ..Default::default()
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Content>,
}

impl Message {
    /// System turns are lifted into [`Request::system`] and yield no message.
    fn from_turn(turn: &Turn) -> Option<Self> {
        match turn {
            Turn::System { .. } => None,
            Turn::User { content } => Some(Message {
                role: Role::User,
                content: vec![Content::Text { text: content.clone() }],
            }),
            Turn::Assistant(turn) => {
                let text = (!turn.content.is_empty())
                    .then(|| Content::Text { text: turn.content.clone() });
                // Only the honored call is sent; a tool_use without a matching
                // tool_result is rejected upstream.
                let calls = turn.tool_call().into_iter().map(|call| Content::ToolUse {
                    id: call.call_id.as_str().to_string(),
                    name: call.name.as_str().to_string(),
                    input: call.arguments.clone(),
                });
                let content: Vec<Content> = text.into_iter().chain(calls).collect();
                // Empty content is rejected on any message but the last.
                (!content.is_empty()).then_some(Message { role: Role::Assistant, content })
            }
            Turn::Observation(result) => Some(Message {
                role: Role::User,
                content: vec![Content::ToolResult {
                    tool_use_id: result.call_id.as_str().to_string(),
                    content: result.content.clone(),
                }],
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
    ToolUse { id: String, name: String, input: Value },
    ToolResult { tool_use_id: String, content: String },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolEntry {
    fn new(
        name: impl ToString,
        description: impl ToString,
        schema: &impl Serialize,
    ) -> serde_json::Result<Self> {
        let mut input_schema = serde_json::to_value(schema)?;
        if let Some(object) = input_schema.as_object_mut() {
            object.remove("$schema");
        }
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        })
    }
}

impl TryFrom<&ToolDefinition> for ToolEntry {
    type Error = serde_json::Error;

    fn try_from(value: &ToolDefinition) -> Result<Self, Self::Error> {
        ToolEntry::new(&value.name, &value.description, &value.input_schema)
    }
}

impl TryFrom<&ExtractionSchema> for ToolEntry {
    type Error = serde_json::Error;

    fn try_from(value: &ExtractionSchema) -> Result<Self, Self::Error> {
        ToolEntry::new(&value.name, &value.description, &value.schema)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolChoice {
    /// Forces the model to answer by calling the named tool.
    Tool { name: String },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use triage_domain::{AssistantTurn, ToolCallFull, ToolResult};

    use super::*;

    fn history() -> Vec<Turn> {
        let call = ToolCallFull::new("get_ticket_details", "toolu_01")
            .arguments(json!({"ticket_number": "INC12345"}));
        vec![
            Turn::system("You are responsible for answering user questions."),
            Turn::user("please check details for ticket INC12345"),
            AssistantTurn::new("").tool_calls(vec![call.clone()]).into(),
            ToolResult::new(&call, "{'application_name':'transaction-api'}").into(),
            Turn::assistant("application_name=transaction-api"),
        ]
    }

    #[test]
    fn test_system_turn_is_lifted() {
        let actual = Request::from(history().as_slice());
        assert_eq!(
            actual.system.as_deref(),
            Some("You are responsible for answering user questions.")
        );
        assert_eq!(actual.messages.len(), 4);
    }

    #[test]
    fn test_turns_serialize_to_messages_wire_format() {
        let fixture = history();
        let actual = serde_json::to_value(Request::from(fixture.as_slice()).messages).unwrap();
        let expected = json!([
            {"role": "user", "content": [{"type": "text", "text": "please check details for ticket INC12345"}]},
            {"role": "assistant", "content": [
                {"type": "tool_use", "id": "toolu_01", "name": "get_ticket_details", "input": {"ticket_number": "INC12345"}}
            ]},
            {"role": "user", "content": [
                {"type": "tool_result", "tool_use_id": "toolu_01", "content": "{'application_name':'transaction-api'}"}
            ]},
            {"role": "assistant", "content": [{"type": "text", "text": "application_name=transaction-api"}]}
        ]);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_unexecuted_tool_calls_are_not_sent() {
        let fixture = AssistantTurn::new("checking").tool_calls(vec![
            ToolCallFull::new("get_ticket_details", "toolu_01"),
            ToolCallFull::new("get_log_details", "toolu_02"),
        ]);
        let turns: Vec<Turn> = vec![fixture.into()];
        let actual = Request::from(turns.as_slice()).messages;

        assert_eq!(actual.len(), 1);
        assert_eq!(
            actual[0].content,
            vec![
                Content::Text { text: "checking".to_string() },
                Content::ToolUse {
                    id: "toolu_01".to_string(),
                    name: "get_ticket_details".to_string(),
                    input: json!({}),
                },
            ]
        );
    }

    #[test]
    fn test_empty_assistant_turn_is_not_sent() {
        let fixture = vec![Turn::user("q"), Turn::assistant(""), Turn::user("next")];
        let actual = Request::from(fixture.as_slice()).messages;

        let roles: Vec<Role> = actual.iter().map(|message| message.role).collect();
        assert_eq!(roles, vec![Role::User, Role::User]);
        assert!(actual.iter().all(|message| !message.content.is_empty()));
    }

    #[test]
    fn test_tool_entry_keeps_definition_schema() {
        let fixture = ToolDefinition::new("get_ticket_details").description("Look up a ticket");
        let actual = ToolEntry::try_from(&fixture).unwrap();
        let expected = ToolEntry {
            name: "get_ticket_details".to_string(),
            description: "Look up a ticket".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_tool_entry_drops_schema_uri() {
        let actual = ToolEntry::try_from(&ExtractionSchema::ticket_details()).unwrap();
        assert_eq!(actual.name, "TicketDetails");
        assert!(actual.input_schema.get("$schema").is_none());
        assert_eq!(
            actual.input_schema["required"],
            json!(["application_name"])
        );
    }

    #[test]
    fn test_forced_tool_choice_wire_format() {
        let fixture = ToolChoice::Tool { name: "TicketDetails".into() };
        let actual = serde_json::to_value(fixture).unwrap();
        let expected = json!({"type": "tool", "name": "TicketDetails"});
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let fixture = Request::default()
            .model("claude-3-5-sonnet-20240620")
            .max_tokens(16u32);
        let actual = serde_json::to_value(fixture).unwrap();
        let expected =
            json!({"model": "claude-3-5-sonnet-20240620", "max_tokens": 16, "messages": []});
        assert_eq!(actual, expected);
    }
}
