use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use tracing::debug;
use triage_domain::{
    Error, ExecutableTool, NamedTool, Result, ToolCallFull, ToolDefinition, ToolDescription,
    ToolName, ToolResult,
};

use crate::tools::{GetLogDetails, GetTicketDetails};

/// Type-erased tool: takes raw JSON arguments and produces the raw result text.
#[async_trait::async_trait]
pub trait Capability: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn invoke(&self, arguments: Value) -> anyhow::Result<String>;
}

#[async_trait::async_trait]
impl<T> Capability for T
where
    T: ExecutableTool + NamedTool + ToolDescription + Send + Sync,
{
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::from(self)
    }

    async fn invoke(&self, arguments: Value) -> anyhow::Result<String> {
        let input: T::Input =
            serde_json::from_value(arguments).map_err(Error::ToolCallArgument)?;
        self.call(input).await
    }
}

/// Every tool the triage agent ships with. Adding a variant forces a matching
/// arm in [`TriageTool::capability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TriageTool {
    TicketDetails,
    LogDetails,
}

impl TriageTool {
    pub fn capability(self) -> Arc<dyn Capability> {
        match self {
            TriageTool::TicketDetails => Arc::new(GetTicketDetails),
            TriageTool::LogDetails => Arc::new(GetLogDetails),
        }
    }
}

/// Name-indexed capabilities, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    capabilities: Vec<(ToolName, Arc<dyn Capability>)>,
}

impl ToolRegistry {
    /// Registry holding the ticket and log lookup tools.
    pub fn triage() -> Self {
        TriageTool::iter().fold(Self::default(), |registry, tool| {
            registry.register(tool.capability())
        })
    }

    /// Adds a capability. A later registration under the same (normalized)
    /// name replaces the earlier one.
    pub fn register(mut self, capability: Arc<dyn Capability>) -> Self {
        let name = capability.definition().name.normalized();
        match self.capabilities.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = capability,
            None => self.capabilities.push((name, capability)),
        }
        self
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.capabilities
            .iter()
            .map(|(_, capability)| capability.definition())
            .collect()
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &ToolName) -> Result<&Arc<dyn Capability>> {
        let name = name.normalized();
        self.capabilities
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, capability)| capability)
            .ok_or_else(|| Error::ToolNotFound(name))
    }

    /// Checks that every definition offered to the oracle can be dispatched.
    pub fn validate(&self, definitions: &[ToolDefinition]) -> Result<()> {
        for definition in definitions {
            if self.find(&definition.name).is_err() {
                return Err(Error::UnregisteredTool(definition.name.clone()));
            }
        }
        Ok(())
    }

    /// Runs the capability named by `call`. The result carries the call's
    /// correlation id.
    pub async fn call(&self, call: &ToolCallFull) -> anyhow::Result<ToolResult> {
        let capability = self.find(&call.name)?;
        debug!(tool = %call.name, call_id = %call.call_id, "Invoking tool");
        let content = capability.invoke(call.arguments.clone()).await?;
        Ok(ToolResult::new(call, content))
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.capabilities.iter().map(|(name, _)| name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn ticket_call(name: &str, arguments: Value) -> ToolCallFull {
        ToolCallFull::new(name, "toolu_01").arguments(arguments)
    }

    #[test]
    fn test_triage_registry_definitions() {
        let actual: Vec<_> = ToolRegistry::triage()
            .definitions()
            .into_iter()
            .map(|definition| definition.name)
            .collect();
        let expected = vec![
            ToolName::new("get_ticket_details"),
            ToolName::new("get_log_details"),
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_every_triage_tool_is_described() {
        for tool in TriageTool::iter() {
            let definition = tool.capability().definition();
            assert!(!definition.description.is_empty(), "tool: {tool}");
        }
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let fixture = ticket_call("Get_Ticket_Details", json!({"ticket_number": "INC12345"}));
        let actual = ToolRegistry::triage().call(&fixture).await.unwrap();

        assert_eq!(actual.call_id, fixture.call_id);
        assert!(actual.content.contains("transaction-api"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let fixture = ticket_call("get_weather", json!({}));
        let actual = ToolRegistry::triage().call(&fixture).await.unwrap_err();

        assert!(matches!(
            actual.downcast_ref::<Error>(),
            Some(Error::ToolNotFound(name)) if name.as_str() == "get_weather"
        ));
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_an_error() {
        let fixture = ticket_call("get_ticket_details", json!({"ticket": 42}));
        let actual = ToolRegistry::triage().call(&fixture).await.unwrap_err();

        assert!(matches!(
            actual.downcast_ref::<Error>(),
            Some(Error::ToolCallArgument(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unregistered_definitions() {
        let fixture = vec![
            ToolDefinition::new("get_ticket_details"),
            ToolDefinition::new("get_weather"),
        ];
        let actual = ToolRegistry::triage().validate(&fixture).unwrap_err();
        assert!(matches!(actual, Error::UnregisteredTool(name) if name.as_str() == "get_weather"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let actual = ToolRegistry::triage().register(Arc::new(GetTicketDetails));
        assert_eq!(actual.definitions().len(), 2);
    }
}
