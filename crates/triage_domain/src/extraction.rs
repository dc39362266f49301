use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value recorded when no application name can be discerned from the data.
pub const APPLICATION_NOT_FOUND: &str = "application_not_found";

/// For capturing ticket details from given data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TicketDetails {
    /// Captures the application name from given data. If the application name
    /// is not found then set it to 'application_not_found'
    pub application_name: String,
}

impl TicketDetails {
    pub fn new(application_name: impl ToString) -> Self {
        Self { application_name: application_name.to_string() }
    }

    pub fn not_found() -> Self {
        Self::new(APPLICATION_NOT_FOUND)
    }

    /// Reads the oracle's structured output. Anything that does not carry a
    /// non-blank `application_name` string resolves to the sentinel.
    pub fn from_value(value: &Value) -> Self {
        value
            .get("application_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Self::new)
            .unwrap_or_else(Self::not_found)
    }

    pub fn is_found(&self) -> bool {
        self.application_name != APPLICATION_NOT_FOUND
    }
}

/// A single-object schema the oracle is forced to answer with.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSchema {
    pub name: String,
    pub description: String,
    pub schema: Schema,
}

impl ExtractionSchema {
    pub fn of<T: JsonSchema>(name: impl ToString, description: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            schema: schemars::schema_for!(T),
        }
    }

    pub fn ticket_details() -> Self {
        Self::of::<TicketDetails>("TicketDetails", "For capturing ticket details from given data")
    }
}
