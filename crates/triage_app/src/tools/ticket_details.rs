use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use triage_domain::{ExecutableTool, NamedTool, ToolName};
use triage_tool_macros::ToolDescription;

/// Check the incident details for given ticket number.
#[derive(Debug, Default, Clone, ToolDescription)]
pub struct GetTicketDetails;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TicketLookupInput {
    /// Incident ticket number, e.g. INC12345
    pub ticket_number: String,
}

/// Incident record returned by the ticket lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: String,
    pub environment: String,
    pub date: String,
    pub application_name: String,
}

impl TicketRecord {
    /// The canned record for a ticket. `INC12345` is a production incident on
    /// `transaction-api`; every other number resolves to the `order-api` UAT
    /// incident.
    pub fn lookup(ticket_number: &str) -> Self {
        let (id, environment, date, application_name) = if ticket_number == "INC12345" {
            ("INC12345", "prod", "07072024", "transaction-api")
        } else {
            ("INC123456", "uat", "07142024", "order-api")
        };
        Self {
            id: id.to_string(),
            environment: environment.to_string(),
            date: date.to_string(),
            application_name: application_name.to_string(),
        }
    }
}

impl NamedTool for GetTicketDetails {
    fn tool_name() -> ToolName {
        ToolName::new("get_ticket_details")
    }
}

#[async_trait::async_trait]
impl ExecutableTool for GetTicketDetails {
    type Input = TicketLookupInput;

    async fn call(&self, input: Self::Input) -> anyhow::Result<String> {
        let record = TicketRecord::lookup(&input.ticket_number);
        Ok(serde_json::to_string(&record)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use triage_domain::ToolDescription;

    use super::*;

    #[tokio::test]
    async fn test_known_ticket() {
        let fixture = TicketLookupInput { ticket_number: "INC12345".to_string() };
        let actual = GetTicketDetails.call(fixture).await.unwrap();
        let expected = r#"{"id":"INC12345","environment":"prod","date":"07072024","application_name":"transaction-api"}"#;
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_unknown_ticket_falls_back_to_order_api() {
        let fixture = TicketLookupInput { ticket_number: "INC999".to_string() };
        let actual = GetTicketDetails.call(fixture).await.unwrap();
        let record: TicketRecord = serde_json::from_str(&actual).unwrap();
        assert_eq!(record, TicketRecord::lookup("INC123456"));
        assert_eq!(record.application_name, "order-api");
    }

    #[test]
    fn test_description_comes_from_doc_comment() {
        let actual = GetTicketDetails.description();
        assert_eq!(actual, "Check the incident details for given ticket number.");
    }
}
