use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use triage_domain::{ExecutableTool, NamedTool, ToolName};
use triage_tool_macros::ToolDescription;

/// Check the application logs for given application name.
#[derive(Debug, Default, Clone, ToolDescription)]
pub struct GetLogDetails;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LogLookupInput {
    /// Name of the application whose logs should be fetched
    pub application_name: String,
}

const TRANSACTION_API_LOG: &[&str] = &[
    "2024-06-27 10:00:00.000  INFO 12345 --- [main] com.example.demo.TransactionApi         : Starting TransactionApi on user-macbook with PID 12345 (/path/to/demo-0.0.1-SNAPSHOT.jar started by user in /path/to/spring-boot-app)",
    "2024-06-27 10:00:00.001  INFO 12345 --- [main] com.example.demo.TransactionApi         : No active profile set, falling back to default profiles: default",
    "2024-06-27 10:00:01.123  INFO 12345 --- [main] o.s.b.w.embedded.tomcat.TomcatWebServer  : Tomcat initialized with port(s): 8080 (http)",
    "2024-06-27 10:00:01.456  INFO 12345 --- [main] o.apache.catalina.core.StandardService   : Starting service [Tomcat]",
    "2024-06-27 10:00:01.456  INFO 12345 --- [main] o.apache.catalina.core.StandardEngine    : Starting Servlet engine: [Apache Tomcat/9.0.37]",
    "2024-06-27 10:00:02.789  INFO 12345 --- [main] o.s.b.w.servlet.ServletRegistrationBean  : Servlet dispatcherServlet mapped to [/]",
    "2024-06-27 10:00:03.123  INFO 12345 --- [main] o.s.b.w.embedded.tomcat.TomcatWebServer  : Tomcat started on port(s): 8080 (http) with context path ''",
    "2024-06-27 10:00:03.456  INFO 12345 --- [main] com.example.demo.TransactionApi         : Started TransactionApi in 3.456 seconds (JVM running for 4.789)",
    "2024-06-27 10:00:04.123  ERROR 12345 --- [main] com.example.demo.OutOfMemorySimulator    : OutOfMemoryError: Java heap space",
    "java.lang.OutOfMemoryError: Java heap space",
    "    at com.example.demo.OutOfMemorySimulator.simulateOutOfMemory(OutOfMemorySimulator.java:12) ~[classes/:na]",
    "    at com.example.demo.TransactionApi.main(TransactionApi.java:11) ~[classes/:na]",
];

const ORDER_API_LOG: &[&str] = &[
    "2024-06-27 11:00:00.000  INFO 12345 --- [main] com.example.demo.OrderApi         : Starting OrderApi on user-macbook with PID 12345 (/path/to/demo-0.0.1-SNAPSHOT.jar started by user in /path/to/spring-boot-app)",
    "2024-06-27 11:00:00.001  INFO 12345 --- [main] com.example.demo.OrderApi         : No active profile set, falling back to default profiles: default",
    "2024-06-27 11:00:01.123  INFO 12345 --- [main] o.s.b.w.embedded.tomcat.TomcatWebServer  : Tomcat initialized with port(s): 8080 (http)",
    "2024-06-27 11:00:01.456  INFO 12345 --- [main] o.apache.catalina.core.StandardService   : Starting service [Tomcat]",
    "2024-06-27 11:00:01.456  INFO 12345 --- [main] o.apache.catalina.core.StandardEngine    : Starting Servlet engine: [Apache Tomcat/9.0.37]",
    "2024-06-27 11:00:02.789  INFO 12345 --- [main] o.s.b.w.servlet.ServletRegistrationBean  : Servlet dispatcherServlet mapped to [/]",
    "2024-06-27 11:00:03.123  INFO 12345 --- [main] o.s.b.w.embedded.tomcat.TomcatWebServer  : Tomcat started on port(s): 8080 (http) with context path ''",
    "2024-06-27 11:00:03.456  INFO 12345 --- [main] com.example.demo.OrderApi         : Started OrderApi in 3.456 seconds (JVM running for 4.789)",
    "2024-06-27 11:00:04.123  ERROR 12345 --- [main] com.example.demo.NullPointerSimulator    : NullPointerException: Cannot invoke \"String.length()\" because \"str\" is null",
    "java.lang.NullPointerException: Cannot invoke \"String.length()\" because \"str\" is null",
    "    at com.example.demo.NullPointerSimulator.simulateNullPointer(NullPointerSimulator.java:12) ~[classes/:na]",
    "    at com.example.demo.OrderApi.main(OrderApi.java:11) ~[classes/:na]",
];

impl NamedTool for GetLogDetails {
    fn tool_name() -> ToolName {
        ToolName::new("get_log_details")
    }
}

#[async_trait::async_trait]
impl ExecutableTool for GetLogDetails {
    type Input = LogLookupInput;

    async fn call(&self, input: Self::Input) -> anyhow::Result<String> {
        let lines = if input.application_name.contains("transaction-api") {
            TRANSACTION_API_LOG
        } else {
            ORDER_API_LOG
        };
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn logs_for(application_name: &str) -> String {
        let input = LogLookupInput { application_name: application_name.to_string() };
        GetLogDetails.call(input).await.unwrap()
    }

    #[tokio::test]
    async fn test_transaction_api_runs_out_of_memory() {
        let actual = logs_for("transaction-api").await;
        assert!(actual.contains("java.lang.OutOfMemoryError: Java heap space"));
        assert!(!actual.contains("NullPointerException"));
    }

    #[tokio::test]
    async fn test_other_applications_hit_null_pointer() {
        for name in ["order-api", "application_not_found"] {
            let actual = logs_for(name).await;
            assert!(actual.contains("java.lang.NullPointerException"), "app: {name}");
        }
    }

    #[tokio::test]
    async fn test_match_is_by_substring() {
        let actual = logs_for("prod/transaction-api-v2").await;
        assert!(actual.contains("OutOfMemoryError"));
    }
}
