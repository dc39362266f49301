use pretty_assertions::assert_eq;
use serde_json::json;
use triage_domain::{AssistantTurn, Error, Phase, Role, ToolDefinition, Turn};

use super::orch_setup::{TestContext, tool_request};
use crate::prompts::LOG_ANALYSIS_REQUEST;

fn ticket_lookup(ticket_number: &str) -> AssistantTurn {
    tool_request(
        "get_ticket_details",
        "toolu_ticket",
        json!({"ticket_number": ticket_number}),
    )
}

fn log_lookup(application_name: &str) -> AssistantTurn {
    tool_request(
        "get_log_details",
        "toolu_log",
        json!({"application_name": application_name}),
    )
}

fn roles(history: &[Turn]) -> Vec<Role> {
    history.iter().map(Turn::role).collect()
}

#[tokio::test]
async fn test_transaction_api_out_of_memory() {
    let mut ctx = TestContext::ticket("INC12345")
        .mock_assistant_responses(vec![
            ticket_lookup("INC12345"),
            log_lookup("transaction-api"),
            AssistantTurn::new(
                "transaction-api crashed with java.lang.OutOfMemoryError: Java heap space",
            ),
        ])
        .mock_extractions(vec![json!({"application_name": "transaction-api"})]);

    ctx.run().await.unwrap();
    let state = ctx.output.state();

    let payload = state.captured_ticket_payload.as_deref().unwrap();
    assert!(payload.contains("\"application_name\":\"transaction-api\""));
    assert!(payload.contains("\"environment\":\"prod\""));
    assert!(state.issue_summary.as_deref().unwrap().contains("OutOfMemoryError"));
    assert_eq!(state.reasoning_call_count, 4);

    let expected = vec![
        Role::System,
        Role::User,
        Role::Assistant,
        Role::Observation,
        Role::Assistant,
        Role::User,
        Role::Assistant,
        Role::Observation,
        Role::Assistant,
    ];
    assert_eq!(roles(&state.history), expected);
    assert_eq!(state.history[4], Turn::assistant("application_name=transaction-api"));
    assert_eq!(state.history[5], Turn::user(LOG_ANALYSIS_REQUEST));

    let logs = state.history[7].as_observation().unwrap();
    assert!(logs.content.contains("java.lang.OutOfMemoryError"));
}

#[tokio::test]
async fn test_order_api_null_pointer() {
    let mut ctx = TestContext::ticket("INC123456")
        .mock_assistant_responses(vec![
            ticket_lookup("INC123456"),
            log_lookup("order-api"),
            AssistantTurn::new("order-api failed with java.lang.NullPointerException"),
        ])
        .mock_extractions(vec![json!({"application_name": "order-api"})]);

    ctx.run().await.unwrap();
    let state = ctx.output.state();

    assert!(
        state
            .captured_ticket_payload
            .as_deref()
            .unwrap()
            .contains("order-api")
    );
    let logs = state.history[7].as_observation().unwrap();
    assert!(logs.content.contains("java.lang.NullPointerException"));
    assert!(state.issue_summary.as_deref().unwrap().contains("NullPointerException"));
}

#[tokio::test]
async fn test_unidentified_application_uses_sentinel() {
    let mut ctx = TestContext::ticket("INC000")
        .mock_assistant_responses(vec![
            ticket_lookup("INC000"),
            log_lookup("application_not_found"),
            AssistantTurn::new("No application could be identified"),
        ])
        .mock_extractions(vec![json!(null)]);

    ctx.run().await.unwrap();
    let state = ctx.output.state();

    assert_eq!(state.history[4], Turn::assistant("application_name=application_not_found"));
    let actual = ctx.output.tool_calls()[1].arguments["application_name"].clone();
    assert_eq!(actual, json!("application_not_found"));
}

#[tokio::test]
async fn test_extraction_sees_ticket_observation_and_payload_precedes_log_phase() {
    let mut ctx = TestContext::ticket("INC12345")
        .mock_assistant_responses(vec![
            ticket_lookup("INC12345"),
            log_lookup("transaction-api"),
            AssistantTurn::new("OutOfMemoryError"),
        ])
        .mock_extractions(vec![json!({"application_name": "transaction-api"})]);

    ctx.run().await.unwrap();
    let state = ctx.output.state();
    let payload = state.captured_ticket_payload.clone().unwrap();

    // Extraction receives the whole conversation up to the ticket result
    let extraction = &ctx.output.extract_histories[0];
    assert_eq!(extraction.as_slice(), &state.history[..4]);
    let observation = extraction.last().and_then(Turn::as_observation).unwrap();
    assert_eq!(observation.call_id.as_str(), "toolu_ticket");
    assert_eq!(observation.content, payload);

    // The first log-phase call already follows the captured ticket payload
    let first_log_call = &ctx.output.chat_histories[1];
    assert_eq!(first_log_call.last(), Some(&Turn::user(LOG_ANALYSIS_REQUEST)));
    assert!(!payload.is_empty());
    assert!(
        first_log_call
            .iter()
            .filter_map(Turn::as_observation)
            .any(|observation| observation.content == payload)
    );
}

#[tokio::test]
async fn test_observation_correlates_with_request() {
    let mut ctx = TestContext::ticket("INC12345")
        .mock_assistant_responses(vec![
            ticket_lookup("INC12345"),
            log_lookup("transaction-api"),
            AssistantTurn::new("summary"),
        ])
        .mock_extractions(vec![json!({"application_name": "transaction-api"})]);

    ctx.run().await.unwrap();
    let state = ctx.output.state();

    for (index, turn) in state.history.iter().enumerate() {
        if let Some(observation) = turn.as_observation() {
            let request = state.history[index - 1].as_assistant().unwrap();
            let call = request.tool_call().unwrap();
            assert_eq!(observation.call_id, call.call_id);
            assert_eq!(observation.name, call.name);
        }
    }
}

#[tokio::test]
async fn test_ticket_answer_without_tool_goes_straight_to_logs() {
    let mut ctx = TestContext::ticket("INC12345").mock_assistant_responses(vec![
        AssistantTurn::new("application_name=transaction-api"),
        AssistantTurn::new("Nothing to report"),
    ]);

    ctx.run().await.unwrap();
    let state = ctx.output.state();

    assert_eq!(state.reasoning_call_count, 2);
    assert_eq!(state.captured_ticket_payload, None);
    assert_eq!(state.issue_summary.as_deref(), Some("Nothing to report"));
    assert_eq!(state.history[3], Turn::user(LOG_ANALYSIS_REQUEST));
}

#[tokio::test]
async fn test_log_phase_loops_until_text_answer() {
    let mut ctx = TestContext::ticket("INC12345")
        .mock_assistant_responses(vec![
            ticket_lookup("INC12345"),
            log_lookup("transaction-api"),
            AssistantTurn::new("looking again"),
            log_lookup("transaction-api"),
            log_lookup("transaction-api"),
            AssistantTurn::new("OutOfMemoryError confirmed"),
        ])
        .mock_extractions(vec![json!({"application_name": "transaction-api"})]);

    ctx.run().await.unwrap();
    let state = ctx.output.state();

    assert_eq!(state.reasoning_call_count, 6);
    assert_eq!(state.issue_summary.as_deref(), Some("OutOfMemoryError confirmed"));

    // The analysis request is only added when the log phase starts
    let requests = state
        .history
        .iter()
        .filter(|turn| **turn == Turn::user(LOG_ANALYSIS_REQUEST))
        .count();
    assert_eq!(requests, 1);
}

#[tokio::test]
async fn test_reasoning_calls_match_oracle_invocations() {
    let mut ctx = TestContext::ticket("INC123456")
        .mock_assistant_responses(vec![
            ticket_lookup("INC123456"),
            log_lookup("order-api"),
            AssistantTurn::new("done"),
        ])
        .mock_extractions(vec![json!({"application_name": "order-api"})]);

    ctx.run().await.unwrap();

    let chats = ctx.output.chat_histories.len() as u64;
    assert_eq!(ctx.output.state().reasoning_call_count, chats + 1);
}

#[tokio::test]
async fn test_oracle_sees_synthetic_request_and_both_tools() {
    let mut ctx = TestContext::ticket("INC12345")
        .mock_assistant_responses(vec![
            ticket_lookup("INC12345"),
            AssistantTurn::new("done"),
        ])
        .mock_extractions(vec![json!({"application_name": "transaction-api"})]);

    ctx.run().await.unwrap();

    let actual = ctx.output.chat_histories[1].last().cloned();
    assert_eq!(actual, Some(Turn::user(LOG_ANALYSIS_REQUEST)));

    let expected = vec!["get_ticket_details".to_string(), "get_log_details".to_string()];
    for tools in &ctx.output.bound_tools {
        assert_eq!(tools, &expected);
    }
}

#[tokio::test]
async fn test_only_first_tool_call_is_executed() {
    let mut first = ticket_lookup("INC12345");
    first.tool_calls.push(
        triage_domain::ToolCallFull::new("get_log_details", "toolu_extra")
            .arguments(json!({"application_name": "order-api"})),
    );
    let mut ctx = TestContext::ticket("INC12345")
        .mock_assistant_responses(vec![first, AssistantTurn::new("done")])
        .mock_extractions(vec![json!({"application_name": "transaction-api"})]);

    ctx.run().await.unwrap();
    let state = ctx.output.state();

    let observations: Vec<_> = state.history.iter().filter_map(Turn::as_observation).collect();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].call_id.as_str(), "toolu_ticket");
}

#[tokio::test]
async fn test_unknown_tool_is_fatal() {
    let mut ctx = TestContext::ticket("INC12345").mock_assistant_responses(vec![tool_request(
        "get_weather",
        "toolu_1",
        json!({}),
    )]);

    let actual = ctx.run().await.unwrap_err();

    assert!(matches!(
        actual.downcast_ref::<Error>(),
        Some(Error::ToolNotFound(name)) if name.as_str() == "get_weather"
    ));
    assert!(ctx.output.state.is_none());
}

#[tokio::test]
async fn test_oracle_failure_is_fatal() {
    let mut ctx = TestContext::ticket("INC12345").mock_assistant_responses(vec![ticket_lookup(
        "INC12345",
    )]);

    // No extraction scripted, so the extraction call fails
    let actual = ctx.run().await.unwrap_err();

    assert!(format!("{actual:#}").contains("No scripted extraction for TicketDetails"));
    assert!(ctx.output.state.is_none());
}

#[tokio::test]
async fn test_iteration_limit_stops_runaway_log_loop() {
    let mut ctx = TestContext::ticket("INC12345")
        .mock_assistant_responses(vec![
            ticket_lookup("INC12345"),
            log_lookup("transaction-api"),
            log_lookup("transaction-api"),
        ])
        .mock_extractions(vec![json!({"application_name": "transaction-api"})])
        .max_iterations(1usize);

    let actual = ctx.run().await.unwrap_err();

    assert!(matches!(
        actual.downcast_ref::<Error>(),
        Some(Error::IterationLimitReached { phase: Phase::Log, limit: 1 })
    ));
}

#[tokio::test]
async fn test_unregistered_tool_definition_rejected_before_any_call() {
    let mut ctx = TestContext::ticket("INC12345")
        .mock_assistant_responses(vec![AssistantTurn::new("unused")])
        .tools(vec![
            ToolDefinition::new("get_ticket_details"),
            ToolDefinition::new("get_weather"),
        ]);

    let actual = ctx.run().await.unwrap_err();

    assert!(matches!(
        actual.downcast_ref::<Error>(),
        Some(Error::UnregisteredTool(name)) if name.as_str() == "get_weather"
    ));
    assert!(ctx.output.chat_histories.is_empty());
}
