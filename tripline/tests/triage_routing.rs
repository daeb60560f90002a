//! Routing decisions and full triage → agent → runner flows.

use std::sync::Arc;

use tripline::prelude::*;
use tripline::providers::MockCompletion;
use tripline::triage::{GENERAL_AGENT_NAME, MATH_AGENT_NAME};

const TRIAGE_PROMPT: &str = "Is this query math-related or general?";
const TOPIC_PROMPT: &str = "Check if this input is";
const SAFETY_PROMPT: &str = "Check if this output is";

async fn route_with_reply(reply: &str) -> Agent {
    let mock = Arc::new(MockCompletion::new().respond_when(TRIAGE_PROMPT, reply));
    TriageRouter::new(mock).route("some query").await.unwrap()
}

#[tokio::test]
async fn test_math_replies_route_to_math_agent() {
    for reply in ["math", "MATH", "Math.", "  this is maths  "] {
        let agent = route_with_reply(reply).await;
        assert_eq!(agent.name(), MATH_AGENT_NAME, "reply {reply:?}");
        assert_eq!(agent.input_guardrails().len(), 1);
        assert_eq!(agent.output_guardrails().len(), 1);
    }
}

#[tokio::test]
async fn test_other_replies_route_to_general_agent() {
    for reply in ["general", "", "unsure", "GENERAL question"] {
        let agent = route_with_reply(reply).await;
        assert_eq!(agent.name(), GENERAL_AGENT_NAME, "reply {reply:?}");
        assert!(agent.input_guardrails().is_empty());
        assert_eq!(agent.output_guardrails().len(), 1);
    }
}

#[tokio::test]
async fn test_triage_failure_propagates() {
    let mock = Arc::new(MockCompletion::new().fail_when(TRIAGE_PROMPT, "bad api key"));
    let err = TriageRouter::new(mock).route("2+2").await.unwrap_err();
    assert!(matches!(err, Error::Llm(_)));
}

#[tokio::test]
async fn test_end_to_end_math_question() {
    let mock = Arc::new(
        MockCompletion::new()
            .respond_when(TRIAGE_PROMPT, "math")
            .respond_when(TOPIC_PROMPT, "yes, math")
            .respond_when(SAFETY_PROMPT, "yes safe")
            .respond_when("User: What is 2+2?", "4"),
    );
    let router = TriageRouter::new(mock.clone());

    let agent = router.route("What is 2+2?").await.unwrap();
    assert_eq!(agent.name(), MATH_AGENT_NAME);

    let result = Runner::run(&agent, "What is 2+2?").await.unwrap();
    assert_eq!(result.final_output, "4");
    assert_eq!(mock.call_count().await, 4);
}

#[tokio::test]
async fn test_end_to_end_off_topic_math_request_is_blocked() {
    let mock = Arc::new(
        MockCompletion::new()
            .respond_when(TRIAGE_PROMPT, "math")
            .respond_when(TOPIC_PROMPT, "no")
            .with_default("unreachable"),
    );
    let agent = TriageRouter::new(mock.clone()).route("Write a poem").await.unwrap();

    let err = Runner::run(&agent, "Write a poem").await.unwrap_err();
    assert!(err.is_input_blocked());
    assert_eq!(mock.call_count().await, 2);
}

#[tokio::test]
async fn test_end_to_end_general_question_skips_topic_check() {
    let mock = Arc::new(
        MockCompletion::new()
            .respond_when(TRIAGE_PROMPT, "general")
            .respond_when(SAFETY_PROMPT, "Yes")
            .respond_when("User: ", "Paris"),
    );
    let agent = TriageRouter::new(mock.clone())
        .route("Capital of France?")
        .await
        .unwrap();

    let result = Runner::run(&agent, "Capital of France?").await.unwrap();
    assert_eq!(result.agent_name, GENERAL_AGENT_NAME);
    assert_eq!(result.final_output, "Paris");

    let prompts = mock.prompts().await;
    assert!(prompts.iter().all(|p| !p.starts_with(TOPIC_PROMPT)));
    assert_eq!(prompts.len(), 3);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_service() {
    let mock = Arc::new(
        MockCompletion::new()
            .respond_when(TRIAGE_PROMPT, "general")
            .respond_when(SAFETY_PROMPT, "safe")
            .respond_when("User: ", "ok"),
    );
    let router = TriageRouter::new(mock.clone());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let router = router.clone();
            tokio::spawn(async move {
                let query = format!("question {i}");
                let agent = router.route(&query).await?;
                Runner::run(&agent, &query).await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().final_output, "ok");
    }
    assert_eq!(mock.call_count().await, 12);
}
