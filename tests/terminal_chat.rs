mod common;

use common::{gateway, StubGenerator};
use financial_assistant::prompts::{GENERIC_FAILURE, GREETING};
use financial_assistant::terminal::run_chat;
use std::time::Duration;

async fn transcript(generator: std::sync::Arc<StubGenerator>, input: &str) -> String {
    transcript_with_timeout(generator, Duration::from_secs(5), input).await
}

async fn transcript_with_timeout(
    generator: std::sync::Arc<StubGenerator>,
    timeout: Duration,
    input: &str,
) -> String {
    let advisor = gateway(generator);
    let mut output: Vec<u8> = Vec::new();

    run_chat(&advisor, timeout, input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn test_greeting_and_questions() {
    let generator = StubGenerator::ok();
    let out = transcript(generator.clone(), "What is a SIP?\nAnd ELSS?\n/quit\nignored\n").await;

    assert!(out.contains(GREETING));
    assert!(out.contains("assistant> answer #1"));
    assert!(out.contains("assistant> answer #2"));

    // Greeting is display-only; second submission carries the first exchange
    let submissions = generator.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].len(), 1);
    assert_eq!(submissions[1].len(), 3);
    assert_eq!(submissions[1][0].text, "What is a SIP?");
}

#[tokio::test]
async fn test_products_command() {
    let out = transcript(StubGenerator::ok(), "/products Low\n/products High 1000\n").await;

    assert!(out.contains("A (Low Risk)"));
    assert!(out.contains("Minimum Investment: ₹500"));
    assert!(!out.contains("B (High Risk)"));
    assert!(out.contains("No products match your criteria."));
}

#[tokio::test]
async fn test_failure_shows_generic_message() {
    let out = transcript(StubGenerator::failing("HTTP 403 bad key"), "hello\n/history\n").await;

    assert!(out.contains(GENERIC_FAILURE));
    assert!(!out.contains("bad key"));
    assert!(out.contains("(no messages yet)"));
}

#[tokio::test]
async fn test_reset_starts_new_session() {
    let generator = StubGenerator::ok();
    transcript(generator.clone(), "first\n/reset\nsecond\n").await;

    let submissions = generator.submissions();
    assert_eq!(submissions[1].len(), 1);
    assert!(submissions[1][0].text.contains("second"));
}

#[tokio::test]
async fn test_slow_answer_times_out_without_recording() {
    let out = transcript_with_timeout(
        StubGenerator::slow(Duration::from_millis(500)),
        Duration::from_millis(20),
        "slow question\n/history\n",
    )
    .await;

    assert!(out.contains(GENERIC_FAILURE));
    assert!(out.contains("(no messages yet)"));
}

#[tokio::test]
async fn test_question_is_sent_as_typed() {
    let generator = StubGenerator::ok();
    transcript(generator.clone(), "  What about  gold?  \n/history\n").await;

    let submissions = generator.submissions();
    assert!(submissions[0][0].text.contains("User Question:   What about  gold?  \n"));
}
