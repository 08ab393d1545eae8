use std::sync::Arc;

use anyhow::Result;
use esco_highlight::LabelEntry;
use esco_scoring::{
    ChatClient, ChatMessage, JobBoard, JobKey, JobStatus, LmStudioClient, MatchScore, ModelConfig,
    PollPolicy, ScoreRequest, ScoringError, ScoringWorker,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ModelConfig {
    ModelConfig {
        base_url: format!("{}/v1", server.uri()),
        model: Some("test-model".to_string()),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

fn request() -> ScoreRequest {
    ScoreRequest {
        activity_text: "Walk the shelter dogs twice a week".to_string(),
        labels: vec![LabelEntry::new("show empathy", "Caring for animals", "shelter dogs").needed()],
        person_skills: vec!["show empathy".to_string()],
        goal: "I want to go outside more often".to_string(),
        interests: "Pets".to_string(),
        person_index: 0,
    }
}

#[tokio::test]
async fn chat_sends_openai_request() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer lm-studio"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "temperature": 0.0,
            "max_tokens": 2048,
            "messages": [{"role": "user", "content": "ping"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("pong")))
        .expect(1)
        .mount(&server)
        .await;

    let client = LmStudioClient::new(&config_for(&server))?;
    let reply = client.chat(&[ChatMessage::user("ping")], 0.0).await?;
    assert_eq!(reply, "pong");
    Ok(())
}

#[tokio::test]
async fn chat_reports_http_errors() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model is loading"))
        .mount(&server)
        .await;

    let client = LmStudioClient::new(&config_for(&server))?;
    let err = client
        .chat(&[ChatMessage::user("ping")], 0.0)
        .await
        .unwrap_err();
    match err {
        ScoringError::Http { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "model is loading");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn chat_without_choices_is_empty_response() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = LmStudioClient::new(&config_for(&server))?;
    let err = client
        .chat(&[ChatMessage::user("ping")], 0.0)
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::EmptyResponse));
    Ok(())
}

#[tokio::test]
async fn worker_scores_fenced_reply() -> Result<()> {
    let server = MockServer::start().await;
    let reply = "```json\n{\"score\": 0.86, \"explanation\": \"## Strong match\", \
                 \"explanation_short\": \"Strong match (score: 0.86).\", \"recommend\": true}\n```";
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply)))
        .mount(&server)
        .await;

    let worker = ScoringWorker::new(Arc::new(LmStudioClient::new(&config_for(&server))?));
    let score = worker.score(&request()).await;
    assert_eq!(
        score,
        MatchScore {
            score: 0.86,
            explanation: "## Strong match".to_string(),
            explanation_short: "Strong match (score: 0.86).".to_string(),
            recommend: true,
        }
    );
    assert_eq!(score.percent(), 86.0);
    Ok(())
}

#[tokio::test]
async fn worker_falls_back_when_server_fails() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let worker = ScoringWorker::new(Arc::new(LmStudioClient::new(&config_for(&server))?));
    assert_eq!(worker.score(&request()).await, MatchScore::fallback());
    Ok(())
}

#[tokio::test]
async fn job_board_scores_in_background() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(r#"{"score": 0.4, "explanation": "partial"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let worker = ScoringWorker::new(Arc::new(LmStudioClient::new(&config_for(&server))?));
    let mut board = JobBoard::new(worker);
    let key = JobKey::new(7, 0);
    assert!(board.submit(key, request()));
    assert!(!board.submit(key, request()));

    let policy = PollPolicy {
        interval_ms: 10,
        max_attempts: 300,
    };
    let status = board.wait(key, policy).await;
    let JobStatus::Done(score) = status else {
        panic!("job did not finish: {status:?}");
    };
    assert_eq!(score.score, 0.4);
    assert_eq!(score.explanation, "partial");
    Ok(())
}
