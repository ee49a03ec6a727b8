use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatbot_cell::models::ChatRequest;
use chatbot_cell::services::ChatService;
use shared_database::memory::MemoryStore;
use shared_models::error::AppError;
use shared_utils::state::AppState;
use shared_utils::test_utils::test_config;

async fn state_for(server: &MockServer, api_key: &str) -> Arc<AppState> {
    let mut config = test_config();
    config.chat_api_url = format!("{}/generate", server.uri());
    config.chat_api_key = api_key.to_string();
    Arc::new(AppState::new(config, Arc::new(MemoryStore::new())).unwrap())
}

fn ask(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
    }
}

#[tokio::test]
async fn returns_first_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(query_param("key", "test-chat-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Drink fluids and rest."}]}},
                {"content": {"parts": [{"text": "second candidate"}]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = state_for(&server, "test-chat-key").await;
    let response = ChatService::new(&state)
        .ask(ask("what helps with a cold?"))
        .await
        .unwrap();
    assert_eq!(response.reply, "Drink fluids and rest.");
}

#[tokio::test]
async fn missing_key_is_internal_and_skips_the_network() {
    let server = MockServer::start().await;
    let state = state_for(&server, "").await;

    assert_matches!(
        ChatService::new(&state).ask(ask("hello")).await,
        Err(AppError::Internal(_))
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let server = MockServer::start().await;
    let state = state_for(&server, "test-chat-key").await;

    assert_matches!(
        ChatService::new(&state).ask(ask("   ")).await,
        Err(AppError::Validation(_))
    );
}

#[tokio::test]
async fn provider_error_status_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = state_for(&server, "test-chat-key").await;
    assert_matches!(
        ChatService::new(&state).ask(ask("hello")).await,
        Err(AppError::Upstream(_))
    );
}

#[tokio::test]
async fn empty_candidates_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let state = state_for(&server, "test-chat-key").await;
    assert_matches!(
        ChatService::new(&state).ask(ask("hello")).await,
        Err(AppError::Upstream(_))
    );
}

#[tokio::test]
async fn blocked_prompt_is_a_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let state = state_for(&server, "test-chat-key").await;
    assert_matches!(
        ChatService::new(&state).ask(ask("something unsafe")).await,
        Err(AppError::Validation(_))
    );
}
