// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end session tests against a mocked OpenRouter endpoint.

use std::sync::Arc;

use multigpt_agent::ChatSession;
use multigpt_config::model::{ChatConfig, OpenRouterConfig, RoutingConfig};
use multigpt_core::{ConversationStore, ModelSelection, Role};
use multigpt_openrouter::OpenRouterProvider;
use multigpt_router::QueryRouter;
use multigpt_storage::MemoryStore;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(chunks: &[&str]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        let frame = serde_json::json!({"choices": [{"delta": {"content": chunk}}]});
        body.push_str(&format!("data: {frame}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn session_for(server: &MockServer, api_key: Option<&str>) -> (ChatSession, Arc<MemoryStore>) {
    let config = OpenRouterConfig {
        base_url: server.uri(),
        ..OpenRouterConfig::default()
    };
    let provider = Arc::new(
        OpenRouterProvider::from_parts(&config, api_key.map(str::to_string)).unwrap(),
    );
    let router = Arc::new(QueryRouter::from_config(
        &RoutingConfig::default(),
        provider.clone(),
    ));
    let store = Arc::new(MemoryStore::new());
    let session = ChatSession::new(provider, router, store.clone(), &ChatConfig::default());
    (session, store)
}

#[tokio::test]
async fn auto_mode_keyword_route_streams_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-or-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "nvidia/nemotron-3-nano-30b-a3b:free",
            "stream": true,
            "messages": [{"role": "user", "content": "debug this python function"}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&["Add ", "a print ", "statement."])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (mut session, store) = session_for(&server, Some("sk-or-test"));

    let mut live = String::new();
    let mut observer = |chunk: &str| live.push_str(chunk);
    let outcome = session
        .send("debug this python function", Some(&mut observer))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(live, "Add a print statement.");
    assert_eq!(outcome.reply, live);
    assert_eq!(outcome.model, "nvidia/nemotron-3-nano-30b-a3b:free");

    let chat_id = session.chat().unwrap().id.clone();
    let stored = store.list_messages(&chat_id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].role, Role::Assistant);
    assert_eq!(stored[1].content, "Add a print statement.");
}

#[tokio::test]
async fn auto_mode_model_assisted_route() {
    let server = MockServer::start().await;

    // Auxiliary routing call: non-streamed, temperature 0, fast model.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "google/gemma-3-4b-it:free",
            "stream": false,
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content": "google/gemma-3-27b-it:free please use this"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "google/gemma-3-27b-it:free",
            "stream": true
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&["Nothing ", "happens."])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (mut session, _store) = session_for(&server, Some("sk-or-test"));
    let outcome = session.send("xyzzy plugh", None).await.unwrap().unwrap();

    assert_eq!(outcome.model, "google/gemma-3-27b-it:free");
    assert_eq!(
        outcome.routing.unwrap().reason,
        "AI-selected best model for this query"
    );
    assert_eq!(outcome.reply, "Nothing happens.");
}

#[tokio::test]
async fn auxiliary_failure_falls_back_to_default_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"stream": false})))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "model": "google/gemma-3-12b-it:free",
            "stream": true
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&["fallback"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (mut session, _store) = session_for(&server, Some("sk-or-test"));
    let outcome = session.send("xyzzy plugh", None).await.unwrap().unwrap();

    assert_eq!(outcome.model, "google/gemma-3-12b-it:free");
    assert_eq!(
        outcome.routing.unwrap().reason,
        "General purpose model for balanced response"
    );
    assert!(!outcome.failed);
}

#[tokio::test]
async fn upstream_error_shows_inline_notice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"message": "Rate limit exceeded", "code": 429}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut session, store) = session_for(&server, Some("sk-or-test"));
    session.set_selection(ModelSelection::Fixed("z-ai/glm-4.5-air:free".into()));
    let outcome = session.send("hello", None).await.unwrap().unwrap();

    assert!(outcome.failed);
    assert_eq!(
        outcome.reply,
        "Error from z-ai/glm-4.5-air:free: Rate limit exceeded"
    );
    let chat_id = session.chat().unwrap().id.clone();
    assert_eq!(store.list_messages(&chat_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_key_yields_error_turn_without_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (mut session, _store) = session_for(&server, None);
    session.set_selection(ModelSelection::Fixed("google/gemma-3-4b-it:free".into()));
    let outcome = session.send("hi", None).await.unwrap().unwrap();

    assert!(outcome.failed);
    assert!(outcome.reply.starts_with("Error from google/gemma-3-4b-it:free: OpenRouter API key"));
}
