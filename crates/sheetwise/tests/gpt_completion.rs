//! End-to-end tests for GPT() cells against a mock chat endpoint

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use sheetwise::prelude::*;
use sheetwise::{placeholder_request_id, RequestStatus};
use tokio::runtime::Handle;

fn at(reference: &str) -> CellRef {
    CellRef::parse(reference).unwrap()
}

fn sheet_for(server: &MockServer) -> (Sheet, GptService) {
    let config = GptConfig::default().with_endpoint(server.url("/api/chat"));
    let gpt = GptService::http(config, Handle::current()).unwrap();
    (Sheet::with_engine(Engine::with_gpt(gpt.clone())), gpt)
}

fn request_id(sheet: &Sheet, reference: &str) -> String {
    placeholder_request_id(sheet.value(at(reference)))
        .expect("cell shows a placeholder")
        .to_string()
}

/// Cells asking the same pending question share one request and one HTTP call
#[tokio::test]
async fn test_pending_prompt_is_shared_across_cells() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat").json_body(json!({
                "messages": [{ "role": "user", "content": "What is 2+2?" }]
            }));
            then.status(200).json_body(json!({ "response": "4" }));
        })
        .await;

    let (mut sheet, gpt) = sheet_for(&server);
    sheet.set_input("A1", "What is 2+2?").unwrap();
    let mut requests = sheet.set_input("B1", "=GPT(A1)").unwrap();
    requests.extend(sheet.set_input("B2", "=gpt(\"What is 2+2?\")").unwrap());

    assert_eq!(request_id(&sheet, "B1"), request_id(&sheet, "B2"));
    assert_eq!(gpt.pending_count(), 1);

    let updated = sheet.settle(requests).await;
    assert_eq!(updated, vec![at("B1"), at("B2")]);
    assert_eq!(sheet.value(at("B1")), "4");
    assert_eq!(sheet.value(at("B2")), "4");
    assert_eq!(sheet.formula(at("B1")), Some("=GPT(A1)"));
    mock.assert_hits_async(1).await;
}

/// Once a request has resolved, asking again starts a new one
#[tokio::test]
async fn test_resolved_prompt_gets_new_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "content": "hello" } }]
            }));
        })
        .await;

    let (mut sheet, gpt) = sheet_for(&server);
    let requests = sheet.set_input("A1", "=GPT(\"greet me\")").unwrap();
    let first_id = request_id(&sheet, "A1");
    sheet.settle(requests).await;
    assert_eq!(sheet.value(at("A1")), "hello");

    let requests = sheet.recalculate();
    let second_id = request_id(&sheet, "A1");
    assert_ne!(first_id, second_id);
    sheet.settle(requests).await;

    assert_eq!(sheet.value(at("A1")), "hello");
    assert_eq!(gpt.get(&first_id).unwrap().status, RequestStatus::Completed);
    assert_eq!(gpt.requests().len(), 2);
    mock.assert_hits_async(2).await;
}

/// A failed call ends in #API_ERROR!, status Error, and is not retried
#[tokio::test]
async fn test_failed_call_is_terminal() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(503).body("overloaded");
        })
        .await;

    let (mut sheet, gpt) = sheet_for(&server);
    let mut completions = gpt.subscribe();
    sheet.set_input("A1", "=GPT(\"will fail\")").unwrap();
    let id = request_id(&sheet, "A1");

    let signal = completions.recv().await.unwrap();
    assert_eq!(signal.request_id, id);
    assert_eq!(signal.result, "#API_ERROR!");
    assert_eq!(signal.prompt, "will fail");

    assert_eq!(sheet.apply_completion(&signal), vec![at("A1")]);
    assert_eq!(sheet.value(at("A1")), "#API_ERROR!");

    let request = gpt.get(&id).unwrap();
    assert_eq!(request.status, RequestStatus::Error);
    assert_eq!(request.result.as_deref(), Some("#API_ERROR!"));
    assert!(request.finished_at.is_some());
    assert_eq!(gpt.pending_count(), 0);
    mock.assert_hits_async(1).await;
}

/// Formulas reading a GPT cell keep what they computed from the placeholder
#[tokio::test]
async fn test_dependents_keep_placeholder_result() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200).json_body(json!({ "content": "12" }));
        })
        .await;

    let (mut sheet, gpt) = sheet_for(&server);
    let requests = sheet.set_input("A1", "=GPT(\"a dozen\")").unwrap();
    sheet.set_input("A2", "=A1*2").unwrap();
    assert_eq!(sheet.value(at("A2")), "#ERROR!");

    sheet.settle(requests).await;
    assert_eq!(sheet.value(at("A1")), "12");
    assert_eq!(sheet.value(at("A2")), "#ERROR!");

    assert_eq!(gpt.pending_count(), 0);
}
