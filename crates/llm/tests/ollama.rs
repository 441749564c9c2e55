//! Wire tests for the Ollama client against a mock server.

use std::time::Duration;

use httpmock::prelude::*;
use salesq_engine::{GenerationError, TextGenerator};
use salesq_llm::OllamaClient;

fn client(server: &MockServer, temperature: Option<f32>) -> OllamaClient {
    OllamaClient::new(server.base_url(), "llama3.1:8b", temperature, Duration::from_secs(5)).unwrap()
}

#[test]
fn test_generate_returns_response_text() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "model": "llama3.1:8b",
                "prompt": "How many products?",
                "stream": false
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "model": "llama3.1:8b",
                "response": "There are 3 products.",
                "done": true
            }));
    });

    let text = client(&server, None).generate("How many products?").unwrap();
    assert_eq!(text, "There are 3 products.");
    mock.assert();
}

#[test]
fn test_generate_sends_temperature_option() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .json_body(serde_json::json!({
                "model": "llama3.1:8b",
                "prompt": "hi",
                "stream": false,
                "options": { "temperature": 0.5 }
            }));
        then.status(200)
            .json_body(serde_json::json!({ "response": "hello" }));
    });

    assert_eq!(client(&server, Some(0.5)).generate("hi").unwrap(), "hello");
    mock.assert();
}

#[test]
fn test_generate_http_error_uses_ollama_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(404)
            .json_body(serde_json::json!({ "error": "model 'llama3.1:8b' not found" }));
    });

    let err = client(&server, None).generate("hi").unwrap_err();
    assert_eq!(
        err,
        GenerationError::Http {
            status: 404,
            message: "model 'llama3.1:8b' not found".to_string(),
        }
    );
}

#[test]
fn test_generate_missing_response_field_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200)
            .json_body(serde_json::json!({ "done": true }));
    });

    let err = client(&server, None).generate("hi").unwrap_err();
    assert!(matches!(err, GenerationError::Malformed(_)), "{err:?}");
}

#[test]
fn test_generate_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(serde_json::json!({ "response": "late" }));
    });

    let slow = OllamaClient::new(server.base_url(), "llama3.1:8b", None, Duration::from_millis(300)).unwrap();
    let err = slow.generate("hi").unwrap_err();
    assert!(matches!(err, GenerationError::Timeout(_)), "{err:?}");
}

#[test]
fn test_unreachable_endpoint() {
    let client = OllamaClient::new("http://127.0.0.1:1", "llama3.1:8b", None, Duration::from_secs(2)).unwrap();
    let err = client.generate("hi").unwrap_err();
    assert!(matches!(err, GenerationError::Unreachable(_)), "{err:?}");
}

#[test]
fn test_ping_lists_models() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(200)
            .json_body(serde_json::json!({
                "models": [
                    { "name": "llama3.1:8b", "size": 4661224676u64 },
                    { "name": "mistral:latest" }
                ]
            }));
    });

    let client = client(&server, None);
    let models = client.ping().unwrap();
    assert_eq!(models, vec!["llama3.1:8b", "mistral:latest"]);
    assert!(client.has_model(&models));
    mock.assert();
}

#[test]
fn test_ping_server_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(500).body("internal error");
    });

    let err = client(&server, None).ping().unwrap_err();
    assert_eq!(
        err,
        GenerationError::Http {
            status: 500,
            message: "internal error".to_string(),
        }
    );
}
