//! HTTP-level tests for the Groq completion client against a wiremock provider.
//!
//! Verifies the exact outbound request (URL, auth header, fixed sampling
//! parameters) and the error classification of provider failures.

use serde_json::json;
use storyrelay::{
    config::LlmSettings,
    error::AppError,
    llm::{CompletionClient, GroqClient},
    prompts::{build_conversation, title_system_prompt},
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, api_key: Option<&str>) -> GroqClient {
    let settings = LlmSettings::new(
        api_key.map(str::to_string),
        Some(format!("{}/openai/v1", server.uri())),
    );
    GroqClient::new(settings).expect("should build client")
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_complete_sends_single_post_with_fixed_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "model": "llama-3.3-70b-versatile",
            "temperature": 0.5,
            "max_tokens": 2000,
            "top_p": 1.0,
            "stream": false,
            "stop": null,
            "messages": [
                {"role": "system", "content": title_system_prompt()},
                {"role": "user", "content": "user_title: Alpha \n user_description: Beta"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"titles": ["A", "B"]}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("gsk_test"));
    let conversation = build_conversation(title_system_prompt(), Some("Alpha"), Some("Beta"));

    let content = client
        .complete(&conversation)
        .await
        .expect("completion should succeed");

    assert_eq!(content, r#"{"titles": ["A", "B"]}"#);
}

#[tokio::test]
async fn test_error_status_is_upstream_http_error_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("gsk_test"));
    let conversation = build_conversation("sys", Some("t"), Some("d"));

    let err = client.complete(&conversation).await.unwrap_err();

    match err {
        AppError::UpstreamHttp { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limit exceeded");
        }
        other => panic!("expected UpstreamHttp, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_upstream_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("gsk_test"));
    let err = client
        .complete(&build_conversation("sys", None, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UpstreamHttp { status: 500, .. }));
}

#[tokio::test]
async fn test_missing_credential_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client
        .complete(&build_conversation("sys", Some("t"), Some("d")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Config(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_envelope_without_choices_is_upstream_response_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("gsk_test"));
    let err = client
        .complete(&build_conversation("sys", Some("t"), Some("d")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UpstreamResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_non_json_envelope_is_upstream_response_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("gsk_test"));
    let err = client
        .complete(&build_conversation("sys", Some("t"), Some("d")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UpstreamResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_provider_is_upstream_unavailable() {
    // Nothing listens on port 1, so the connection is refused.
    let client = GroqClient::new(LlmSettings::new(
        Some("gsk_test".to_string()),
        Some("http://127.0.0.1:1/v1".to_string()),
    ))
    .unwrap();

    let err = client
        .complete(&build_conversation("sys", Some("t"), Some("d")))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AppError::UpstreamUnavailable { .. }),
        "got {:?}",
        err
    );
}

/// Accepts one connection, reads the request, and answers 500 with a body
/// shorter than its declared `Content-Length` before hanging up.
async fn serve_truncated_error(listener: tokio::net::TcpListener) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let (mut socket, _) = listener.accept().await.unwrap();
    let mut request = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&request);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if request.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    socket
        .write_all(
            b"HTTP/1.1 500 Internal Server Error\r\n\
              content-type: text/plain\r\n\
              content-length: 100\r\n\
              \r\n\
              partial",
        )
        .await
        .unwrap();
    socket.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unreadable_error_body_still_reports_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_truncated_error(listener));

    let client = GroqClient::new(LlmSettings::new(
        Some("gsk_test".to_string()),
        Some(format!("http://{}/v1", addr)),
    ))
    .unwrap();

    let err = client
        .complete(&build_conversation("sys", Some("t"), Some("d")))
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        AppError::UpstreamHttp { status, body } => {
            assert_eq!(status, 500);
            assert!(body.is_empty(), "truncated body should be dropped, got {:?}", body);
        }
        other => panic!("expected UpstreamHttp, got {:?}", other),
    }
}
