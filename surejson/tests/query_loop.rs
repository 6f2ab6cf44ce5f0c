//! Retry-loop behavior against a scripted fake transport.
//!
//! Time is paused, so the jittered backoff sleeps advance instantly and the
//! full five-attempt schedule costs no wall time.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bedrock_adapter::{InvokeError, InvokeModel, InvokeRequest};
use serde::Deserialize;
use serde_json::json;
use surejson::{QueryClient, QueryConfig};

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct Answer {
    response: String,
}

/// Fake transport that replays a script of canned outcomes; once the script
/// runs dry it keeps failing with a transport error.
#[derive(Clone)]
struct ScriptedInvoker {
    inner: Arc<Inner>,
}

struct Inner {
    calls: AtomicU32,
    script: Mutex<VecDeque<Result<Vec<u8>, InvokeError>>>,
}

impl ScriptedInvoker {
    fn new(script: Vec<Result<Vec<u8>, InvokeError>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                calls: AtomicU32::new(0),
                script: Mutex::new(script.into_iter().collect()),
            }),
        }
    }

    fn calls(&self) -> u32 {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InvokeModel for ScriptedInvoker {
    async fn invoke(&self, _request: &InvokeRequest) -> Result<Vec<u8>, InvokeError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(transport_error()))
    }
}

fn transport_error() -> InvokeError {
    InvokeError::Status {
        status: 500,
        body: "internal".to_string(),
    }
}

fn envelope(text: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({ "content": [{ "type": "text", "text": text }] })).unwrap()
}

fn good_envelope() -> Vec<u8> {
    envelope(r#"{"response": "ok"}"#)
}

#[tokio::test(start_paused = true)]
async fn value_is_returned_once_an_attempt_succeeds() {
    let invoker = ScriptedInvoker::new(vec![
        Err(transport_error()),
        Err(transport_error()),
        Err(transport_error()),
        Err(transport_error()),
        Ok(good_envelope()),
    ]);
    let client = QueryClient::new(invoker.clone());

    let answer: Answer = client.query("Question: test").await.unwrap();

    assert_eq!(answer.response, "ok");
    assert_eq!(invoker.calls(), 5, "success on the final attempt, no extras");
}

#[tokio::test(start_paused = true)]
async fn exhaustion_happens_after_exactly_the_budget() {
    let invoker = ScriptedInvoker::new(vec![]);
    let client = QueryClient::new(invoker.clone());

    let err = client.query::<Answer>("Question: test").await.unwrap_err();

    assert_eq!(err.attempts, 5);
    assert_eq!(invoker.calls(), 5);
    assert_eq!(err.history.len(), 5);
    assert_eq!(err.history[0].attempt_number, 1);
    assert_eq!(err.history[4].attempt_number, 5);
}

#[tokio::test(start_paused = true)]
async fn empty_output_is_retried() {
    let invoker = ScriptedInvoker::new(vec![Ok(envelope("   \n  ")), Ok(good_envelope())]);
    let client = QueryClient::new(invoker.clone());

    let answer: Answer = client.query("Question: test").await.unwrap();

    assert_eq!(answer.response, "ok");
    assert_eq!(invoker.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn output_without_json_is_retried() {
    let invoker = ScriptedInvoker::new(vec![
        Ok(envelope("I'd be happy to help, but I need more detail.")),
        Ok(good_envelope()),
    ]);
    let client = QueryClient::new(invoker.clone());

    let answer: Answer = client.query("Question: test").await.unwrap();

    assert_eq!(answer.response, "ok");
    assert_eq!(invoker.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn undecodable_envelope_is_retried() {
    let invoker = ScriptedInvoker::new(vec![
        Ok(b"<html>502 Bad Gateway</html>".to_vec()),
        Ok(good_envelope()),
    ]);
    let client = QueryClient::new(invoker.clone());

    let answer: Answer = client.query("Question: test").await.unwrap();

    assert_eq!(answer.response, "ok");
    assert_eq!(invoker.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn type_mismatch_is_retried() {
    // First reply is valid JSON but `response` has the wrong type for `Answer`.
    let invoker = ScriptedInvoker::new(vec![
        Ok(envelope(r#"{"response": 17}"#)),
        Ok(good_envelope()),
    ]);
    let client = QueryClient::new(invoker.clone());

    let answer: Answer = client.query("Question: test").await.unwrap();

    assert_eq!(answer.response, "ok");
    assert_eq!(invoker.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn fenced_reply_with_trailing_comma_resolves_end_to_end() {
    let invoker = ScriptedInvoker::new(vec![Ok(envelope(
        "Sure! ```json\n{\"response\": \"hi\", }\n```",
    ))]);
    let client = QueryClient::new(invoker.clone());

    let answer: Answer = client.query("Question: test").await.unwrap();

    assert_eq!(answer.response, "hi");
    assert_eq!(invoker.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn smaller_attempt_budget_is_respected() {
    let invoker = ScriptedInvoker::new(vec![]);
    let config = QueryConfig::new()
        .with_max_attempts(2)
        .with_base_delay(Duration::from_millis(10))
        .with_jitter_cap(Duration::from_millis(50));
    let client = QueryClient::with_config(invoker.clone(), config);

    let err = client.query::<Answer>("Question: test").await.unwrap_err();

    assert_eq!(err.attempts, 2);
    assert_eq!(invoker.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn per_call_token_override_reaches_the_request() {
    #[derive(Clone)]
    struct CaptureInvoker {
        seen: Arc<Mutex<Vec<u32>>>,
    }

    #[async_trait::async_trait]
    impl InvokeModel for CaptureInvoker {
        async fn invoke(&self, request: &InvokeRequest) -> Result<Vec<u8>, InvokeError> {
            self.seen.lock().unwrap().push(request.body.max_tokens);
            Ok(envelope(r#"{"response": "ok"}"#))
        }
    }

    let invoker = CaptureInvoker {
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let client = QueryClient::new(invoker.clone());

    let _: Answer = client.query("Question: test").await.unwrap();
    let _: Answer = client
        .query_with_max_tokens("Question: test", 512)
        .await
        .unwrap();

    assert_eq!(*invoker.seen.lock().unwrap(), vec![2000, 512]);
}
