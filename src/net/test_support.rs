//! Test fixtures: scripted transport and unsigned token builders.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;

use super::transport::{PreparedRequest, RawResponse, Transport, TransportError};

/// Expiry far in the future (2100-01-01).
pub const FAR_FUTURE_EXP: i64 = 4_102_444_800;

/// Build a three-segment token whose payload is `claims`. The signature is junk.
pub fn signed_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

/// Authentication response body as the token endpoint returns it.
pub fn auth_payload(username: &str, is_superuser: bool) -> String {
    let access = signed_token(&serde_json::json!({
        "token_type": "access",
        "exp": FAR_FUTURE_EXP,
        "user_id": 1,
        "username": username,
        "is_staff": is_superuser,
        "is_superuser": is_superuser
    }));
    serde_json::json!({ "refresh": format!("refresh-{username}"), "access": access }).to_string()
}

enum Scripted {
    Ready(Result<RawResponse, TransportError>),
    Deferred(oneshot::Receiver<RawResponse>),
}

#[derive(Default)]
struct MockInner {
    requests: Vec<PreparedRequest>,
    responses: VecDeque<Scripted>,
}

/// Transport that records every dispatched request and replays scripted
/// responses in order.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, scripted: Scripted) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .responses
            .push_back(scripted);
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.push(Scripted::Ready(Ok(RawResponse::new(status, body))));
    }

    pub fn fail_network(&self) {
        self.push(Scripted::Ready(Err(TransportError::Network("connection refused".to_owned()))));
    }

    /// Script a response that resolves only when the returned sender fires.
    pub fn deferred(&self) -> oneshot::Sender<RawResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Deferred(rx));
        tx
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).requests.clone()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.requests().pop()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: PreparedRequest) -> LocalBoxFuture<'static, Result<RawResponse, TransportError>> {
        let scripted = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.requests.push(request);
            inner.responses.pop_front()
        };
        match scripted {
            Some(Scripted::Ready(result)) => Box::pin(async move { result }),
            Some(Scripted::Deferred(rx)) => Box::pin(async move {
                rx.await
                    .map_err(|_| TransportError::Network("response dropped".to_owned()))
            }),
            None => Box::pin(async { Err(TransportError::Network("no scripted response".to_owned())) }),
        }
    }
}
