//! Authorized request client shared by every screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `ApiClient` is built at startup and handed to screens by clone; all
//! clones share the same hooks and transport. A single bearer hook, bound to
//! the session signal, stamps `Authorization: Bearer <access>` onto each
//! request while authenticated and strips it while anonymous.
//!
//! DESIGN
//! ======
//! Hooks run inside `RequestBuilder::send`, synchronously, immediately before
//! the transport is invoked. A request therefore carries the session state
//! of the moment it was dispatched, never a state that appears later while
//! it is in flight.
//!
//! ERROR HANDLING
//! ==============
//! 401/403 and every other non-2xx status come back as `ApiError::Status`;
//! the client never logs out, retries, or refreshes on its own.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{AbortHandle, AbortRegistration, Abortable, LocalBoxFuture};
use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::{Method, PreparedRequest, RawResponse, Transport, TransportError};
use crate::config::{ClientConfig, join_url};
use crate::state::session::Session;

const AUTHORIZATION: &str = "Authorization";

/// Failure of an ordinary API call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },
    #[error("response could not be decoded: {0}")]
    Decode(String),
    #[error("request body could not be encoded: {0}")]
    Encode(String),
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Completed HTTP exchange as seen by screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl From<RawResponse> for ApiResponse {
    fn from(raw: RawResponse) -> Self {
        Self {
            status: raw.status,
            body: raw.body,
        }
    }
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Turn any non-2xx status into `ApiError::Status`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] carrying the status and body.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(ApiError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Per-screen cancellation handle.
///
/// Cloneable and shareable across many calls. Once cancelled, every call
/// registered with it resolves to `ApiError::Cancelled` and any later call
/// never reaches the transport.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    calls: Mutex<InFlight>,
}

/// Abort handles of calls still running, keyed by registration id.
#[derive(Debug, Default)]
struct InFlight {
    next_id: u64,
    handles: HashMap<u64, AbortHandle>,
}

/// Releases a call's abort handle once the call finishes or is dropped.
struct Registered {
    token: CancelToken,
    id: u64,
}

impl Drop for Registered {
    fn drop(&mut self) {
        lock(&self.token.inner.calls).handles.remove(&self.id);
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        for (_, handle) in lock(&self.inner.calls).handles.drain() {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Number of registered calls that have not finished yet.
    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        lock(&self.inner.calls).handles.len()
    }

    fn register(&self) -> Option<(Registered, AbortRegistration)> {
        let mut calls = lock(&self.inner.calls);
        // Checked under the lock so `cancel` cannot drain between check and insert.
        if self.is_cancelled() {
            return None;
        }
        let (handle, registration) = AbortHandle::new_pair();
        calls.next_id += 1;
        let id = calls.next_id;
        calls.handles.insert(id, handle);
        let registered = Registered {
            token: self.clone(),
            id,
        };
        Some((registered, registration))
    }
}

/// Mutation applied to every outgoing request just before dispatch.
type RequestHook = Arc<dyn Fn(&mut PreparedRequest) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HookId(u64);

#[derive(Default)]
struct HookRegistry {
    next_id: u64,
    hooks: Vec<(HookId, RequestHook)>,
}

impl HookRegistry {
    fn register(&mut self, hook: RequestHook) -> HookId {
        self.next_id += 1;
        let id = HookId(self.next_id);
        self.hooks.push((id, hook));
        id
    }

    fn eject(&mut self, id: HookId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(existing, _)| *existing != id);
        self.hooks.len() != before
    }

    fn snapshot(&self) -> Vec<RequestHook> {
        self.hooks.iter().map(|(_, hook)| Arc::clone(hook)).collect()
    }
}

struct ClientInner {
    base_url: String,
    transport: Arc<dyn Transport>,
    hooks: Mutex<HookRegistry>,
    session_hook: Mutex<Option<HookId>>,
}

/// Shared HTTP client. Build one per application and clone the handle.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Only `App` builds one; every other holder gets a clone.
    pub(crate) fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base_url: config.api_base_url().to_owned(),
                transport,
                hooks: Mutex::new(HookRegistry::default()),
                session_hook: Mutex::new(None),
            }),
        }
    }

    /// Bind the bearer hook to `session`.
    ///
    /// The hook reads the session at each dispatch rather than capturing the
    /// current credential. Binding again retracts the previous hook first, so
    /// exactly one bearer hook is ever active.
    pub fn attach_session(&self, session: &Session) {
        let state = session.signal();
        let hook: RequestHook = Arc::new(move |request: &mut PreparedRequest| {
            state.with_untracked(|current| match current.credential() {
                Some(credential) => request.set_header(AUTHORIZATION, credential.bearer_header()),
                None => request.remove_header(AUTHORIZATION),
            });
        });

        let mut slot = lock(&self.inner.session_hook);
        let mut hooks = lock(&self.inner.hooks);
        if let Some(previous) = slot.take() {
            hooks.eject(previous);
            log::debug!("api client: retracted previous session hook");
        }
        *slot = Some(hooks.register(hook));
        log::debug!("api client: session hook registered");
    }

    /// Remove the bearer hook; subsequent requests carry no credential.
    #[cfg(test)]
    pub(crate) fn detach_session(&self) {
        let mut slot = lock(&self.inner.session_hook);
        if let Some(previous) = slot.take() {
            lock(&self.inner.hooks).eject(previous);
            log::debug!("api client: session hook retracted");
        }
    }

    pub(crate) fn hook_count(&self) -> usize {
        lock(&self.inner.hooks).hooks.len()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        RequestBuilder {
            client: self.clone(),
            request: PreparedRequest::new(method, join_url(&self.inner.base_url, path)),
            query: Vec::new(),
            cancel: None,
            error: None,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::Get, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::Post, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::Put, path)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.request(Method::Patch, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::Delete, path)
    }

    fn apply_hooks(&self, request: &mut PreparedRequest) {
        let hooks = lock(&self.inner.hooks).snapshot();
        for hook in hooks {
            hook(request);
        }
    }
}

/// A request being assembled. Nothing is sent until [`RequestBuilder::send`].
pub struct RequestBuilder {
    client: ApiClient,
    request: PreparedRequest,
    query: Vec<(String, String)>,
    cancel: Option<CancelToken>,
    error: Option<ApiError>,
}

impl RequestBuilder {
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Serialize `body` as the JSON request body. Encoding errors surface
    /// when the request is sent.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(encoded) => {
                self.request.set_header("Content-Type", "application/json".to_owned());
                self.request.body = Some(encoded);
            }
            Err(e) => self.error = Some(ApiError::Encode(e.to_string())),
        }
        self
    }

    #[must_use]
    pub fn cancel_with(mut self, token: &CancelToken) -> Self {
        self.cancel = Some(token.clone());
        self
    }

    /// Run the hooks and dispatch now; the returned future yields the response.
    pub fn send(self) -> LocalBoxFuture<'static, Result<ApiResponse, ApiError>> {
        let Self {
            client,
            mut request,
            query,
            cancel,
            error,
        } = self;
        if let Some(e) = error {
            return Box::pin(async move { Err(e) });
        }
        if !query.is_empty() {
            request.url = append_query(&request.url, &query);
        }
        client.apply_hooks(&mut request);

        let registration = match &cancel {
            Some(token) => match token.register() {
                Some(registration) => Some(registration),
                None => {
                    log::debug!("api client: {} {} skipped, already cancelled", request.method.as_str(), request.url);
                    return Box::pin(async { Err(ApiError::Cancelled) });
                }
            },
            None => None,
        };
        let label = format!("{} {}", request.method.as_str(), request.url);
        let in_flight = client.inner.transport.execute(request);

        Box::pin(async move {
            let outcome = match registration {
                Some((registered, registration)) => {
                    let outcome = Abortable::new(in_flight, registration).await;
                    drop(registered);
                    outcome.map_err(|_| ApiError::Cancelled)?
                }
                None => in_flight.await,
            };
            if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                log::warn!("api client: discarded response to {label} after cancellation");
                return Err(ApiError::Cancelled);
            }
            Ok(ApiResponse::from(outcome?))
        })
    }

    /// Send, require a 2xx status, and decode the body as `T`.
    pub fn send_json<T: DeserializeOwned + 'static>(self) -> LocalBoxFuture<'static, Result<T, ApiError>> {
        let pending = self.send();
        Box::pin(async move { pending.await?.error_for_status()?.json() })
    }

    /// Send and require a 2xx status, ignoring the body.
    pub fn send_empty(self) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        let pending = self.send();
        Box::pin(async move {
            pending.await?.error_for_status()?;
            Ok(())
        })
    }
}

fn append_query(url: &str, query: &[(String, String)]) -> String {
    let encoded = query
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{encoded}")
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
