//! HTTP transport seam beneath the request client.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds: a transport that always reports the network as unavailable,
//! so everything above it can be exercised with scripted transports in tests.
//!
//! ERROR HANDLING
//! ==============
//! Only network-level failures are errors here. Any HTTP status, including
//! 4xx/5xx, is a successful `RawResponse`; interpreting it is left to callers.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::Arc;

use futures::future::LocalBoxFuture;

/// HTTP verbs the API surface uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully built outgoing request: nothing about it changes after dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    pub fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.remove_header(name);
        self.headers.push((name.to_owned(), value));
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request could not be built: {0}")]
    InvalidRequest(String),
}

/// Executes prepared requests. Futures are `!Send`: everything runs on the
/// single UI task queue.
pub trait Transport: Send + Sync {
    fn execute(&self, request: PreparedRequest) -> LocalBoxFuture<'static, Result<RawResponse, TransportError>>;
}

/// Browser `fetch` transport.
#[cfg(feature = "csr")]
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

#[cfg(feature = "csr")]
impl Transport for FetchTransport {
    fn execute(&self, request: PreparedRequest) -> LocalBoxFuture<'static, Result<RawResponse, TransportError>> {
        use gloo_net::http::{Method as HttpMethod, RequestBuilder};

        Box::pin(async move {
            let method = match request.method {
                Method::Get => HttpMethod::GET,
                Method::Post => HttpMethod::POST,
                Method::Put => HttpMethod::PUT,
                Method::Patch => HttpMethod::PATCH,
                Method::Delete => HttpMethod::DELETE,
            };
            let mut builder = RequestBuilder::new(&request.url).method(method);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let built = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            let resp = built.send().await.map_err(|e| TransportError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.map_err(|e| TransportError::Network(e.to_string()))?;
            Ok(RawResponse { status, body })
        })
    }
}

/// Transport for builds without a browser; every call fails as a network error.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableTransport;

impl Transport for UnavailableTransport {
    fn execute(&self, request: PreparedRequest) -> LocalBoxFuture<'static, Result<RawResponse, TransportError>> {
        let message = format!("no transport available for {} {}", request.method.as_str(), request.url);
        Box::pin(async move { Err(TransportError::Network(message)) })
    }
}

/// Transport appropriate for the current build.
pub fn platform_transport() -> Arc<dyn Transport> {
    #[cfg(feature = "csr")]
    {
        Arc::new(FetchTransport)
    }
    #[cfg(not(feature = "csr"))]
    {
        Arc::new(UnavailableTransport)
    }
}
