//! Session context: the single source of truth for who is signed in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once at startup and passed by handle to the request client, the
//! route outlet, and screens. It is the only writer of the token store and of
//! the in-memory session; everyone else reads `signal()` or calls
//! `login`/`logout`.
//!
//! Navigation is signalled, not performed: `login` and `logout` publish a
//! `NavigationRequest` that the router shell turns into a route change.
//!
//! ERROR HANDLING
//! ==============
//! Login failures come back as a classified `LoginError` and leave the
//! session exactly as it was. A persisted credential that fails to decode is
//! treated as absent; it is never reported to the user.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use leptos::prelude::*;

use crate::config::{ClientConfig, LANDING_ROUTE, LOGIN_ROUTE};
use crate::net::credential::{Credential, Identity};
use crate::net::transport::{Method, PreparedRequest, RawResponse, Transport};
use crate::util::token_store::TokenStore;

const TOKEN_PATH: &str = "/api/token/";

/// Anonymous, or authenticated with a well-formed credential.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Credential),
}

impl SessionState {
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(credential) => Some(credential),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.credential().map(Credential::identity)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Authenticated with the administrator flag set.
    pub fn is_elevated(&self) -> bool {
        self.identity().is_some_and(Identity::is_elevated)
    }
}

/// Route change requested by the session. `seq` increases on every request so
/// repeated requests for the same route are still distinguishable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationRequest {
    pub seq: u64,
    pub to: &'static str,
}

/// Classified login failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The API rejected the username/password pair (HTTP 401).
    #[error("invalid username or password")]
    InvalidCredentials,
    /// Network failure, any other status, or an unusable response body.
    #[error("authentication server unavailable")]
    ServerUnavailable,
}

impl LoginError {
    /// Message suitable for showing under the login form.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid username or password.",
            Self::ServerUnavailable => "A server error occurred.",
        }
    }
}

/// Handle to the process-wide session. Clones share the same state.
#[derive(Clone)]
pub struct Session {
    state: RwSignal<SessionState>,
    navigation: RwSignal<Option<NavigationRequest>>,
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn Transport>,
    token_endpoint: Arc<str>,
}

impl Session {
    /// Initialize from whatever the token store holds.
    ///
    /// A decodable credential starts the session authenticated without any
    /// network call; anything else starts it anonymous and leaves the store
    /// untouched.
    pub fn restore(config: &ClientConfig, store: Arc<dyn TokenStore>, transport: Arc<dyn Transport>) -> Self {
        let initial = match store.read() {
            Some(payload) => match Credential::from_payload(&payload) {
                Ok(credential) => {
                    log::debug!("session: restored credential for {}", credential.identity().username);
                    SessionState::Authenticated(credential)
                }
                Err(e) => {
                    log::warn!("session: ignoring persisted credential: {e}");
                    SessionState::Anonymous
                }
            },
            None => SessionState::Anonymous,
        };
        Self {
            state: RwSignal::new(initial),
            navigation: RwSignal::new(None),
            store,
            transport,
            token_endpoint: config.endpoint(TOKEN_PATH).into(),
        }
    }

    /// Reactive, read-only view of the session state.
    pub fn signal(&self) -> ReadSignal<SessionState> {
        self.state.read_only()
    }

    /// Latest navigation request published by `login`/`logout`.
    pub fn navigation(&self) -> ReadSignal<Option<NavigationRequest>> {
        self.navigation.read_only()
    }

    /// Current state without subscribing to changes.
    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.with_untracked(|state| state.identity().cloned())
    }

    /// Exchange a username/password pair for a credential.
    ///
    /// On success the credential is persisted, the session becomes
    /// authenticated, and navigation to the landing route is requested, in
    /// that order and without yielding in between.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::InvalidCredentials`] on HTTP 401 and
    /// [`LoginError::ServerUnavailable`] for every other failure. The session
    /// and token store are unchanged on error.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), LoginError> {
        let request = self.token_request(username, password);
        log::debug!("session: requesting token for {username}");
        let response = self.transport.execute(request).await.map_err(|e| {
            log::warn!("session: login transport failure: {e}");
            LoginError::ServerUnavailable
        })?;
        let credential = credential_from_login_response(&response)?;
        self.install(credential);
        Ok(())
    }

    /// Drop the credential and request navigation to the sign-in route.
    /// Always succeeds; when already anonymous only the navigation is emitted.
    pub fn logout(&self) {
        self.state.set(SessionState::Anonymous);
        self.store.clear();
        self.request_navigation(LOGIN_ROUTE);
    }

    fn token_request(&self, username: &str, password: &str) -> PreparedRequest {
        let mut request = PreparedRequest::new(Method::Post, self.token_endpoint.to_string());
        request.set_header("Content-Type", "application/json".to_owned());
        request.body = Some(serde_json::json!({ "username": username, "password": password }).to_string());
        request
    }

    fn install(&self, credential: Credential) {
        self.store.write(credential.payload());
        log::debug!("session: signed in as {}", credential.identity().username);
        self.state.set(SessionState::Authenticated(credential));
        self.request_navigation(LANDING_ROUTE);
    }

    fn request_navigation(&self, to: &'static str) {
        self.navigation.update(|slot| {
            let seq = slot.map_or(1, |prev| prev.seq + 1);
            *slot = Some(NavigationRequest { seq, to });
        });
    }
}

fn credential_from_login_response(response: &RawResponse) -> Result<Credential, LoginError> {
    if response.status == 401 {
        log::warn!("session: credentials rejected");
        return Err(LoginError::InvalidCredentials);
    }
    if !response.is_success() {
        log::warn!("session: token endpoint returned {}", response.status);
        return Err(LoginError::ServerUnavailable);
    }
    Credential::from_payload(&response.body).map_err(|e| {
        log::warn!("session: unusable token response: {e}");
        LoginError::ServerUnavailable
    })
}
