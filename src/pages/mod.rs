//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page receives the `Session` and/or `ApiClient` it needs as props,
//! owns one `CancelToken` for its lifetime, and keeps fetched data in
//! `Loadable` signals. Responses that arrive after the page unmounts are
//! dropped by the token and never touch its signals.


pub mod admin;
pub mod login;
pub mod my_requests;
pub mod public;
pub mod register;

use std::future::Future;

use leptos::prelude::*;

use crate::net::client::{ApiError, CancelToken};

/// Remote data as a screen sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Map a finished call to a state. `None` for cancelled calls, which
    /// must leave the screen untouched.
    pub fn from_result(result: Result<T, ApiError>, describe: impl FnOnce(&ApiError) -> String) -> Option<Self> {
        match result {
            Ok(value) => Some(Self::Ready(value)),
            Err(ApiError::Cancelled) => None,
            Err(e) => {
                log::warn!("screen load failed: {e}");
                Some(Self::Failed(describe(&e)))
            }
        }
    }
}

/// Generic text for a failed load.
pub(crate) fn load_error_message(error: &ApiError) -> String {
    if error.is_unauthorized() {
        "Your session has expired. Sign in again.".to_owned()
    } else if error.is_forbidden() {
        "You do not have access to this data.".to_owned()
    } else {
        "Could not load data.".to_owned()
    }
}

/// Write a finished call into `target` unless it was cancelled.
pub(crate) fn settle<T>(target: RwSignal<Loadable<T>>, result: Result<T, ApiError>)
where
    T: Send + Sync + 'static,
{
    if let Some(next) = Loadable::from_result(result, load_error_message) {
        target.set(next);
    }
}

/// Cancel token that fires when the current reactive owner is cleaned up.
pub(crate) fn screen_cancel_token() -> CancelToken {
    let token = CancelToken::new();
    let on_unmount = token.clone();
    on_cleanup(move || on_unmount.cancel());
    token
}

/// Drive a screen task on the browser event loop. Native builds have no
/// event loop; the future is dropped unpolled.
pub(crate) fn spawn<F>(task: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(task);
    #[cfg(not(feature = "csr"))]
    drop(task);
}
