//! Route guards.
//!
//! SYSTEM CONTEXT
//! ==============
//! The routing table attaches a guard to each protected entry and evaluates
//! it before the screen is built. Guards only shape navigation; the API
//! still rejects unauthorized calls on its own.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::config::{LANDING_ROUTE, LOGIN_ROUTE};
use crate::state::session::SessionState;

/// Outcome of evaluating a guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Synchronous allow-or-redirect decision over the current session.
pub trait Guard: Sync {
    fn check(&self, state: &SessionState) -> GuardDecision;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Any signed-in identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequireAuth;

impl Guard for RequireAuth {
    fn check(&self, state: &SessionState) -> GuardDecision {
        if state.is_authenticated() {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(LOGIN_ROUTE)
        }
    }

    fn name(&self) -> &'static str {
        "authenticated"
    }
}

/// Signed in with the administrator flag. Known users without it go to the
/// landing page rather than back to sign-in.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequireAdmin;

impl Guard for RequireAdmin {
    fn check(&self, state: &SessionState) -> GuardDecision {
        match state {
            SessionState::Anonymous => GuardDecision::Redirect(LOGIN_ROUTE),
            SessionState::Authenticated(_) if state.is_elevated() => GuardDecision::Allow,
            SessionState::Authenticated(_) => GuardDecision::Redirect(LANDING_ROUTE),
        }
    }

    fn name(&self) -> &'static str {
        "admin"
    }
}

pub static AUTHENTICATED: RequireAuth = RequireAuth;
pub static ADMIN: RequireAdmin = RequireAdmin;
