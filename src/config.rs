//! Build-time client configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! The API base address is baked in at compile time from `ACME_API_URL`
//! (the WASM bundle has no process environment at runtime). Route targets
//! used by the session layer are fixed and not overridable by screens.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Fallback API address used when `ACME_API_URL` is unset at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// `localStorage` entry holding the serialized authentication response.
pub const TOKEN_STORAGE_KEY: &str = "authTokens";

/// Route every successful login lands on.
pub const LANDING_ROUTE: &str = "/";

/// Route every logout (and every unauthenticated redirect) lands on.
pub const LOGIN_ROUTE: &str = "/login";

/// Resolved client configuration shared by the session and request client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    api_base_url: String,
    storage_key: String,
}

impl ClientConfig {
    /// Build a config for an explicit API base address.
    pub fn new(api_base_url: &str) -> Self {
        let trimmed = api_base_url.trim().trim_end_matches('/');
        let api_base_url = if trimmed.is_empty() {
            DEFAULT_API_URL.to_owned()
        } else {
            trimmed.to_owned()
        };
        Self {
            api_base_url,
            storage_key: TOKEN_STORAGE_KEY.to_owned(),
        }
    }

    /// Build the config from the `ACME_API_URL` value captured at compile time.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("ACME_API_URL").unwrap_or(DEFAULT_API_URL))
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Join `path` onto the API base with exactly one `/` between them.
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
