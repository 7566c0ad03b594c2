//! Bearer credential issued by the authentication endpoint.
//!
//! DESIGN
//! ======
//! A `Credential` keeps the authentication response exactly as received so
//! it can be persisted and read back byte-for-byte, alongside the access
//! token and the identity decoded from that token's payload.
//!
//! The payload is decoded locally to read display fields only. The signature
//! is NOT verified here; the API checks it on every call.

#[cfg(test)]
#[path = "credential_test.rs"]
mod credential_test;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Reasons a stored or received credential cannot become an identity.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("authentication response is not valid JSON: {0}")]
    Payload(String),
    #[error("authentication response has no access token")]
    MissingAccessToken,
    #[error("access token is not a three-segment token")]
    MalformedToken,
    #[error("access token payload is not base64url: {0}")]
    Encoding(String),
    #[error("access token claims are invalid: {0}")]
    Claims(String),
}

/// Who the credential says is signed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    /// Administrator flag; gates the admin console.
    pub is_superuser: bool,
    /// Token expiry in seconds since the Unix epoch.
    pub expires_at: i64,
}

impl Identity {
    /// Whether this identity carries administrator privileges.
    pub fn is_elevated(&self) -> bool {
        self.is_superuser
    }

    /// Whether the embedded expiry has passed at `now_secs`.
    ///
    /// Informational only: nothing logs the user out when this turns true.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        now_secs >= self.expires_at
    }
}

#[derive(Deserialize)]
struct Claims {
    username: String,
    is_superuser: bool,
    exp: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_superuser: claims.is_superuser,
            expires_at: claims.exp,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access: Option<String>,
}

/// A well-formed credential: raw response, access token, decoded identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    payload: String,
    access: String,
    identity: Identity,
}

impl Credential {
    /// Parse the authentication response body (`{"access": ..., "refresh": ...}`).
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] if the body is not JSON, lacks an access
    /// token, or the token payload does not decode into an [`Identity`].
    pub fn from_payload(payload: &str) -> Result<Self, CredentialError> {
        let response: TokenResponse =
            serde_json::from_str(payload).map_err(|e| CredentialError::Payload(e.to_string()))?;
        let access = response
            .access
            .filter(|token| !token.is_empty())
            .ok_or(CredentialError::MissingAccessToken)?;
        let identity = decode_identity(&access)?;
        Ok(Self {
            payload: payload.to_owned(),
            access,
            identity,
        })
    }

    /// The response body exactly as the API returned it.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    #[cfg(test)]
    pub(crate) fn access_token(&self) -> &str {
        &self.access
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// `Authorization` header value for this credential.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access)
    }
}

/// Decode the identity embedded in a signed token without verifying it.
///
/// # Errors
///
/// Returns a [`CredentialError`] when the token does not have three segments,
/// the middle segment is not base64url, or the claims are incomplete.
pub fn decode_identity(token: &str) -> Result<Identity, CredentialError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(CredentialError::MalformedToken);
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| CredentialError::Encoding(e.to_string()))?;
    let claims: Claims = serde_json::from_slice(&bytes).map_err(|e| CredentialError::Claims(e.to_string()))?;
    Ok(claims.into())
}
