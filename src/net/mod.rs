//! Networking: credential decoding, the HTTP transport seam, the authorized
//! request client, and typed API bindings.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the only code that touches the browser's HTTP stack.
//! `client` layers the bearer hook and cancellation on top of it, and `api`
//! names the endpoints. `credential` is shared with the session.

pub mod api;
pub mod client;
pub mod credential;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;
