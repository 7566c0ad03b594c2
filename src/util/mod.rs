//! Utility helpers shared across screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! `token_store` isolates browser storage, `auth` holds the route guards, and
//! `filter` backs the admin table search boxes.

pub mod auth;
pub mod filter;
pub mod token_store;
