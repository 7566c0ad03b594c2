//! Reusable UI components.

pub mod navbar;
