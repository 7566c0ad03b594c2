//! Admin console screens. Every route here sits behind the admin guard.

pub mod branch_layout;
pub mod branches;
pub mod employees;
pub(crate) mod forms;
pub mod requests;
pub mod trucks;
