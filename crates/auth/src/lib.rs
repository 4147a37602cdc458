//! `stocktrace-auth` — pure authorization boundary.
//!
//! Actor identity is resolved by an external directory service before any core
//! operation runs; this crate only decides what a resolved actor may do.
//! It is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod permissions;
pub mod roles;

pub use authorize::{Actor, AuthzError, OperationAuthorization, authorize};
pub use permissions::Permission;
pub use roles::Role;
