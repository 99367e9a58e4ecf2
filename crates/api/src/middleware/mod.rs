//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- extracts the authenticated user from a JWT
//!   Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireStaff`] -- requires `coach` or `admin`.

pub mod auth;
pub mod rbac;
