//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT.
//! - [`auth::MaybeAuthUser`] -- Same, but yields `None` instead of rejecting.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`ownership::RequireOwner`] -- Requires ownership of the `{id}` resource (or admin).

pub mod auth;
pub mod ownership;
pub mod rbac;
