//! Identity and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from the `X-User-Email` header.
//! - [`rbac`] -- Wrappers that additionally require one profile permission.

pub mod auth;
pub mod rbac;
