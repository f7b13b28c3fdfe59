//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`bootstrap`] -- First-start password provisioning for seeded accounts.

pub mod bootstrap;
pub mod password;
