//! Request handlers.
//!
//! Each submodule groups the handlers of one resource. Handlers delegate to
//! the repositories in `prisma_db` or to the [`MaturityService`] and map
//! errors via [`AppError`].
//!
//! [`MaturityService`]: crate::engine::MaturityService
//! [`AppError`]: crate::error::AppError

pub mod assessments;
pub mod auth;
pub mod dashboard;
pub mod organizations;
pub mod profiles;
pub mod reports;
pub mod uploads;
pub mod users;
