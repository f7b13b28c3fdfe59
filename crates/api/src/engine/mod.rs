//! Maturity evaluation engine.
//!
//! Loads organization evidence from the database once per request and
//! feeds it to the pure certification and reporting functions of
//! `prisma_core`.

pub mod maturity;
pub mod report;

pub use maturity::MaturityService;
