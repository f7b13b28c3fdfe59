//! Domain logic for the risk-management maturity tracker.
//!
//! Everything in this crate is pure: catalog parsing, completeness
//! checks, certification, report aggregation and recommendation rules
//! operate on data pre-loaded by the caller. Persistence lives in
//! `prisma_db`, HTTP glue in `prisma_api`.

pub mod catalog;
pub mod error;
pub mod maturity;
pub mod permissions;
pub mod ranking;
pub mod recommendation;
pub mod report;
pub mod seal;
pub mod types;
pub mod validation;
