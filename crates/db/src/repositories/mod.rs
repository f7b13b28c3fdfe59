//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&SqlitePool` as the first argument.

pub mod assessment_repo;
pub mod organization_repo;
pub mod profile_repo;
pub mod response_repo;
pub mod user_repo;

pub use assessment_repo::AssessmentRepo;
pub use organization_repo::OrganizationRepo;
pub use profile_repo::ProfileRepo;
pub use response_repo::ResponseRepo;
pub use user_repo::UserRepo;
