//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod brief_repo;
pub mod execution_log_repo;
pub mod match_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod proposal_repo;

pub use brief_repo::BriefRepo;
pub use execution_log_repo::ExecutionLogRepo;
pub use match_repo::MatchRepo;
pub use notification_repo::NotificationRepo;
pub use profile_repo::ProfileRepo;
pub use proposal_repo::ProposalRepo;
