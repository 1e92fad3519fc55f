//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod calendar_event_repo;
pub mod event_repo;
pub mod newsletter_repo;
pub mod proposal_repo;
pub mod proposal_target_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use calendar_event_repo::CalendarEventRepo;
pub use event_repo::EventRepo;
pub use newsletter_repo::NewsletterRepo;
pub use proposal_repo::ProposalRepo;
pub use proposal_target_repo::ProposalTargetRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
