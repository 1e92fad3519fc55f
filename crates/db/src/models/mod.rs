//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod calendar_event;
pub mod newsletter;
pub mod proposal;
pub mod proposal_newsletter;
pub mod role;
pub mod session;
pub mod user;
