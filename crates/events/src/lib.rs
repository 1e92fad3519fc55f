//! Frames event bus and notification infrastructure.
//!
//! Building blocks for everything that happens off the request path:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical domain event envelope.
//! - [`EventPersistence`] — background service that durably writes every
//!   event to the `events` table.
//! - [`delivery`] — SMTP email delivery.
//! - [`RateLimiter`] — token-bucket pacing for outbound email.
//! - [`ProposalMailer`] — background service that fans proposal
//!   notifications out to targeted newsletter owners.

pub mod bus;
pub mod delivery;
pub mod limiter;
pub mod mailer;
pub mod persistence;

pub use bus::{DomainEvent, EventBus};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use limiter::RateLimiter;
pub use mailer::ProposalMailer;
pub use persistence::EventPersistence;
