//! Well-known domain event-type names.
//!
//! Dot-separated, `entity.verb` form. Every event published on the bus
//! uses one of these so the persistence layer and mailer can match on them.

/// An admin created a sponsorship proposal targeting one or more newsletters.
pub const EVENT_PROPOSAL_CREATED: &str = "proposal.created";

/// A creator accepted a proposal for one of their newsletters.
pub const EVENT_PROPOSAL_ACCEPTED: &str = "proposal.accepted";

/// A creator rejected a proposal for one of their newsletters.
pub const EVENT_PROPOSAL_REJECTED: &str = "proposal.rejected";

/// A newsletter was created or edited and entered review.
pub const EVENT_NEWSLETTER_SUBMITTED: &str = "newsletter.submitted";

/// An admin approved or rejected a newsletter listing.
pub const EVENT_NEWSLETTER_REVIEWED: &str = "newsletter.reviewed";
