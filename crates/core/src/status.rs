//! Status state machines for the sponsorship workflow.
//!
//! The database stores statuses as TEXT; these enums are the single place
//! that knows which values exist and which transitions are legal. Callers
//! parse the stored string, ask [`can_transition`](TargetStatus::can_transition)
//! (or the equivalent on the other machines), and reject anything else
//! instead of trusting each call site.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// TargetStatus (proposal_newsletters.status)
// ---------------------------------------------------------------------------

/// Per-newsletter decision state of a sponsorship proposal.
///
/// `Pending` is the only non-terminal state: a join row leaves it exactly
/// once, to either `Accepted` or `Rejected`, and never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Pending,
    Accepted,
    Rejected,
}

impl TargetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetStatus::Pending => "pending",
            TargetStatus::Accepted => "accepted",
            TargetStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(TargetStatus::Pending),
            "accepted" => Ok(TargetStatus::Accepted),
            "rejected" => Ok(TargetStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown target status: {other}"
            ))),
        }
    }

    /// A target may only move out of `Pending`, once.
    pub fn can_transition(self, to: TargetStatus) -> bool {
        matches!(
            (self, to),
            (TargetStatus::Pending, TargetStatus::Accepted)
                | (TargetStatus::Pending, TargetStatus::Rejected)
        )
    }
}

// ---------------------------------------------------------------------------
// ReviewStatus (newsletters.review_status)
// ---------------------------------------------------------------------------

/// Moderation state of a newsletter listing.
///
/// Approval and rejection both return to `InReview` when the owner edits
/// (resubmission), but a listing never flips between `Approved` and
/// `Rejected` without passing through review again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    InReview,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::InReview => "in_review",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "in_review" => Ok(ReviewStatus::InReview),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown review status: {other}"
            ))),
        }
    }

    pub fn can_transition(self, to: ReviewStatus) -> bool {
        match (self, to) {
            (ReviewStatus::InReview, ReviewStatus::Approved) => true,
            (ReviewStatus::InReview, ReviewStatus::Rejected) => true,
            // Owner edits resubmit the listing for review.
            (ReviewStatus::Approved, ReviewStatus::InReview) => true,
            (ReviewStatus::Rejected, ReviewStatus::InReview) => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// EventStatus (calendar_events.status)
// ---------------------------------------------------------------------------

/// Lifecycle state of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "scheduled" => Ok(EventStatus::Scheduled),
            "completed" => Ok(EventStatus::Completed),
            "cancelled" => Ok(EventStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown event status: {other}"
            ))),
        }
    }

    pub fn can_transition(self, to: EventStatus) -> bool {
        matches!(
            (self, to),
            (EventStatus::Scheduled, EventStatus::Completed)
                | (EventStatus::Scheduled, EventStatus::Cancelled)
        )
    }
}

// ---------------------------------------------------------------------------
// CollaborationStatus (derived, never persisted)
// ---------------------------------------------------------------------------

/// Display status of an accepted collaboration, computed from the calendar.
///
/// Derived on every read from the run date and campaign end date; there is
/// no column backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    Scheduled,
    Active,
    Completed,
}

impl CollaborationStatus {
    /// Compute the status of a collaboration for the given day.
    ///
    /// Before the run date the placement is `Scheduled`; from the run date
    /// through the campaign end date it is `Active`; afterwards `Completed`.
    /// If the dates are inconsistent (run date after campaign end), the run
    /// date wins: the placement is `Active` on its run day only.
    pub fn derive(today: NaiveDate, run_date: NaiveDate, campaign_end: NaiveDate) -> Self {
        if today < run_date {
            CollaborationStatus::Scheduled
        } else if today <= campaign_end || today == run_date {
            CollaborationStatus::Active
        } else {
            CollaborationStatus::Completed
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn target_status_leaves_pending_once() {
        assert!(TargetStatus::Pending.can_transition(TargetStatus::Accepted));
        assert!(TargetStatus::Pending.can_transition(TargetStatus::Rejected));
        assert!(!TargetStatus::Accepted.can_transition(TargetStatus::Rejected));
        assert!(!TargetStatus::Accepted.can_transition(TargetStatus::Pending));
        assert!(!TargetStatus::Rejected.can_transition(TargetStatus::Accepted));
        assert!(!TargetStatus::Pending.can_transition(TargetStatus::Pending));
    }

    #[test]
    fn target_status_round_trips() {
        for s in ["pending", "accepted", "rejected"] {
            assert_eq!(TargetStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(TargetStatus::parse("approved").is_err());
    }

    #[test]
    fn review_status_allows_resubmission() {
        assert!(ReviewStatus::InReview.can_transition(ReviewStatus::Approved));
        assert!(ReviewStatus::InReview.can_transition(ReviewStatus::Rejected));
        assert!(ReviewStatus::Approved.can_transition(ReviewStatus::InReview));
        assert!(ReviewStatus::Rejected.can_transition(ReviewStatus::InReview));
    }

    #[test]
    fn review_status_blocks_direct_flips() {
        assert!(!ReviewStatus::Approved.can_transition(ReviewStatus::Rejected));
        assert!(!ReviewStatus::Rejected.can_transition(ReviewStatus::Approved));
        assert!(!ReviewStatus::InReview.can_transition(ReviewStatus::InReview));
    }

    #[test]
    fn event_status_is_terminal_after_scheduled() {
        assert!(EventStatus::Scheduled.can_transition(EventStatus::Completed));
        assert!(EventStatus::Scheduled.can_transition(EventStatus::Cancelled));
        assert!(!EventStatus::Completed.can_transition(EventStatus::Scheduled));
        assert!(!EventStatus::Cancelled.can_transition(EventStatus::Completed));
    }

    #[test]
    fn collaboration_status_windows() {
        let run = d("2025-03-01");
        let end = d("2025-03-31");

        assert_eq!(
            CollaborationStatus::derive(d("2025-02-15"), run, end),
            CollaborationStatus::Scheduled
        );
        assert_eq!(
            CollaborationStatus::derive(d("2025-03-01"), run, end),
            CollaborationStatus::Active
        );
        assert_eq!(
            CollaborationStatus::derive(d("2025-03-31"), run, end),
            CollaborationStatus::Active
        );
        assert_eq!(
            CollaborationStatus::derive(d("2025-04-01"), run, end),
            CollaborationStatus::Completed
        );
    }

    #[test]
    fn collaboration_status_run_date_after_campaign_end() {
        // Inconsistent dates: the run day itself still counts as active.
        let run = d("2025-05-10");
        let end = d("2025-05-01");
        assert_eq!(
            CollaborationStatus::derive(d("2025-05-10"), run, end),
            CollaborationStatus::Active
        );
        assert_eq!(
            CollaborationStatus::derive(d("2025-05-11"), run, end),
            CollaborationStatus::Completed
        );
    }
}
