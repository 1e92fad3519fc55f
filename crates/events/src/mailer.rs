//! Proposal notification mailer.
//!
//! [`ProposalMailer`] runs as a background task subscribed to the
//! [`EventBus`]. When a sponsorship proposal is created it looks up the
//! owners of every targeted newsletter and emails each of them, pacing the
//! sends through a token-bucket [`RateLimiter`] so a large target list never
//! floods the SMTP relay.

use std::sync::Arc;

use frames_core::events::EVENT_PROPOSAL_CREATED;
use frames_core::types::DbId;
use frames_db::models::newsletter::NewsletterContact;
use frames_db::repositories::NewsletterRepo;
use frames_db::DbPool;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::bus::{DomainEvent, EventBus};
use crate::delivery::email::EmailDelivery;
use crate::limiter::RateLimiter;

/// Default outbound email rate (messages per second).
const DEFAULT_RATE_PER_SEC: f64 = 2.0;

/// Default burst allowance for the limiter.
const DEFAULT_BURST: u32 = 5;

/// Background service that emails newsletter owners about new proposals.
pub struct ProposalMailer {
    pool: DbPool,
    bus: Arc<EventBus>,
    delivery: EmailDelivery,
    limiter: RateLimiter,
}

impl ProposalMailer {
    /// Create a mailer with the default send rate (2/sec, burst 5).
    pub fn new(pool: DbPool, bus: Arc<EventBus>, delivery: EmailDelivery) -> Self {
        Self {
            pool,
            bus,
            delivery,
            limiter: RateLimiter::new(DEFAULT_RATE_PER_SEC, DEFAULT_BURST),
        }
    }

    /// Run the mailer loop until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut rx = self.bus.subscribe();
        info!("proposal mailer started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("proposal mailer shutting down");
                    break;
                }
                received = rx.recv() => {
                    match received {
                        Ok(event) if event.event_type == EVENT_PROPOSAL_CREATED => {
                            self.handle_proposal_created(&event).await;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "proposal mailer lagged behind the bus");
                        }
                        Err(RecvError::Closed) => {
                            info!("event bus closed, stopping proposal mailer");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Notify every targeted newsletter owner about a new proposal.
    ///
    /// Delivery is best-effort: a failed send is logged and the remaining
    /// recipients still get their email.
    async fn handle_proposal_created(&self, event: &DomainEvent) {
        let Some(proposal_id) = event.source_entity_id else {
            warn!("proposal.created event missing source entity id");
            return;
        };

        let newsletter_ids = target_ids_from_payload(&event.payload);
        if newsletter_ids.is_empty() {
            debug!(proposal_id, "proposal.created event has no targets");
            return;
        }

        let contacts = match NewsletterRepo::owner_contacts(&self.pool, &newsletter_ids).await {
            Ok(contacts) => contacts,
            Err(err) => {
                error!(proposal_id, error = %err, "failed to load newsletter contacts");
                return;
            }
        };

        let sponsor_name = event.payload["sponsor_name"].as_str().unwrap_or("A sponsor");
        let mut sent = 0usize;

        for contact in &contacts {
            self.limiter.acquire().await;

            let (subject, body) = proposal_email(sponsor_name, contact, proposal_id);
            match self.delivery.deliver(&contact.owner_email, &subject, &body).await {
                Ok(()) => sent += 1,
                Err(err) => {
                    error!(
                        proposal_id,
                        newsletter_id = contact.newsletter_id,
                        to = %contact.owner_email,
                        error = %err,
                        "failed to send proposal notification"
                    );
                }
            }
        }

        info!(proposal_id, sent, total = contacts.len(), "proposal notifications dispatched");
    }
}

/// Extract `target_newsletter_ids` from an event payload.
fn target_ids_from_payload(payload: &serde_json::Value) -> Vec<DbId> {
    payload["target_newsletter_ids"]
        .as_array()
        .map(|ids| ids.iter().filter_map(|v| v.as_i64()).collect())
        .unwrap_or_default()
}

/// Build the subject and body for a proposal notification email.
fn proposal_email(sponsor_name: &str, contact: &NewsletterContact, proposal_id: DbId) -> (String, String) {
    let subject = format!(
        "[Frames] New sponsorship proposal for {}",
        contact.newsletter_title
    );
    let body = format!(
        "Hello,\n\n\
         {} has sent a sponsorship proposal to your newsletter \"{}\".\n\n\
         Log in to Frames to review the campaign details and accept or \
         decline the proposal (reference #{}).\n\n\
         — The Frames team",
        sponsor_name, contact.newsletter_title, proposal_id
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> NewsletterContact {
        NewsletterContact {
            newsletter_id: 3,
            newsletter_title: "Weekly Dispatch".to_string(),
            owner_user_id: 9,
            owner_email: "owner@example.com".to_string(),
        }
    }

    #[test]
    fn extracts_target_ids_from_payload() {
        let payload = serde_json::json!({"target_newsletter_ids": [1, 2, 3]});
        assert_eq!(target_ids_from_payload(&payload), vec![1, 2, 3]);
    }

    #[test]
    fn missing_target_ids_yields_empty_vec() {
        let payload = serde_json::json!({"something_else": true});
        assert!(target_ids_from_payload(&payload).is_empty());
    }

    #[test]
    fn non_numeric_target_ids_are_skipped() {
        let payload = serde_json::json!({"target_newsletter_ids": [1, "two", 3]});
        assert_eq!(target_ids_from_payload(&payload), vec![1, 3]);
    }

    #[test]
    fn proposal_email_mentions_newsletter_and_sponsor() {
        let (subject, body) = proposal_email("Acme Corp", &contact(), 17);
        assert!(subject.contains("Weekly Dispatch"));
        assert!(body.contains("Acme Corp"));
        assert!(body.contains("#17"));
    }
}
