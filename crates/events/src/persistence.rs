//! Background service that persists every bus event to the `events` table.

use std::sync::Arc;

use frames_db::repositories::EventRepo;
use frames_db::DbPool;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::bus::EventBus;

/// Subscribes to the [`EventBus`] and writes each event to the database.
///
/// Persistence is best-effort: a failed insert is logged and the loop keeps
/// going, so a database hiccup never takes the service down.
pub struct EventPersistence {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl EventPersistence {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    /// Run the persistence loop until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut rx = self.bus.subscribe();
        info!("event persistence started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("event persistence shutting down");
                    break;
                }
                received = rx.recv() => {
                    match received {
                        Ok(event) => {
                            let result = EventRepo::insert(
                                &self.pool,
                                &event.event_type,
                                event.source_entity_type.as_deref(),
                                event.source_entity_id,
                                event.actor_user_id,
                                &event.payload,
                            )
                            .await;

                            match result {
                                Ok(id) => {
                                    debug!(event_type = %event.event_type, event_id = id, "event persisted");
                                }
                                Err(err) => {
                                    error!(event_type = %event.event_type, error = %err, "failed to persist event");
                                }
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "event persistence lagged behind the bus");
                        }
                        Err(RecvError::Closed) => {
                            info!("event bus closed, stopping persistence");
                            break;
                        }
                    }
                }
            }
        }
    }
}
