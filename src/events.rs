//! Field-updated notifications
//!
//! Emitted once per successfully written field. Delivery is fire-and-forget:
//! nobody listening, or a lagging listener, never affects a save.

use crate::core::{FieldId, GroupId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{info, trace, warn};

pub const FIELD_UPDATED: &str = "group_profile_field_updated";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdated {
    pub group_id: GroupId,
    pub field_id: FieldId,
    pub value: String,
}

pub trait NotificationBus: Send + Sync {
    fn emit(&self, event_name: &str, payload: &FieldUpdated);
}

/// Fans events out to any number of tokio receivers
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<FieldUpdated>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FieldUpdated> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl NotificationBus for BroadcastNotifier {
    fn emit(&self, event_name: &str, payload: &FieldUpdated) {
        // Err only means there are no receivers right now.
        let delivered = self.sender.send(payload.clone()).unwrap_or(0);
        trace!(
            event = event_name,
            field_id = %payload.field_id,
            group_id = %payload.group_id,
            delivered,
            "emitted field event"
        );
    }
}

/// Logs every received event until the notifier is dropped.
///
/// The task resolves to the number of events it logged.
pub fn spawn_event_logger(mut events: broadcast::Receiver<FieldUpdated>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut logged = 0;
        loop {
            match events.recv().await {
                Ok(event) => {
                    logged += 1;
                    info!(
                        event = FIELD_UPDATED,
                        group_id = %event.group_id,
                        field_id = %event.field_id,
                        "profile field updated"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "field event logger fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        logged
    })
}
