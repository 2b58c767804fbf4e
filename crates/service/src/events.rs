//! Mutation events for external subscribers.
//!
//! The catalog core never depends on a consumer being present: publishing is
//! best-effort and a bus with no receivers simply drops the event.

use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { id: i32 },
    Updated { id: i32 },
    Deleted { id: i32 },
}

impl ProductEvent {
    pub fn id(&self) -> i32 {
        match self {
            Self::Created { id } | Self::Updated { id } | Self::Deleted { id } => *id,
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ProductEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Fire-and-forget: an error here only means nobody is listening.
    pub fn publish(&self, event: ProductEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProductEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self { Self::new(64) }
}
