//! Change notifications from the store view
//!
//! The store view publishes a [`StoreEvent`] whenever something a renderer
//! shows has changed. It uses `tokio::sync::broadcast`, so any number of
//! renderers can subscribe and a missing subscriber costs nothing.
//!
//! ```text
//! InvoiceStoreView ──▶ EventBus::publish() ──▶ broadcast channel ──▶ renderer(s)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut rx = store.subscribe();
//! store.mount().await;
//!
//! while let Ok(envelope) = rx.recv().await {
//!     redraw(&store, &envelope.event);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Something observable changed in the store view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The collection was fetched at mount
    Loaded { count: usize },
    /// The editor opened, on a blank form or on an existing invoice
    EditorOpened { document_id: Option<String> },
    /// The editor closed
    EditorClosed,
    /// A created invoice was appended to the list
    Created { document_id: String },
    /// An invoice's fields were replaced
    Updated { document_id: String },
    /// An invoice was removed from the list
    Deleted { document_id: String },
}

impl StoreEvent {
    /// Get the action name
    pub fn action(&self) -> &str {
        match self {
            StoreEvent::Loaded { .. } => "loaded",
            StoreEvent::EditorOpened { .. } => "editor_opened",
            StoreEvent::EditorClosed => "editor_closed",
            StoreEvent::Created { .. } => "created",
            StoreEvent::Updated { .. } => "updated",
            StoreEvent::Deleted { .. } => "deleted",
        }
    }

    /// Get the invoice this event is about, if any
    pub fn document_id(&self) -> Option<&str> {
        match self {
            StoreEvent::Created { document_id }
            | StoreEvent::Updated { document_id }
            | StoreEvent::Deleted { document_id } => Some(document_id),
            StoreEvent::EditorOpened { document_id } => document_id.as_deref(),
            StoreEvent::Loaded { .. } | StoreEvent::EditorClosed => None,
        }
    }
}

/// Envelope wrapping a store event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: StoreEvent,
}

impl EventEnvelope {
    pub fn new(event: StoreEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone. Slow receivers past `capacity` get a `Lagged` error on
/// their next `recv()` and should redraw from current state.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to all current subscribers; returns how many will receive it
    pub fn publish(&self, event: StoreEvent) -> usize {
        // send() only errors when nobody is listening
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Events published before this call are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
