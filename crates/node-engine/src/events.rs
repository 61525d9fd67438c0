//! Event types for observing a running mini-app
//!
//! Events are sent from the runtime to any consumer (a CLI, a test, an
//! editor overlay) to report lifecycle changes, node activity and the UI
//! intents the app emitted.

use serde::{Deserialize, Serialize};

/// Trait for sending runtime events
///
/// This abstracts over the transport mechanism (mpsc channel, log, test
/// buffer) so the runtime can be embedded in different hosts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: RuntimeEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// UI change requested by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UiIntent {
    #[serde(rename_all = "camelCase")]
    SetText { target_id: String, text: String },
    #[serde(rename_all = "camelCase")]
    SetStyle {
        target_id: String,
        property: String,
        value: String,
    },
    Alert { message: String },
    #[serde(rename_all = "camelCase")]
    NavigatePage { page_id: String },
}

/// Events emitted while an app runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuntimeEvent {
    /// `start()` was called
    #[serde(rename_all = "camelCase")]
    Started { app_id: String, epoch: u64 },

    /// `stop()` was called
    #[serde(rename_all = "camelCase")]
    Stopped { app_id: String, epoch: u64 },

    /// A node began executing on an exec chain
    #[serde(rename_all = "camelCase")]
    NodeStarted { node_id: String, node_type: String },

    /// A node's handler failed; its chain halted
    #[serde(rename_all = "camelCase")]
    NodeFailed {
        node_id: String,
        node_type: String,
        error: String,
    },

    /// A runtime log line
    Log { message: String },

    /// A UI intent delivered to the callbacks
    Ui(UiIntent),
}

impl RuntimeEvent {
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
        }
    }

    pub fn node_failed(node_id: &str, node_type: &str, error: impl ToString) -> Self {
        Self::NodeFailed {
            node_id: node_id.to_string(),
            node_type: node_type.to_string(),
            error: error.to_string(),
        }
    }
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: RuntimeEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: parking_lot::Mutex<Vec<RuntimeEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<RuntimeEvent> {
        self.events.lock().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: RuntimeEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Forwards events into a tokio channel
pub struct ChannelEventSink {
    tx: tokio::sync::mpsc::UnboundedSender<RuntimeEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<RuntimeEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn send(&self, event: RuntimeEvent) -> Result<(), EventError> {
        self.tx.send(event).map_err(|_| EventError::channel_closed())
    }
}
