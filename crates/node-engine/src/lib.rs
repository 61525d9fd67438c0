//! Node Engine - document model and runtime for Miniboard mini-apps
//!
//! A mini-app is a small document: UI components laid out on pages, plus a
//! node graph that gives them behavior. This crate provides:
//!
//! - The document model ([`MiniApp`]) with JSON validation and an on-disk store
//! - A catalog of node types, collected at link time through [`DescriptorFn`]
//! - The [`Runtime`] that interprets a document's graph: exec pins are pushed,
//!   data pins are pulled on demand
//! - Host capability traits (storage, HTTP, clipboard, ...) so the runtime
//!   never touches the outside world directly
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use node_engine::{deserialize_app, HostServices, Runtime, UiStateCallbacks};
//!
//! let app = deserialize_app(&json)?;
//! let ui = UiStateCallbacks::new();
//! let runtime = Runtime::new(&app, Arc::new(ui.clone()), HostServices::default());
//! runtime.start().await;
//! ```

pub mod descriptor;
pub mod error;
pub mod events;
pub mod host;
pub mod kind;
pub mod registry;
pub mod runtime;
pub mod store;
pub mod types;
pub mod ui;
pub mod validation;

// Re-export key types
pub use descriptor::{
    pins, DescriptorFn, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType,
    PropertyKind, PropertySchema,
};
pub use error::{HostError, NodeEngineError, Result};
pub use events::{ChannelEventSink, EventSink, NullEventSink, RuntimeEvent, UiIntent, VecEventSink};
pub use host::{
    Battery, BatteryStatus, ChatService, Clipboard, DefaultCallbacks, GeoPosition, Geolocation,
    HostResult, HostServices, HttpProxy, KeyValueStore, MemoryStore, NotificationPermission,
    Notifier, ProxyRequest, ProxyResponse, UiCallbacks, Unavailable,
};
pub use kind::{canonical_type_name, NodeKind};
pub use registry::NodeRegistry;
pub use runtime::{LogEntry, NodeRuntimeState, RunState, Runtime, RuntimeOptions};
pub use store::{safe_id, AppStore, AppSummary};
pub use types::{
    Canvas, Connection, DisplayMode, Layer, MiniApp, NodeInstance, Page, PinRef, Size,
    UiComponent, UiComponentType, DEFAULT_LAYER_ID, DEFAULT_PAGE_ID,
};
pub use ui::{ComponentOverride, UiState, UiStateCallbacks};
pub use validation::{
    app_from_value, deserialize_app, lint_app, serialize_app, validate_document, ValidationIssue,
};
