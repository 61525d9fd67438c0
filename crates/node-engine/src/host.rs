//! Host-facing interfaces
//!
//! The runtime never touches a UI or a device directly. UI intents leave
//! through [`UiCallbacks`]; network, storage and hardware access go through
//! the capability traits bundled in [`HostServices`]. Concrete
//! implementations live in the `host-services` crate; this module ships
//! only an in-memory store and "unavailable" stand-ins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HostError;

/// Result type for host capability calls
pub type HostResult<T> = std::result::Result<T, HostError>;

/// UI intent sink and UI queries
///
/// Every method has a default, so hosts only override what they render.
pub trait UiCallbacks: Send + Sync {
    fn set_text(&self, _target_id: &str, _text: &str) {}

    fn set_style(&self, _target_id: &str, _property: &str, _value: &str) {}

    fn alert(&self, message: &str) {
        log::info!("[alert] {}", message);
    }

    fn log(&self, message: &str) {
        log::info!("[MiniApp] {}", message);
    }

    /// Current text of an input component
    fn get_input_value(&self, _target_id: &str) -> String {
        String::new()
    }

    /// Host-provided variable lookup; not used by the built-in nodes
    fn get_variable(&self, _name: &str) -> Option<Value> {
        None
    }

    fn navigate_page(&self, _page_id: &str) {}
}

/// Callbacks that keep every default
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCallbacks;

impl UiCallbacks for DefaultCallbacks {}

/// Persistent string-keyed store of JSON values
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> HostResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> HostResult<()>;
    async fn remove(&self, key: &str) -> HostResult<()>;
}

/// Request handed to the outbound HTTP proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    /// JSON body; a `Value::String` is sent verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Dot / `[n]` path to extract from a JSON response
    #[serde(default)]
    pub json_path: String,
}

impl ProxyRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            headers: Map::new(),
            body: None,
            json_path: String::new(),
        }
    }
}

/// What the proxy reports back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status: u16,
    #[serde(default)]
    pub status_text: String,
    pub data: Value,
    #[serde(default)]
    pub is_json: bool,
}

#[async_trait]
pub trait HttpProxy: Send + Sync {
    async fn send(&self, request: ProxyRequest) -> HostResult<ProxyResponse>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn read_text(&self) -> HostResult<String>;
    async fn write_text(&self, text: &str) -> HostResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
}

#[async_trait]
pub trait Geolocation: Send + Sync {
    async fn current_position(&self, timeout: Duration) -> HostResult<GeoPosition>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    /// Charge percentage, 0-100
    pub level: u8,
    pub charging: bool,
}

#[async_trait]
pub trait Battery: Send + Sync {
    async fn status(&self) -> HostResult<BatteryStatus>;
}

/// Notification permission as the platform reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Not decided yet; asking is allowed
    #[default]
    Default,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn permission(&self) -> HostResult<NotificationPermission>;
    async fn request_permission(&self) -> HostResult<NotificationPermission>;
    async fn notify(&self, title: &str, body: &str) -> HostResult<()>;
}

/// Prompt in, response text out
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn chat(&self, prompt: &str) -> HostResult<String>;
}

/// Bundle of host capabilities handed to the runtime
#[derive(Clone)]
pub struct HostServices {
    pub storage: Arc<dyn KeyValueStore>,
    pub http: Arc<dyn HttpProxy>,
    pub clipboard: Arc<dyn Clipboard>,
    pub geolocation: Arc<dyn Geolocation>,
    pub battery: Arc<dyn Battery>,
    pub notifier: Arc<dyn Notifier>,
    pub chat: Arc<dyn ChatService>,
}

impl HostServices {
    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_http(mut self, http: Arc<dyn HttpProxy>) -> Self {
        self.http = http;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_geolocation(mut self, geolocation: Arc<dyn Geolocation>) -> Self {
        self.geolocation = geolocation;
        self
    }

    pub fn with_battery(mut self, battery: Arc<dyn Battery>) -> Self {
        self.battery = battery;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_chat(mut self, chat: Arc<dyn ChatService>) -> Self {
        self.chat = chat;
        self
    }
}

impl Default for HostServices {
    /// In-memory storage; every other capability is unavailable
    fn default() -> Self {
        Self {
            storage: Arc::new(MemoryStore::new()),
            http: Arc::new(Unavailable),
            clipboard: Arc::new(Unavailable),
            geolocation: Arc::new(Unavailable),
            battery: Arc::new(Unavailable),
            notifier: Arc::new(Unavailable),
            chat: Arc::new(Unavailable),
        }
    }
}

/// Process-local key/value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> HostResult<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> HostResult<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> HostResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Stand-in for capabilities the host does not provide
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

#[async_trait]
impl KeyValueStore for Unavailable {
    async fn get(&self, _key: &str) -> HostResult<Option<Value>> {
        Err(HostError::Unavailable("storage"))
    }

    async fn set(&self, _key: &str, _value: Value) -> HostResult<()> {
        Err(HostError::Unavailable("storage"))
    }

    async fn remove(&self, _key: &str) -> HostResult<()> {
        Err(HostError::Unavailable("storage"))
    }
}

#[async_trait]
impl HttpProxy for Unavailable {
    async fn send(&self, _request: ProxyRequest) -> HostResult<ProxyResponse> {
        Err(HostError::Unavailable("network"))
    }
}

#[async_trait]
impl Clipboard for Unavailable {
    async fn read_text(&self) -> HostResult<String> {
        Err(HostError::Unavailable("clipboard"))
    }

    async fn write_text(&self, _text: &str) -> HostResult<()> {
        Err(HostError::Unavailable("clipboard"))
    }
}

#[async_trait]
impl Geolocation for Unavailable {
    async fn current_position(&self, _timeout: Duration) -> HostResult<GeoPosition> {
        Err(HostError::Unavailable("geolocation"))
    }
}

#[async_trait]
impl Battery for Unavailable {
    async fn status(&self) -> HostResult<BatteryStatus> {
        Err(HostError::Unavailable("battery"))
    }
}

#[async_trait]
impl Notifier for Unavailable {
    async fn permission(&self) -> HostResult<NotificationPermission> {
        Ok(NotificationPermission::Denied)
    }

    async fn request_permission(&self) -> HostResult<NotificationPermission> {
        Ok(NotificationPermission::Denied)
    }

    async fn notify(&self, _title: &str, _body: &str) -> HostResult<()> {
        Err(HostError::Unavailable("notifications"))
    }
}

#[async_trait]
impl ChatService for Unavailable {
    async fn chat(&self, _prompt: &str) -> HostResult<String> {
        Err(HostError::Unavailable("chat"))
    }
}
