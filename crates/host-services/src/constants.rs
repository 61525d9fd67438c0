//! Host configuration defaults
//!
//! Single source of truth for timeouts, endpoints and file names used by
//! the concrete host services.

/// Default values for [`HostConfig`](crate::HostConfig)
pub mod defaults {
    /// Outbound proxy request timeout
    pub const PROXY_TIMEOUT_SECS: u64 = 10;
    /// User agent sent with proxied requests unless the node overrides it
    pub const USER_AGENT: &str = "Miniboard/1.0";
    /// Chat backend accepting `{ "prompt": ... }` and answering `{ "response": ... }`
    pub const CHAT_ENDPOINT: &str = "http://127.0.0.1:3001/api/gemini/chat";
    pub const CHAT_TIMEOUT_SECS: u64 = 60;
    /// Key/value store file name inside the data directory
    pub const STORE_FILE: &str = "storage.json";
    /// Linux power supply class directory
    pub const BATTERY_DIR: &str = "/sys/class/power_supply";
}

/// Content types the proxy cares about
pub mod content_types {
    pub const JSON: &str = "application/json";
}
