//! Host configuration
//!
//! Loaded from a JSON file; every field has a default so a partial (or
//! missing) file is fine.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use node_engine::{GeoPosition, HostServices, MemoryStore, NotificationPermission, Result};

use crate::constants::defaults;
use crate::device::{LogNotifier, MemoryClipboard, StaticGeolocation, SysfsBattery};
use crate::http::{HttpChatService, ReqwestProxy};
use crate::kv::JsonFileStore;

/// Outbound HTTP policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProxyConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Allow requests to loopback and private network addresses
    pub allow_private_hosts: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::PROXY_TIMEOUT_SECS,
            user_agent: defaults::USER_AGENT.to_string(),
            allow_private_hosts: false,
        }
    }
}

impl ProxyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    pub proxy: ProxyConfig,
    /// Chat backend URL; `None` leaves the chat capability unavailable
    pub chat_endpoint: Option<String>,
    /// Key/value store file; `None` keeps storage in memory
    pub store_path: Option<PathBuf>,
    /// Fixed position reported to get-location; `None` means no GPS
    pub location: Option<GeoPosition>,
    /// Starting notification permission. `default` is granted on first request.
    pub notification_permission: NotificationPermission,
    pub battery_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig::default(),
            chat_endpoint: Some(defaults::CHAT_ENDPOINT.to_string()),
            store_path: None,
            location: None,
            notification_permission: NotificationPermission::Default,
            battery_dir: PathBuf::from(defaults::BATTERY_DIR),
        }
    }
}

impl HostConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        log::debug!("Loaded host config from {:?}", path);
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No host config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Build the capability bundle this config describes
    pub fn build_services(&self) -> Result<HostServices> {
        let mut services = HostServices::default()
            .with_http(Arc::new(ReqwestProxy::new(self.proxy.clone())?))
            .with_clipboard(Arc::new(MemoryClipboard::new()))
            .with_battery(Arc::new(SysfsBattery::new(&self.battery_dir)))
            .with_notifier(Arc::new(LogNotifier::new(self.notification_permission)));

        services = match &self.store_path {
            Some(path) => services.with_storage(Arc::new(JsonFileStore::new(path))),
            None => services.with_storage(Arc::new(MemoryStore::new())),
        };
        if let Some(endpoint) = &self.chat_endpoint {
            services = services.with_chat(Arc::new(HttpChatService::new(endpoint)?));
        }
        if let Some(position) = self.location {
            services = services.with_geolocation(Arc::new(StaticGeolocation::new(position)));
        }
        Ok(services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: HostConfig = serde_json::from_str(
            r#"{ "proxy": { "allowPrivateHosts": true }, "location": { "lat": 1.5, "lon": 2.5 } }"#,
        )
        .unwrap();

        assert!(config.proxy.allow_private_hosts);
        assert_eq!(config.proxy.timeout_secs, defaults::PROXY_TIMEOUT_SECS);
        assert_eq!(config.proxy.user_agent, defaults::USER_AGENT);
        assert_eq!(config.location, Some(GeoPosition { lat: 1.5, lon: 2.5 }));
        assert_eq!(config.notification_permission, NotificationPermission::Default);
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.json");
        assert_eq!(HostConfig::load_or_default(&missing).unwrap(), HostConfig::default());

        std::fs::write(&missing, r#"{ "chatEndpoint": null, "notificationPermission": "denied" }"#)
            .unwrap();
        let config = HostConfig::load_or_default(&missing).unwrap();
        assert_eq!(config.chat_endpoint, None);
        assert_eq!(config.notification_permission, NotificationPermission::Denied);

        std::fs::write(&missing, "{ nope").unwrap();
        assert!(HostConfig::load(&missing).is_err());
    }

    #[tokio::test]
    async fn test_build_services_wires_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = HostConfig {
            store_path: Some(dir.path().join("kv.json")),
            chat_endpoint: None,
            ..HostConfig::default()
        };
        let services = config.build_services().unwrap();

        services.storage.set("k", serde_json::json!(1)).await.unwrap();
        assert!(dir.path().join("kv.json").exists());
        assert!(services.chat.chat("hi").await.is_err());
        assert!(services.geolocation.current_position(Duration::from_millis(10)).await.is_err());
    }
}
