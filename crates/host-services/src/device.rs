//! Device capabilities for a headless host
//!
//! A desktop shell would back these with the platform; here the clipboard
//! is process-local, the position is fixed by configuration, the battery is
//! read from sysfs, and notifications go to the log.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use node_engine::{
    Battery, BatteryStatus, Clipboard, GeoPosition, Geolocation, HostError, HostResult,
    NotificationPermission, Notifier,
};

/// Clipboard shared by every runtime in this process
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn read_text(&self) -> HostResult<String> {
        Ok(self.text.lock().clone())
    }

    async fn write_text(&self, text: &str) -> HostResult<()> {
        *self.text.lock() = text.to_string();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StaticGeolocation {
    position: GeoPosition,
}

impl StaticGeolocation {
    pub fn new(position: GeoPosition) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocation for StaticGeolocation {
    async fn current_position(&self, _timeout: Duration) -> HostResult<GeoPosition> {
        Ok(self.position)
    }
}

/// Reads the first `type == Battery` supply under a power_supply directory
#[derive(Debug, Clone)]
pub struct SysfsBattery {
    dir: PathBuf,
}

impl SysfsBattery {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    async fn read_attr(supply: &Path, name: &str) -> Option<String> {
        tokio::fs::read_to_string(supply.join(name))
            .await
            .ok()
            .map(|s| s.trim().to_string())
    }
}

#[async_trait]
impl Battery for SysfsBattery {
    async fn status(&self) -> HostResult<BatteryStatus> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|_| HostError::Unavailable("battery"))?;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let supply = entry.path();
            if Self::read_attr(&supply, "type").await.as_deref() != Some("Battery") {
                continue;
            }
            let Some(capacity) = Self::read_attr(&supply, "capacity").await else {
                continue;
            };
            let level = capacity
                .parse::<u8>()
                .map_err(|_| HostError::failed(format!("bad capacity '{}'", capacity)))?
                .min(100);
            let charging = matches!(
                Self::read_attr(&supply, "status").await.as_deref(),
                Some("Charging") | Some("Full")
            );
            return Ok(BatteryStatus { level, charging });
        }
        Err(HostError::Unavailable("battery"))
    }
}

/// Notifier that writes to the log
///
/// Starts from the configured permission; a pending (`Default`) permission
/// is granted on the first request.
#[derive(Debug)]
pub struct LogNotifier {
    permission: Mutex<NotificationPermission>,
}

impl LogNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        Self {
            permission: Mutex::new(permission),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn permission(&self) -> HostResult<NotificationPermission> {
        Ok(*self.permission.lock())
    }

    async fn request_permission(&self) -> HostResult<NotificationPermission> {
        let mut permission = self.permission.lock();
        if *permission == NotificationPermission::Default {
            *permission = NotificationPermission::Granted;
        }
        Ok(*permission)
    }

    async fn notify(&self, title: &str, body: &str) -> HostResult<()> {
        if *self.permission.lock() != NotificationPermission::Granted {
            return Err(HostError::PermissionDenied("notifications".to_string()));
        }
        log::info!("[notification] {}: {}", title, body);
        Ok(())
    }
}
