use std::time::Duration;

use serde_json::Value;

use crate::descriptor::pins;
use crate::error::{HostError, Result};
use crate::host::{BatteryStatus, GeoPosition, NotificationPermission};
use crate::kind::NodeKind;
use crate::runtime::execute::Next;
use crate::runtime::state::ExecContext;
use crate::runtime::value::{number_value, to_display_string};
use crate::runtime::RuntimeInner;
use crate::types::NodeInstance;

impl RuntimeInner {
    /// Hardware nodes are fail-soft: failures store defaults and continue `exec`
    pub(crate) async fn exec_hardware(
        &self,
        node: &NodeInstance,
        kind: NodeKind,
        ctx: &ExecContext,
    ) -> Result<Next> {
        match kind {
            NodeKind::GetClipboard => {
                let read = self.host.clipboard.read_text().await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                let text = match read {
                    Ok(text) => {
                        self.log("Clipboard read");
                        text
                    }
                    Err(e) => {
                        log::debug!("Clipboard read failed: {}", e);
                        self.log("Clipboard access failed");
                        String::new()
                    }
                };
                self.update_state(ctx, &node.id, |s| s.last_result = Some(Value::String(text)));
            }
            NodeKind::SetClipboard => {
                let value = self.resolve_input(&node.id, pins::VALUE, ctx).await;
                let written = self
                    .host
                    .clipboard
                    .write_text(&to_display_string(&value))
                    .await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                match written {
                    Ok(()) => self.log("Copied to clipboard"),
                    Err(_) => self.log("Clipboard write failed"),
                }
            }
            NodeKind::GetLocation => {
                let timeout = Duration::from_millis(self.options.geolocation_timeout_ms);
                let position =
                    match tokio::time::timeout(timeout, self.host.geolocation.current_position(timeout))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(HostError::Timeout(self.options.geolocation_timeout_ms)),
                    };
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                let position = match position {
                    Ok(pos) => {
                        self.log(format!("Location: {:.4}, {:.4}", pos.lat, pos.lon));
                        pos
                    }
                    Err(e) => {
                        log::debug!("Geolocation failed: {}", e);
                        self.log("GPS access failed");
                        GeoPosition { lat: 0.0, lon: 0.0 }
                    }
                };
                self.update_state(ctx, &node.id, |s| s.location = Some(position));
            }
            NodeKind::GetBattery => {
                let status = self.host.battery.status().await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                let status = match status {
                    Ok(status) => {
                        let mode = if status.charging { "charging" } else { "discharging" };
                        self.log(format!("Battery: {}% ({})", status.level, mode));
                        status
                    }
                    Err(_) => {
                        self.log("Battery info unavailable");
                        BatteryStatus {
                            level: 0,
                            charging: false,
                        }
                    }
                };
                self.update_state(ctx, &node.id, |s| s.battery = Some(status));
            }
            NodeKind::SendNotification => {
                let body = self.resolve_input(&node.id, pins::BODY, ctx).await;
                let body = to_display_string(&body);
                let title = node.str_property_or("title", "Miniboard");
                let outcome = self.deliver_notification(title, &body, ctx).await;
                if !self.is_current(ctx) {
                    return Ok(None);
                }
                match outcome {
                    Ok(()) => self.log(format!("Notification sent: {}", title)),
                    Err(e) => {
                        log::debug!("Notification failed: {}", e);
                        self.log("Notification failed");
                    }
                }
            }
            _ => return Ok(None),
        }
        Ok(Some(pins::EXEC))
    }

    /// Deliver if granted; ask first if the user has not decided yet
    async fn deliver_notification(
        &self,
        title: &str,
        body: &str,
        ctx: &ExecContext,
    ) -> std::result::Result<(), HostError> {
        let notifier = &self.host.notifier;
        let granted = match notifier.permission().await? {
            NotificationPermission::Granted => true,
            NotificationPermission::Denied => false,
            NotificationPermission::Default => {
                if !self.is_current(ctx) {
                    return Ok(());
                }
                notifier.request_permission().await? == NotificationPermission::Granted
            }
        };
        if granted && self.is_current(ctx) {
            notifier.notify(title, body).await?;
        }
        Ok(())
    }

    pub(crate) fn eval_hardware(&self, node: &NodeInstance, kind: NodeKind, pin_id: &str) -> Value {
        match kind {
            NodeKind::GetClipboard => self
                .read_state(&node.id, |s| s.last_result.clone())
                .unwrap_or_else(|| Value::String(String::new())),
            NodeKind::GetLocation => {
                let pos = self.read_state(&node.id, |s| s.location);
                let coord = match (pos, pin_id) {
                    (Some(p), pins::LON) => p.lon,
                    (Some(p), _) => p.lat,
                    (None, _) => 0.0,
                };
                number_value(coord)
            }
            NodeKind::GetBattery => {
                let status = self.read_state(&node.id, |s| s.battery);
                match pin_id {
                    pins::CHARGING => Value::Bool(status.is_some_and(|b| b.charging)),
                    _ => Value::from(status.map(|b| b.level).unwrap_or(0)),
                }
            }
            _ => Value::Null,
        }
    }
}
