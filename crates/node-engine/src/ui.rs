//! Host-side UI state for a running app
//!
//! The runtime only emits intents. [`UiState`] is the reducer a host keeps
//! next to the document to turn those intents into what should be on
//! screen: per-component overrides, input values and the current page.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::host::UiCallbacks;
use crate::types::{MiniApp, UiComponent, DEFAULT_PAGE_ID};

/// Runtime overrides for one component
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub style: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub overrides: HashMap<String, ComponentOverride>,
    pub current_page: String,
    /// Alert messages in the order they were raised
    pub alerts: Vec<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
            current_page: DEFAULT_PAGE_ID.to_string(),
            alerts: Vec::new(),
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, target_id: &str, text: &str) {
        self.overrides.entry(target_id.to_string()).or_default().text = Some(text.to_string());
    }

    pub fn set_style(&mut self, target_id: &str, property: &str, value: &str) {
        self.overrides
            .entry(target_id.to_string())
            .or_default()
            .style
            .insert(property.to_string(), Value::String(value.to_string()));
    }

    /// Record what the user typed into an input component
    pub fn set_input_value(&mut self, target_id: &str, value: &str) {
        self.overrides.entry(target_id.to_string()).or_default().value = Some(value.to_string());
    }

    pub fn input_value(&self, target_id: &str) -> String {
        self.overrides
            .get(target_id)
            .and_then(|o| o.value.clone())
            .unwrap_or_default()
    }

    pub fn navigate(&mut self, page_id: &str) {
        self.current_page = page_id.to_string();
    }

    /// Components on the current page, in document order
    pub fn visible_components<'a>(&self, app: &'a MiniApp) -> Vec<&'a UiComponent> {
        app.ui_components
            .iter()
            .filter(|c| c.page() == self.current_page)
            .collect()
    }

    /// Override text if one was set, otherwise the component's `text` prop
    pub fn effective_text(&self, component: &UiComponent) -> Option<String> {
        self.overrides
            .get(&component.id)
            .and_then(|o| o.text.clone())
            .or_else(|| {
                component
                    .props
                    .get("text")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
    }

    /// Component style with overrides merged on top
    pub fn effective_style(&self, component: &UiComponent) -> Map<String, Value> {
        let mut style = component.style.clone();
        if let Some(o) = self.overrides.get(&component.id) {
            for (k, v) in &o.style {
                style.insert(k.clone(), v.clone());
            }
        }
        style
    }
}

/// [`UiCallbacks`] that reduce intents into a shared [`UiState`]
#[derive(Debug, Clone, Default)]
pub struct UiStateCallbacks {
    state: Arc<Mutex<UiState>>,
}

impl UiStateCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the state (for rendering or feeding input values)
    pub fn state(&self) -> Arc<Mutex<UiState>> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> UiState {
        self.state.lock().clone()
    }
}

impl UiCallbacks for UiStateCallbacks {
    fn set_text(&self, target_id: &str, text: &str) {
        self.state.lock().set_text(target_id, text);
    }

    fn set_style(&self, target_id: &str, property: &str, value: &str) {
        self.state.lock().set_style(target_id, property, value);
    }

    fn alert(&self, message: &str) {
        log::info!("[alert] {}", message);
        self.state.lock().alerts.push(message.to_string());
    }

    fn get_input_value(&self, target_id: &str) -> String {
        self.state.lock().input_value(target_id)
    }

    fn navigate_page(&self, page_id: &str) {
        self.state.lock().navigate(page_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UiComponentType;

    #[test]
    fn test_visible_components_by_page() {
        let mut app = MiniApp::create_empty("Pages");
        let page = app.add_page("Second");
        let a = UiComponent::new(UiComponentType::Text, 0.0, 0.0);
        let b = UiComponent::new(UiComponentType::Button, 0.0, 0.0).on_page(page.clone());
        app.ui_components.push(a.clone());
        app.ui_components.push(b.clone());

        let mut state = UiState::new();
        let ids: Vec<_> = state.visible_components(&app).iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![a.id.clone()]);

        state.navigate(&page);
        let ids: Vec<_> = state.visible_components(&app).iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![b.id]);
    }

    #[test]
    fn test_effective_text_and_style() {
        let comp = UiComponent::new(UiComponentType::Text, 0.0, 0.0);
        let mut state = UiState::new();
        assert_eq!(state.effective_text(&comp).as_deref(), Some("Text"));

        state.set_text(&comp.id, "Updated");
        state.set_style(&comp.id, "color", "red");
        assert_eq!(state.effective_text(&comp).as_deref(), Some("Updated"));

        let style = state.effective_style(&comp);
        assert_eq!(style["color"], "red");
        assert_eq!(style["fontSize"], 16);
    }

    #[test]
    fn test_callbacks_reduce_into_state() {
        let callbacks = UiStateCallbacks::new();
        callbacks.state().lock().set_input_value("in1", "typed");

        assert_eq!(callbacks.get_input_value("in1"), "typed");
        assert_eq!(callbacks.get_input_value("missing"), "");

        callbacks.set_text("t1", "hello");
        callbacks.alert("careful");
        callbacks.navigate_page("page_1");

        let snap = callbacks.snapshot();
        assert_eq!(snap.overrides["t1"].text.as_deref(), Some("hello"));
        assert_eq!(snap.alerts, vec!["careful".to_string()]);
        assert_eq!(snap.current_page, "page_1");
    }
}
