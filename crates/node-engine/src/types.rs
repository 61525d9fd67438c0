//! Core types for mini-app documents
//!
//! A [`MiniApp`] is the persisted program: pages, UI component placements,
//! node instances and the wires between their pins. The JSON encoding is
//! camelCase and is the on-disk / over-the-wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{NodeEngineError, Result};

/// Unique identifier for a node instance
pub type NodeId = String;

/// Identifier of a pin on a node
pub type PinId = String;

/// Page every component without a `pageId` belongs to
pub const DEFAULT_PAGE_ID: &str = "page_0";

/// Layer every node or component without a `layer` belongs to
pub const DEFAULT_LAYER_ID: &str = "default";

/// How the host presents a running app
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Fullscreen,
    Floating,
}

/// Drawing surface of the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            background_color: "#2d2d3f".to_string(),
        }
    }
}

/// Window size used in floating display mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

fn default_pages() -> Vec<Page> {
    vec![Page {
        id: DEFAULT_PAGE_ID.to_string(),
        name: "Main Page".to_string(),
    }]
}

fn default_layers() -> Vec<Layer> {
    vec![Layer {
        id: DEFAULT_LAYER_ID.to_string(),
        name: "Default Layer".to_string(),
        visible: true,
    }]
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Kind of UI element placed on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiComponentType {
    Button,
    Text,
    Input,
    Image,
    Container,
}

impl UiComponentType {
    /// Props a freshly placed component starts with
    pub fn default_props(&self) -> Map<String, Value> {
        let props = match self {
            Self::Button => json!({ "text": "Button" }),
            Self::Text => json!({ "text": "Text" }),
            Self::Input => json!({ "placeholder": "Type here...", "value": "" }),
            Self::Image => json!({ "src": "", "alt": "Image" }),
            Self::Container => json!({}),
        };
        into_map(props)
    }

    /// Style a freshly placed component starts with
    pub fn default_style(&self) -> Map<String, Value> {
        let style = match self {
            Self::Button => json!({
                "width": 120, "height": 40,
                "backgroundColor": "#7c6ff7", "color": "#ffffff",
                "borderRadius": 8, "fontSize": 14, "fontWeight": "500",
                "border": "none", "cursor": "pointer",
            }),
            Self::Text => json!({
                "width": 200, "height": 30,
                "color": "#e8e6f0", "fontSize": 16, "fontWeight": "400",
            }),
            Self::Input => json!({
                "width": 200, "height": 36,
                "backgroundColor": "#252536", "color": "#e8e6f0",
                "borderRadius": 8, "fontSize": 14,
                "border": "1px solid rgba(255,255,255,0.1)", "padding": "0 10px",
            }),
            Self::Image => json!({
                "width": 150, "height": 150, "borderRadius": 8, "objectFit": "cover",
            }),
            Self::Container => json!({
                "width": 200, "height": 150,
                "backgroundColor": "rgba(255,255,255,0.04)", "borderRadius": 12,
                "border": "1px solid rgba(255,255,255,0.06)",
            }),
        };
        into_map(style)
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// A UI element placed on one page of the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: UiComponentType,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default)]
    pub style: Map<String, Value>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl UiComponent {
    /// Create a component with the default props and style for its kind
    pub fn new(kind: UiComponentType, x: f64, y: f64) -> Self {
        Self {
            id: format!("ui_{}", uuid::Uuid::new_v4().simple()),
            kind,
            props: kind.default_props(),
            style: kind.default_style(),
            x,
            y,
            page_id: None,
            layer: None,
        }
    }

    /// Place the component on a specific page
    pub fn on_page(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    /// Page this component is shown on
    pub fn page(&self) -> &str {
        self.page_id.as_deref().unwrap_or(DEFAULT_PAGE_ID)
    }
}

/// One instruction instance in the visual program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstance {
    pub id: NodeId,
    /// Node type (references a NodeTypeDefinition)
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl NodeInstance {
    /// Create a node with no properties
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            x: 0.0,
            y: 0.0,
            properties: Map::new(),
            layer: None,
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Raw property value, if set
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).filter(|v| !v.is_null())
    }

    /// String property, treating a missing or empty string as absent
    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.property(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// String property with a fallback for missing or empty values
    pub fn str_property_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.str_property(key).unwrap_or(default)
    }
}

/// One end of a connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRef {
    pub node_id: NodeId,
    pub pin_id: PinId,
}

impl PinRef {
    pub fn new(node_id: impl Into<String>, pin_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            pin_id: pin_id.into(),
        }
    }
}

/// A wire from an output pin to an input pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: PinRef,
    pub to: PinRef,
}

impl Connection {
    /// Create a connection between `from_node.from_pin` and `to_node.to_pin`
    pub fn new(
        from_node: impl Into<String>,
        from_pin: impl Into<String>,
        to_node: impl Into<String>,
        to_pin: impl Into<String>,
    ) -> Self {
        Self {
            from: PinRef::new(from_node, from_pin),
            to: PinRef::new(to_node, to_pin),
        }
    }
}

/// A complete mini-app document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniApp {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Older documents omit this; they open fullscreen
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_size: Option<Size>,
    #[serde(default)]
    pub canvas: Canvas,
    #[serde(default = "default_pages")]
    pub pages: Vec<Page>,
    #[serde(default = "default_layers")]
    pub layers: Vec<Layer>,
    pub ui_components: Vec<UiComponent>,
    pub nodes: Vec<NodeInstance>,
    pub connections: Vec<Connection>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl MiniApp {
    /// Create an empty app with one page, one layer and a 400x300 canvas
    pub fn create_empty(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("app_{}", now.timestamp_millis()),
            name: name.into(),
            version: default_version(),
            display_mode: DisplayMode::Fullscreen,
            floating_size: Some(Size {
                width: 400.0,
                height: 300.0,
            }),
            canvas: Canvas::default(),
            pages: default_pages(),
            layers: default_layers(),
            ui_components: Vec::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut NodeInstance> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find a UI component by ID
    pub fn find_component(&self, id: &str) -> Option<&UiComponent> {
        self.ui_components.iter().find(|c| c.id == id)
    }

    pub fn find_page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn find_layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// The wire feeding an input pin (first one wins if several exist)
    pub fn incoming_connection(&self, node_id: &str, pin_id: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.to.node_id == node_id && c.to.pin_id == pin_id)
    }

    /// Wires leaving an output pin, in document order
    pub fn outgoing_connections<'a>(
        &'a self,
        node_id: &'a str,
        pin_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |c| c.from.node_id == node_id && c.from.pin_id == pin_id)
    }

    /// Append a node and return its id
    pub fn add_node(&mut self, node: NodeInstance) -> NodeId {
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Wire `from` to `to`, replacing any wire already feeding `to`
    pub fn connect(&mut self, from: PinRef, to: PinRef) -> Result<()> {
        if from.node_id == to.node_id {
            return Err(NodeEngineError::InvalidConnection(format!(
                "node '{}' cannot connect to itself",
                from.node_id
            )));
        }
        for end in [&from, &to] {
            if self.find_node(&end.node_id).is_none() {
                return Err(NodeEngineError::NotFound(format!("node '{}'", end.node_id)));
            }
        }

        self.connections.retain(|c| c.to != to);
        self.connections.push(Connection { from, to });
        Ok(())
    }

    /// Remove a node together with every wire touching it
    pub fn remove_node(&mut self, node_id: &str) -> Option<NodeInstance> {
        let pos = self.nodes.iter().position(|n| n.id == node_id)?;
        self.connections
            .retain(|c| c.from.node_id != node_id && c.to.node_id != node_id);
        Some(self.nodes.remove(pos))
    }

    /// Append a page with the next free `page_N` id
    pub fn add_page(&mut self, name: impl Into<String>) -> String {
        let mut n = self.pages.len();
        while self.find_page(&format!("page_{}", n)).is_some() {
            n += 1;
        }
        let id = format!("page_{}", n);
        self.pages.push(Page {
            id: id.clone(),
            name: name.into(),
        });
        id
    }

    /// Stamp the modification time
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
