//! Node descriptor trait and metadata types
//!
//! This module provides the `NodeDescriptor` trait that lets each built-in
//! node describe its own pins, properties and category. Descriptors are
//! collected at link time through [`DescriptorFn`] and loaded into a
//! [`NodeRegistry`](crate::registry::NodeRegistry).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trait for node types that can describe their metadata
///
/// # Example
///
/// ```ignore
/// use node_engine::{NodeDescriptor, NodeTypeDefinition, NodeCategory, PinDef, PinType};
///
/// impl NodeDescriptor for ShowAlertNode {
///     fn descriptor() -> NodeTypeDefinition {
///         NodeTypeDefinition::new("show-alert", NodeCategory::Action, "Show Alert")
///             .input(PinDef::exec())
///             .input(PinDef::new("message", "Message", PinType::String))
///             .output(PinDef::exec())
///     }
/// }
/// ```
pub trait NodeDescriptor {
    /// Get the static definition for this node type
    fn descriptor() -> NodeTypeDefinition
    where
        Self: Sized;
}

/// Link-time registration of a node type definition
///
/// ```ignore
/// inventory::submit!(node_engine::DescriptorFn(ShowAlertNode::descriptor));
/// ```
pub struct DescriptorFn(pub fn() -> NodeTypeDefinition);

inventory::collect!(DescriptorFn);

/// Type carried by a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    /// Control flow
    Exec,
    String,
    Number,
    Boolean,
    Any,
    List,
}

impl PinType {
    /// Editor color for wires of this type
    pub fn color(&self) -> &'static str {
        match self {
            Self::Exec => "#e8e6f0",
            Self::String => "#fdcb6e",
            Self::Number => "#74b9ff",
            Self::Boolean => "#ff6b6b",
            Self::Any => "#a29bfe",
            Self::List => "#55efc4",
        }
    }
}

/// A named, typed connection point on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDef {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub pin_type: PinType,
}

impl PinDef {
    pub fn new(id: impl Into<String>, label: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            pin_type,
        }
    }

    /// The unlabeled `exec` pin most nodes carry on both sides
    pub fn exec() -> Self {
        Self::new(pins::EXEC, "", PinType::Exec)
    }

    /// A labeled exec pin (branch outputs such as `true` / `done`)
    pub fn exec_named(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, PinType::Exec)
    }

    pub fn is_exec(&self) -> bool {
        self.pin_type == PinType::Exec
    }
}

/// Editor widget kind for a node property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    Select,
}

/// Declared shape and default of one node property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub label: String,
    pub default: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl PropertySchema {
    pub fn string(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            kind: PropertyKind::String,
            label: label.into(),
            default: Value::String(default.into()),
            options: None,
        }
    }

    pub fn number(label: impl Into<String>, default: i64) -> Self {
        Self {
            kind: PropertyKind::Number,
            label: label.into(),
            default: Value::from(default),
            options: None,
        }
    }

    pub fn boolean(label: impl Into<String>, default: bool) -> Self {
        Self {
            kind: PropertyKind::Boolean,
            label: label.into(),
            default: Value::Bool(default),
            options: None,
        }
    }

    /// A select box; the default must be one of `options`
    pub fn select(label: impl Into<String>, default: &str, options: &[&str]) -> Self {
        Self {
            kind: PropertyKind::Select,
            label: label.into(),
            default: Value::String(default.to_string()),
            options: Some(options.iter().map(|s| s.to_string()).collect()),
        }
    }
}

/// Node categories for palette grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Event,
    Action,
    Data,
    Logic,
    Function,
    Storage,
    Hardware,
    Api,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 8] = [
        Self::Event,
        Self::Action,
        Self::Data,
        Self::Logic,
        Self::Function,
        Self::Storage,
        Self::Hardware,
        Self::Api,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Action => "action",
            Self::Data => "data",
            Self::Logic => "logic",
            Self::Function => "function",
            Self::Storage => "storage",
            Self::Hardware => "hardware",
            Self::Api => "api",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Event => "Events",
            Self::Action => "Actions",
            Self::Data => "Data",
            Self::Logic => "Logic",
            Self::Function => "Functions",
            Self::Storage => "Storage",
            Self::Hardware => "Hardware",
            Self::Api => "API",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Event => "#ff6b6b",
            Self::Action => "#00ce9a",
            Self::Data => "#fdcb6e",
            Self::Logic => "#74b9ff",
            Self::Function => "#fd79a8",
            Self::Storage => "#e17055",
            Self::Hardware => "#00b894",
            Self::Api => "#a29bfe",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Event => "⚡",
            Self::Action => "▶",
            Self::Data => "📦",
            Self::Logic => "🔀",
            Self::Function => "🔧",
            Self::Storage => "💾",
            Self::Hardware => "📱",
            Self::Api => "🌐",
        }
    }
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Complete metadata for a node type
///
/// This describes everything the editor needs to render a node and
/// everything `instantiate` needs to seed its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDefinition {
    /// Unique type identifier (e.g., "set-text")
    pub id: String,
    pub category: NodeCategory,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub inputs: Vec<PinDef>,
    pub outputs: Vec<PinDef>,
    /// Property schemas keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
}

impl NodeTypeDefinition {
    pub fn new(id: impl Into<String>, category: NodeCategory, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            label: label.into(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn input(mut self, pin: PinDef) -> Self {
        self.inputs.push(pin);
        self
    }

    pub fn output(mut self, pin: PinDef) -> Self {
        self.outputs.push(pin);
        self
    }

    pub fn property(mut self, key: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(key.into(), schema);
        self
    }

    pub fn find_input(&self, pin_id: &str) -> Option<&PinDef> {
        self.inputs.iter().find(|p| p.id == pin_id)
    }

    pub fn find_output(&self, pin_id: &str) -> Option<&PinDef> {
        self.outputs.iter().find(|p| p.id == pin_id)
    }
}

/// Well-known pin identifiers shared by the catalog and the runtime
pub mod pins {
    pub const EXEC: &str = "exec";
    pub const EXEC_ERROR: &str = "execError";
    pub const VALUE: &str = "value";
    pub const RESULT: &str = "result";
    pub const MESSAGE: &str = "message";
    pub const CONDITION: &str = "condition";
    pub const TRUE: &str = "true";
    pub const FALSE: &str = "false";
    pub const LOOP: &str = "loop";
    pub const DONE: &str = "done";
    pub const INDEX: &str = "index";
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const A: &str = "a";
    pub const B: &str = "b";
    pub const LIST: &str = "list";
    pub const ITEM: &str = "item";
    pub const KEY: &str = "key";
    pub const URL: &str = "url";
    pub const BODY: &str = "body";
    pub const DATA: &str = "data";
    pub const STATUS: &str = "status";
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";
    pub const LEVEL: &str = "level";
    pub const CHARGING: &str = "charging";
    pub const PROMPT: &str = "prompt";
    pub const RESPONSE: &str = "response";
    pub const PARAM1: &str = "param1";
    pub const PARAM2: &str = "param2";
}
