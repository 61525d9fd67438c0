//! Node type registry
//!
//! A pure lookup table from node type id to [`NodeTypeDefinition`]. The
//! registry carries no runtime state; it backs palette listings, document
//! lint and [`NodeRegistry::instantiate`].
//!
//! # Usage
//!
//! ```ignore
//! use node_engine::NodeRegistry;
//!
//! let registry = NodeRegistry::with_builtins();
//! let node = registry.instantiate("set-text", 120.0, 80.0).unwrap();
//! ```

use std::collections::{BTreeMap, HashMap};

use serde_json::Map;

use crate::descriptor::{DescriptorFn, NodeCategory, NodeTypeDefinition};
use crate::kind::canonical_type_name;
use crate::types::NodeInstance;

/// Registry of node type definitions keyed by canonical type id
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    entries: HashMap<String, NodeTypeDefinition>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry from every descriptor submitted with `inventory`
    ///
    /// Definitions only show up here if the crate that submits them is
    /// linked into the final binary.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in inventory::iter::<DescriptorFn> {
            registry.register((descriptor.0)());
        }
        log::debug!("Loaded {} built-in node types", registry.entries.len());
        registry
    }

    /// Register a node type definition, replacing any entry with the same id
    pub fn register(&mut self, definition: NodeTypeDefinition) {
        self.entries.insert(definition.id.clone(), definition);
    }

    /// Look up a definition by type id (legacy camelCase ids are accepted)
    pub fn lookup(&self, node_type: &str) -> Option<&NodeTypeDefinition> {
        self.entries
            .get(node_type)
            .or_else(|| self.entries.get(canonical_type_name(node_type)))
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.lookup(node_type).is_some()
    }

    /// All definitions, sorted by id
    pub fn all(&self) -> Vec<&NodeTypeDefinition> {
        let mut all: Vec<_> = self.entries.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Definitions grouped by category, each group sorted by id
    pub fn list_by_category(&self) -> BTreeMap<NodeCategory, Vec<&NodeTypeDefinition>> {
        let mut grouped: BTreeMap<NodeCategory, Vec<&NodeTypeDefinition>> = BTreeMap::new();
        for def in self.entries.values() {
            grouped.entry(def.category).or_default().push(def);
        }
        for defs in grouped.values_mut() {
            defs.sort_by(|a, b| a.id.cmp(&b.id));
        }
        grouped
    }

    /// Create a node instance with a fresh id and every property set to its default
    ///
    /// Returns `None` for unknown types.
    pub fn instantiate(&self, node_type: &str, x: f64, y: f64) -> Option<NodeInstance> {
        let def = self.lookup(node_type)?;
        let properties: Map<_, _> = def
            .properties
            .iter()
            .map(|(key, schema)| (key.clone(), schema.default.clone()))
            .collect();

        Some(NodeInstance {
            id: format!("node_{}", uuid::Uuid::new_v4().simple()),
            node_type: def.id.clone(),
            x,
            y,
            properties,
            layer: None,
        })
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` if they share the same id.
    pub fn merge(&mut self, other: NodeRegistry) {
        self.entries.extend(other.entries);
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PinDef, PinType, PropertySchema};

    fn sample_registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry.register(
            NodeTypeDefinition::new("set-variable", NodeCategory::Action, "Set Variable")
                .input(PinDef::exec())
                .input(PinDef::new("value", "Value", PinType::Any))
                .output(PinDef::exec())
                .property("varName", PropertySchema::string("Variable", "myVar")),
        );
        registry.register(
            NodeTypeDefinition::new("log", NodeCategory::Action, "Log")
                .input(PinDef::exec())
                .output(PinDef::exec()),
        );
        registry.register(
            NodeTypeDefinition::new("timer", NodeCategory::Event, "Timer")
                .output(PinDef::exec())
                .property("interval", PropertySchema::number("Interval (ms)", 1000))
                .property("repeat", PropertySchema::boolean("Repeat", true)),
        );
        registry
    }

    #[test]
    fn test_lookup_accepts_legacy_ids() {
        let registry = sample_registry();
        assert!(registry.lookup("set-variable").is_some());
        assert!(registry.lookup("setVariable").is_some());
        assert!(registry.lookup("onTimer").is_some());
        assert!(registry.lookup("nope").is_none());
        assert!(!registry.has_node_type("nope"));
    }

    #[test]
    fn test_instantiate_fills_defaults() {
        let registry = sample_registry();
        let a = registry.instantiate("timer", 10.0, 20.0).unwrap();
        let b = registry.instantiate("onTimer", 0.0, 0.0).unwrap();

        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("node_"));
        assert_eq!(a.node_type, "timer");
        assert_eq!(b.node_type, "timer");
        assert_eq!(a.properties["interval"], 1000);
        assert_eq!(a.properties["repeat"], true);
        assert_eq!((a.x, a.y), (10.0, 20.0));
        assert!(registry.instantiate("ghost", 0.0, 0.0).is_none());
    }

    #[test]
    fn test_list_by_category() {
        let registry = sample_registry();
        let grouped = registry.list_by_category();
        let actions: Vec<_> = grouped[&NodeCategory::Action]
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(actions, vec!["log", "set-variable"]);
        assert_eq!(grouped[&NodeCategory::Event].len(), 1);
        assert!(!grouped.contains_key(&NodeCategory::Api));
    }

    #[test]
    fn test_merge_overrides() {
        let mut registry = sample_registry();
        let mut other = NodeRegistry::new();
        other.register(NodeTypeDefinition::new("log", NodeCategory::Action, "Console Log"));
        registry.merge(other);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.lookup("log").unwrap().label, "Console Log");
    }
}
