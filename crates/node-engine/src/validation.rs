//! Document validation
//!
//! Two levels of checking:
//!
//! - [`validate_document`] is the format gate applied when a document is
//!   loaded or imported. Failing it is an error.
//! - [`lint_app`] reports non-fatal structural issues (dangling wires,
//!   unknown types, fan-in on input pins). The runtime tolerates all of
//!   them, so they are only surfaced to the author.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::error::{NodeEngineError, Result};
use crate::registry::NodeRegistry;
use crate::types::MiniApp;

/// Check that a raw JSON document has the required top-level fields
pub fn validate_document(doc: &Value) -> Result<()> {
    let obj = doc
        .as_object()
        .ok_or_else(|| NodeEngineError::invalid_format("document must be a JSON object"))?;

    match obj.get("name") {
        Some(Value::String(name)) if !name.is_empty() => {}
        _ => return Err(NodeEngineError::invalid_format("missing 'name'")),
    }

    for field in ["uiComponents", "nodes", "connections"] {
        if !obj.get(field).is_some_and(Value::is_array) {
            return Err(NodeEngineError::invalid_format(format!(
                "'{}' must be an array",
                field
            )));
        }
    }

    Ok(())
}

/// Validate and decode a document from JSON text
///
/// Absent `displayMode`, `pages`, `layers` and `canvas` are filled with
/// their defaults.
pub fn deserialize_app(json: &str) -> Result<MiniApp> {
    let value: Value = serde_json::from_str(json)?;
    app_from_value(value)
}

/// Validate and decode a document from an already parsed JSON value
pub fn app_from_value(value: Value) -> Result<MiniApp> {
    validate_document(&value)?;
    let mut app: MiniApp = serde_json::from_value(value)
        .map_err(|e| NodeEngineError::invalid_format(e.to_string()))?;
    if app.pages.is_empty() {
        log::warn!("App '{}' has no pages, adding the default page", app.name);
        app.add_page("Main Page");
    }
    Ok(app)
}

/// Encode a document as pretty-printed JSON
pub fn serialize_app(app: &MiniApp) -> Result<String> {
    Ok(serde_json::to_string_pretty(app)?)
}

/// Non-fatal problem found by [`lint_app`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("Unknown node type '{node_type}' for node '{node_id}'")]
    UnknownNodeType { node_id: String, node_type: String },

    #[error("Connection {index} references missing node '{node_id}'")]
    DanglingConnection { index: usize, node_id: String },

    #[error("Input '{pin_id}' on node '{node_id}' has {count} incoming connections")]
    MultipleInputs {
        node_id: String,
        pin_id: String,
        count: usize,
    },

    #[error("Component '{component_id}' is on missing page '{page_id}'")]
    MissingPage {
        component_id: String,
        page_id: String,
    },

    #[error("'{item_id}' is on missing layer '{layer_id}'")]
    MissingLayer { item_id: String, layer_id: String },

    #[error("Duplicate id '{0}'")]
    DuplicateId(String),
}

/// Report structural issues in a document
///
/// Pass a registry to also flag node types it does not know.
pub fn lint_app(app: &MiniApp, registry: Option<&NodeRegistry>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut seen = HashMap::new();
    for id in app
        .nodes
        .iter()
        .map(|n| &n.id)
        .chain(app.ui_components.iter().map(|c| &c.id))
    {
        let count = seen.entry(id.as_str()).or_insert(0usize);
        *count += 1;
        if *count == 2 {
            issues.push(ValidationIssue::DuplicateId(id.clone()));
        }
    }

    if let Some(registry) = registry {
        for node in &app.nodes {
            if !registry.has_node_type(&node.node_type) {
                issues.push(ValidationIssue::UnknownNodeType {
                    node_id: node.id.clone(),
                    node_type: node.node_type.clone(),
                });
            }
        }
    }

    let mut fan_in: HashMap<(&str, &str), usize> = HashMap::new();
    for (index, conn) in app.connections.iter().enumerate() {
        for end in [&conn.from, &conn.to] {
            if app.find_node(&end.node_id).is_none() {
                issues.push(ValidationIssue::DanglingConnection {
                    index,
                    node_id: end.node_id.clone(),
                });
            }
        }
        *fan_in
            .entry((conn.to.node_id.as_str(), conn.to.pin_id.as_str()))
            .or_default() += 1;
    }
    let mut multi: Vec<_> = fan_in.into_iter().filter(|(_, n)| *n > 1).collect();
    multi.sort();
    for ((node_id, pin_id), count) in multi {
        issues.push(ValidationIssue::MultipleInputs {
            node_id: node_id.to_string(),
            pin_id: pin_id.to_string(),
            count,
        });
    }

    for comp in &app.ui_components {
        if let Some(page_id) = &comp.page_id {
            if app.find_page(page_id).is_none() {
                issues.push(ValidationIssue::MissingPage {
                    component_id: comp.id.clone(),
                    page_id: page_id.clone(),
                });
            }
        }
    }

    let layered = app
        .ui_components
        .iter()
        .map(|c| (&c.id, &c.layer))
        .chain(app.nodes.iter().map(|n| (&n.id, &n.layer)));
    for (item_id, layer) in layered {
        if let Some(layer_id) = layer {
            if app.find_layer(layer_id).is_none() {
                issues.push(ValidationIssue::MissingLayer {
                    item_id: item_id.clone(),
                    layer_id: layer_id.clone(),
                });
            }
        }
    }

    issues
}
