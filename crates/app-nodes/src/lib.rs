//! App Nodes
//!
//! The built-in node catalog for Miniboard mini-apps. Each node type is a
//! unit struct implementing [`NodeDescriptor`](node_engine::NodeDescriptor)
//! and registered at link time, so linking this crate is enough for
//! [`NodeRegistry::with_builtins`] to see the whole catalog.
//!
//! # Categories
//!
//! - **Event**: Chain entry points (app start, click, key press, timer)
//! - **Action**: UI side effects, logging and variables
//! - **Data**: Literals, arithmetic, strings and lists
//! - **Logic**: Branching, comparison and loops
//! - **Function**: User-defined subroutines
//! - **Storage**: Persistent key/value data
//! - **Hardware**: Clipboard, location, battery and notifications
//! - **Api**: HTTP requests and the chat assistant

pub mod action;
pub mod api;
pub mod data;
pub mod event;
pub mod function;
pub mod hardware;
pub mod logic;
pub mod storage;

pub use action::*;
pub use api::*;
pub use data::*;
pub use event::*;
pub use function::*;
pub use hardware::*;
pub use logic::*;
pub use storage::*;

use node_engine::NodeRegistry;

/// Registry holding every built-in node type
///
/// Referencing this function also keeps the crate's descriptors linked into
/// binaries that never name a node struct directly.
pub fn builtin_registry() -> NodeRegistry {
    NodeRegistry::with_builtins()
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_engine::{NodeCategory, NodeKind, PinType};

    #[test]
    fn test_inventory_collects_all_builtins() {
        let registry = builtin_registry();
        assert_eq!(registry.len(), 43, "Expected 43 built-in node types");

        // Spot-check known types
        assert!(registry.has_node_type("app-start"));
        assert!(registry.has_node_type("set-text"));
        assert!(registry.has_node_type("math-op"));
        assert!(registry.has_node_type("for-loop"));
        assert!(registry.has_node_type("function-call"));
        assert!(registry.has_node_type("save-data"));
        assert!(registry.has_node_type("get-battery"));
        assert!(registry.has_node_type("http-request"));
        // Legacy ids resolve to the same definitions
        assert!(registry.has_node_type("onClick"));
        assert!(registry.has_node_type("geminiChat"));
    }

    #[test]
    fn test_catalog_matches_node_kinds() {
        let registry = builtin_registry();
        for kind in NodeKind::all() {
            let def = registry
                .lookup(kind.type_name())
                .unwrap_or_else(|| panic!("no descriptor for {}", kind));
            assert_eq!(def.category, kind.category(), "category of {}", kind);
        }
    }

    #[test]
    fn test_every_category_is_populated() {
        let registry = builtin_registry();
        let grouped = registry.list_by_category();
        for category in NodeCategory::ALL {
            assert!(
                grouped.get(&category).is_some_and(|defs| !defs.is_empty()),
                "empty category {}",
                category
            );
        }
        assert_eq!(grouped[&NodeCategory::Event].len(), 4);
    }

    #[test]
    fn test_triggers_only_start_chains() {
        let registry = builtin_registry();
        for kind in NodeKind::all().filter(|k| k.is_trigger()) {
            let def = registry.lookup(kind.type_name()).unwrap();
            assert!(def.inputs.iter().all(|p| !p.is_exec()), "{} takes exec", def.id);
            assert!(def.find_output("exec").is_some(), "{} has no exec out", def.id);
        }
    }

    #[test]
    fn test_instantiate_seeds_defaults() {
        let registry = builtin_registry();
        let node = registry.instantiate("stringLiteral", 10.0, 20.0).unwrap();
        assert_eq!(node.node_type, "string-literal");
        assert_eq!(node.properties["value"], "Hello");

        let timer = registry.instantiate("timer", 0.0, 0.0).unwrap();
        assert_eq!(timer.properties["interval"], 1000);
        assert_eq!(timer.properties["repeat"], true);
    }
}
