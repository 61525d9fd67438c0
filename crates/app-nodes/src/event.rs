//! Event nodes
//!
//! Entry points for exec chains. None of them take an exec input; the
//! runtime fires them on app start, on UI events and on timer ticks.

use node_engine::{
    pins, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType, PropertySchema,
};

/// Fires once when the runtime starts
pub struct AppStartNode;

impl NodeDescriptor for AppStartNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("app-start", NodeCategory::Event, "App Start")
            .description("Runs when the app starts")
            .output(PinDef::exec())
    }
}

inventory::submit!(node_engine::DescriptorFn(AppStartNode::descriptor));

/// Fires when the UI component named by `targetId` is clicked
pub struct ClickNode;

impl NodeDescriptor for ClickNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("click", NodeCategory::Event, "Click Event")
            .description("Runs when a UI component is clicked")
            .output(PinDef::exec())
            .property("targetId", PropertySchema::string("Target Component", ""))
    }
}

inventory::submit!(node_engine::DescriptorFn(ClickNode::descriptor));

/// Fires on a key press
///
/// An empty `key` property matches every key. The pressed key is exposed
/// on the `key` data pin.
pub struct KeyPressNode;

impl NodeDescriptor for KeyPressNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("key-press", NodeCategory::Event, "Key Press Event")
            .description("Runs when a specific key is pressed")
            .output(PinDef::exec())
            .output(PinDef::new(pins::KEY, "Key", PinType::String))
            .property("key", PropertySchema::string("Key", ""))
    }
}

inventory::submit!(node_engine::DescriptorFn(KeyPressNode::descriptor));

pub struct TimerNode;

impl NodeDescriptor for TimerNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("timer", NodeCategory::Event, "Timer")
            .description("Runs repeatedly at a fixed interval")
            .output(PinDef::exec())
            .property("interval", PropertySchema::number("Interval (ms)", 1000))
            .property("repeat", PropertySchema::boolean("Repeat", true))
    }
}

inventory::submit!(node_engine::DescriptorFn(TimerNode::descriptor));
