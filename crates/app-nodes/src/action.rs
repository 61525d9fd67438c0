//! Action nodes
//!
//! Side effects on the UI, the log and the variable map. Every action
//! passes control straight through its `exec` output.

use node_engine::{
    pins, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType, PropertySchema,
};

/// Replaces the text of a UI component
pub struct SetTextNode;

impl NodeDescriptor for SetTextNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("set-text", NodeCategory::Action, "Set Text")
            .description("Changes the text of a UI component")
            .input(PinDef::exec())
            .input(PinDef::new(pins::VALUE, "Value", PinType::String))
            .output(PinDef::exec())
            .property("targetId", PropertySchema::string("Target Component", ""))
    }
}

inventory::submit!(node_engine::DescriptorFn(SetTextNode::descriptor));

/// Sets one CSS-style property on a UI component
pub struct SetStyleNode;

impl NodeDescriptor for SetStyleNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("set-style", NodeCategory::Action, "Set Style")
            .description("Changes a style property of a UI component")
            .input(PinDef::exec())
            .input(PinDef::new(pins::VALUE, "Value", PinType::String))
            .output(PinDef::exec())
            .property("targetId", PropertySchema::string("Target Component", ""))
            .property("property", PropertySchema::string("CSS Property", "color"))
    }
}

inventory::submit!(node_engine::DescriptorFn(SetStyleNode::descriptor));

pub struct ShowAlertNode;

impl NodeDescriptor for ShowAlertNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("show-alert", NodeCategory::Action, "Show Alert")
            .description("Shows an alert message")
            .input(PinDef::exec())
            .input(PinDef::new(pins::MESSAGE, "Message", PinType::String))
            .output(PinDef::exec())
    }
}

inventory::submit!(node_engine::DescriptorFn(ShowAlertNode::descriptor));

pub struct LogNode;

impl NodeDescriptor for LogNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("log", NodeCategory::Action, "Log")
            .description("Writes a message to the runtime log")
            .input(PinDef::exec())
            .input(PinDef::new(pins::MESSAGE, "Message", PinType::Any))
            .output(PinDef::exec())
    }
}

inventory::submit!(node_engine::DescriptorFn(LogNode::descriptor));

/// Stores a value in the runtime's variable map under `varName`
pub struct SetVariableNode;

impl NodeDescriptor for SetVariableNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("set-variable", NodeCategory::Action, "Set Variable")
            .description("Stores a value in a variable")
            .input(PinDef::exec())
            .input(PinDef::new(pins::VALUE, "Value", PinType::Any))
            .output(PinDef::exec())
            .property("varName", PropertySchema::string("Variable Name", "myVar"))
    }
}

inventory::submit!(node_engine::DescriptorFn(SetVariableNode::descriptor));

pub struct NavigatePageNode;

impl NodeDescriptor for NavigatePageNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("navigate-page", NodeCategory::Action, "Navigate Page")
            .description("Switches the visible UI page")
            .input(PinDef::exec())
            .output(PinDef::exec())
            .property("pageId", PropertySchema::string("Page ID", "page_0"))
    }
}

inventory::submit!(node_engine::DescriptorFn(NavigatePageNode::descriptor));
