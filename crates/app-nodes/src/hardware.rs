//! Hardware nodes
//!
//! Device access through the host. Readings are captured when the node
//! executes and served from its data pins afterwards.

use node_engine::{
    pins, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType, PropertySchema,
};

pub struct GetClipboardNode;

impl NodeDescriptor for GetClipboardNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("get-clipboard", NodeCategory::Hardware, "Read Clipboard")
            .description("Reads text from the clipboard")
            .input(PinDef::exec())
            .output(PinDef::exec())
            .output(PinDef::new(pins::VALUE, "Text", PinType::String))
    }
}

inventory::submit!(node_engine::DescriptorFn(GetClipboardNode::descriptor));

pub struct SetClipboardNode;

impl NodeDescriptor for SetClipboardNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("set-clipboard", NodeCategory::Hardware, "Copy to Clipboard")
            .description("Copies text to the clipboard")
            .input(PinDef::exec())
            .input(PinDef::new(pins::VALUE, "Text", PinType::String))
            .output(PinDef::exec())
    }
}

inventory::submit!(node_engine::DescriptorFn(SetClipboardNode::descriptor));

pub struct GetLocationNode;

impl NodeDescriptor for GetLocationNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("get-location", NodeCategory::Hardware, "GPS Location")
            .description("Gets the current position")
            .input(PinDef::exec())
            .output(PinDef::exec())
            .output(PinDef::new(pins::LAT, "Latitude", PinType::Number))
            .output(PinDef::new(pins::LON, "Longitude", PinType::Number))
    }
}

inventory::submit!(node_engine::DescriptorFn(GetLocationNode::descriptor));

pub struct GetBatteryNode;

impl NodeDescriptor for GetBatteryNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("get-battery", NodeCategory::Hardware, "Battery Info")
            .description("Gets the battery level and charging state")
            .input(PinDef::exec())
            .output(PinDef::exec())
            .output(PinDef::new(pins::LEVEL, "Level (%)", PinType::Number))
            .output(PinDef::new(pins::CHARGING, "Charging", PinType::Boolean))
    }
}

inventory::submit!(node_engine::DescriptorFn(GetBatteryNode::descriptor));

/// Shows a system notification, asking for permission first if needed
pub struct SendNotificationNode;

impl NodeDescriptor for SendNotificationNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("send-notification", NodeCategory::Hardware, "Send Notification")
            .description("Sends a system notification")
            .input(PinDef::exec())
            .input(PinDef::new(pins::BODY, "Body", PinType::String))
            .output(PinDef::exec())
            .property("title", PropertySchema::string("Title", "Miniboard"))
    }
}

inventory::submit!(node_engine::DescriptorFn(SendNotificationNode::descriptor));
