//! Storage nodes
//!
//! Keys are namespaced by the runtime before they reach the host store.

use node_engine::{
    pins, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType, PropertySchema,
};

pub struct SaveDataNode;

impl NodeDescriptor for SaveDataNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("save-data", NodeCategory::Storage, "Save Data")
            .description("Stores a value under a key")
            .input(PinDef::exec())
            .input(PinDef::new(pins::VALUE, "Value", PinType::Any))
            .output(PinDef::exec())
            .property("key", PropertySchema::string("Key", "myKey"))
    }
}

inventory::submit!(node_engine::DescriptorFn(SaveDataNode::descriptor));

pub struct LoadDataNode;

impl NodeDescriptor for LoadDataNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("load-data", NodeCategory::Storage, "Load Data")
            .description("Reads the value stored under a key")
            .output(PinDef::new(pins::VALUE, "Value", PinType::Any))
            .property("key", PropertySchema::string("Key", "myKey"))
    }
}

inventory::submit!(node_engine::DescriptorFn(LoadDataNode::descriptor));

pub struct DeleteDataNode;

impl NodeDescriptor for DeleteDataNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("delete-data", NodeCategory::Storage, "Delete Data")
            .description("Removes a stored key")
            .input(PinDef::exec())
            .output(PinDef::exec())
            .property("key", PropertySchema::string("Key", "myKey"))
    }
}

inventory::submit!(node_engine::DescriptorFn(DeleteDataNode::descriptor));
