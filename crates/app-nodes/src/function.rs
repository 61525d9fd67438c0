//! Function nodes
//!
//! A `function-define` node names a body; `function-call` runs it with two
//! parameters and reads back whatever `function-return` handed over.

use node_engine::{
    pins, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType, PropertySchema,
};

pub struct FunctionDefineNode;

impl NodeDescriptor for FunctionDefineNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("function-define", NodeCategory::Function, "Define Function")
            .description("Defines a reusable function")
            .output(PinDef::exec())
            .output(PinDef::new(pins::PARAM1, "Parameter 1", PinType::Any))
            .output(PinDef::new(pins::PARAM2, "Parameter 2", PinType::Any))
            .property("funcName", PropertySchema::string("Function Name", "myFunction"))
    }
}

inventory::submit!(node_engine::DescriptorFn(FunctionDefineNode::descriptor));

pub struct FunctionReturnNode;

impl NodeDescriptor for FunctionReturnNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("function-return", NodeCategory::Function, "Return")
            .description("Returns a value from the current function")
            .input(PinDef::exec())
            .input(PinDef::new(pins::VALUE, "Return Value", PinType::Any))
    }
}

inventory::submit!(node_engine::DescriptorFn(FunctionReturnNode::descriptor));

pub struct FunctionCallNode;

impl NodeDescriptor for FunctionCallNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("function-call", NodeCategory::Function, "Call Function")
            .description("Calls a defined function")
            .input(PinDef::exec())
            .input(PinDef::new(pins::PARAM1, "Parameter 1", PinType::Any))
            .input(PinDef::new(pins::PARAM2, "Parameter 2", PinType::Any))
            .output(PinDef::exec())
            .output(PinDef::new(pins::RESULT, "Result", PinType::Any))
            .property("funcName", PropertySchema::string("Function Name", "myFunction"))
    }
}

inventory::submit!(node_engine::DescriptorFn(FunctionCallNode::descriptor));
