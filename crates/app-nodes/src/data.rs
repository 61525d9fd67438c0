//! Data nodes
//!
//! Pure value producers. Apart from `list-add` and `list-remove`, which
//! record their result when executed, these nodes are evaluated on demand
//! whenever a downstream pin pulls from them.

use node_engine::{
    pins, NodeCategory, NodeDescriptor, NodeTypeDefinition, PinDef, PinType, PropertySchema,
};

pub struct StringLiteralNode;

impl NodeDescriptor for StringLiteralNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("string-literal", NodeCategory::Data, "String")
            .description("A constant string")
            .output(PinDef::new(pins::VALUE, "Value", PinType::String))
            .property("value", PropertySchema::string("Value", "Hello"))
    }
}

inventory::submit!(node_engine::DescriptorFn(StringLiteralNode::descriptor));

pub struct NumberLiteralNode;

impl NodeDescriptor for NumberLiteralNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("number-literal", NodeCategory::Data, "Number")
            .description("A constant number")
            .output(PinDef::new(pins::VALUE, "Value", PinType::Number))
            .property("value", PropertySchema::number("Value", 0))
    }
}

inventory::submit!(node_engine::DescriptorFn(NumberLiteralNode::descriptor));

pub struct GetVariableNode;

impl NodeDescriptor for GetVariableNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("get-variable", NodeCategory::Data, "Get Variable")
            .description("Reads a stored variable")
            .output(PinDef::new(pins::VALUE, "Value", PinType::Any))
            .property("varName", PropertySchema::string("Variable Name", "myVar"))
    }
}

inventory::submit!(node_engine::DescriptorFn(GetVariableNode::descriptor));

/// Joins the display strings of `a` and `b`
pub struct ConcatNode;

impl NodeDescriptor for ConcatNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("concat", NodeCategory::Data, "Concat")
            .description("Joins two strings")
            .input(PinDef::new(pins::A, "A", PinType::String))
            .input(PinDef::new(pins::B, "B", PinType::String))
            .output(PinDef::new(pins::VALUE, "Result", PinType::String))
    }
}

inventory::submit!(node_engine::DescriptorFn(ConcatNode::descriptor));

/// Arithmetic on two numbers; division by zero yields 0
pub struct MathOpNode;

impl NodeDescriptor for MathOpNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("math-op", NodeCategory::Data, "Math")
            .description("Applies an arithmetic operator to two numbers")
            .input(PinDef::new(pins::A, "A", PinType::Number))
            .input(PinDef::new(pins::B, "B", PinType::Number))
            .output(PinDef::new(pins::VALUE, "Result", PinType::Number))
            .property(
                "operator",
                PropertySchema::select("Operator", "+", &["+", "-", "*", "/"]),
            )
    }
}

inventory::submit!(node_engine::DescriptorFn(MathOpNode::descriptor));

/// Current value of a UI input component
pub struct GetInputValueNode;

impl NodeDescriptor for GetInputValueNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("get-input-value", NodeCategory::Data, "Get Input Value")
            .description("Reads the value of a UI input")
            .output(PinDef::new(pins::VALUE, "Value", PinType::String))
            .property("targetId", PropertySchema::string("Target Component", ""))
    }
}

inventory::submit!(node_engine::DescriptorFn(GetInputValueNode::descriptor));

pub struct CreateListNode;

impl NodeDescriptor for CreateListNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("create-list", NodeCategory::Data, "Create List")
            .description("Creates an empty list")
            .output(PinDef::new(pins::VALUE, "List", PinType::List))
    }
}

inventory::submit!(node_engine::DescriptorFn(CreateListNode::descriptor));

/// Appends `item` to a copy of `list` when executed
pub struct ListAddNode;

impl NodeDescriptor for ListAddNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("list-add", NodeCategory::Data, "List Add")
            .description("Adds an item to a list")
            .input(PinDef::exec())
            .input(PinDef::new(pins::LIST, "List", PinType::List))
            .input(PinDef::new(pins::ITEM, "Item", PinType::Any))
            .output(PinDef::exec())
            .output(PinDef::new(pins::VALUE, "Result", PinType::List))
    }
}

inventory::submit!(node_engine::DescriptorFn(ListAddNode::descriptor));

pub struct ListGetNode;

impl NodeDescriptor for ListGetNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("list-get", NodeCategory::Data, "List Get")
            .description("Gets an item by index")
            .input(PinDef::new(pins::LIST, "List", PinType::List))
            .input(PinDef::new(pins::INDEX, "Index", PinType::Number))
            .output(PinDef::new(pins::VALUE, "Value", PinType::Any))
    }
}

inventory::submit!(node_engine::DescriptorFn(ListGetNode::descriptor));

/// Removes the item at `index` from a copy of `list` when executed
pub struct ListRemoveNode;

impl NodeDescriptor for ListRemoveNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("list-remove", NodeCategory::Data, "List Remove")
            .description("Removes the item at an index")
            .input(PinDef::exec())
            .input(PinDef::new(pins::LIST, "List", PinType::List))
            .input(PinDef::new(pins::INDEX, "Index", PinType::Number))
            .output(PinDef::exec())
            .output(PinDef::new(pins::VALUE, "Result", PinType::List))
    }
}

inventory::submit!(node_engine::DescriptorFn(ListRemoveNode::descriptor));

pub struct ListLengthNode;

impl NodeDescriptor for ListLengthNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("list-length", NodeCategory::Data, "List Length")
            .description("Counts the items in a list")
            .input(PinDef::new(pins::LIST, "List", PinType::List))
            .output(PinDef::new(pins::VALUE, "Length", PinType::Number))
    }
}

inventory::submit!(node_engine::DescriptorFn(ListLengthNode::descriptor));

pub struct ToNumberNode;

impl NodeDescriptor for ToNumberNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("to-number", NodeCategory::Data, "To Number")
            .description("Converts a value to a number")
            .input(PinDef::new(pins::VALUE, "Value", PinType::Any))
            .output(PinDef::new(pins::VALUE, "Number", PinType::Number))
    }
}

inventory::submit!(node_engine::DescriptorFn(ToNumberNode::descriptor));

pub struct ToStringNode;

impl NodeDescriptor for ToStringNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("to-string", NodeCategory::Data, "To String")
            .description("Converts a value to a string")
            .input(PinDef::new(pins::VALUE, "Value", PinType::Any))
            .output(PinDef::new(pins::VALUE, "String", PinType::String))
    }
}

inventory::submit!(node_engine::DescriptorFn(ToStringNode::descriptor));

/// Rolls a fresh number in `[min, max]` on every pull
pub struct RandomNumberNode;

impl NodeDescriptor for RandomNumberNode {
    fn descriptor() -> NodeTypeDefinition {
        NodeTypeDefinition::new("random-number", NodeCategory::Data, "Random Number")
            .description("Generates a random number in a range")
            .output(PinDef::new(pins::VALUE, "Value", PinType::Number))
            .property("min", PropertySchema::number("Min", 0))
            .property("max", PropertySchema::number("Max", 100))
            .property("integer", PropertySchema::boolean("Integers Only", true))
    }
}

inventory::submit!(node_engine::DescriptorFn(RandomNumberNode::descriptor));
